//! Fixed-point price arithmetic shared by the cart aggregator.
//!
//! All amounts carry exactly two fractional digits.

use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};

pub const PRICE_SCALE: u32 = 2;

/// Largest amount a `NUMERIC(12, 2)` cart or line column holds.
pub const MAX_LINE_TOTAL: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Bring an amount to the storefront's currency scale.
pub fn to_currency(amount: Decimal) -> Decimal {
    let mut amount = amount.round_dp(PRICE_SCALE);
    amount.rescale(PRICE_SCALE);
    amount
}

fn within_limit(amount: Option<Decimal>, what: &str) -> AppResult<Decimal> {
    match amount.map(to_currency) {
        Some(amount) if amount <= MAX_LINE_TOTAL => Ok(amount),
        _ => Err(AppError::InvalidArgument(format!(
            "{what} exceeds {MAX_LINE_TOTAL}"
        ))),
    }
}

/// `quantity × unit_price` for one cart line.
pub fn line_total(quantity: i32, unit_price: Decimal) -> AppResult<Decimal> {
    if quantity < 1 {
        return Err(AppError::InvalidArgument(
            "quantity must be at least 1".to_string(),
        ));
    }
    within_limit(unit_price.checked_mul(Decimal::from(quantity)), "line total")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    pub total_line_items: i32,
    pub final_price: Decimal,
}

impl CartTotals {
    pub fn empty() -> Self {
        Self {
            total_line_items: 0,
            final_price: to_currency(Decimal::ZERO),
        }
    }

    /// Fold line final prices into cart totals.
    pub fn from_line_prices<I>(prices: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = Decimal>,
    {
        let mut totals = Self::empty();
        for price in prices {
            totals.total_line_items += 1;
            totals.final_price =
                within_limit(totals.final_price.checked_add(price), "cart total")?;
        }
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn line_total_multiplies_without_float_error() {
        assert_eq!(line_total(3, dec("0.10")).unwrap(), dec("0.30"));
        assert_eq!(line_total(5, dec("1000.00")).unwrap().to_string(), "5000.00");
    }

    #[test]
    fn line_total_rejects_non_positive_quantity() {
        assert!(matches!(
            line_total(0, dec("10.00")),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            line_total(-2, dec("10.00")),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn empty_cart_totals_are_zero() {
        let totals = CartTotals::from_line_prices(Vec::new()).unwrap();
        assert_eq!(totals, CartTotals::empty());
        assert_eq!(totals.final_price.to_string(), "0.00");
    }

    #[test]
    fn totals_count_lines_and_sum_prices() {
        let totals =
            CartTotals::from_line_prices([dec("2000.00"), dec("149.99"), dec("0.01")]).unwrap();
        assert_eq!(totals.total_line_items, 3);
        assert_eq!(totals.final_price, dec("2150.00"));
    }

    #[test]
    fn amounts_beyond_the_column_precision_are_rejected() {
        assert_eq!(MAX_LINE_TOTAL.to_string(), "9999999999.99");
        assert_eq!(
            line_total(9_999_999, dec("1000.00")).unwrap(),
            dec("9999999000.00")
        );
        assert!(matches!(
            line_total(10_000_000, dec("1000.00")),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            line_total(i32::MAX, dec("9999999.99")),
            Err(AppError::InvalidArgument(_))
        ));

        let at_limit = CartTotals::from_line_prices([dec("9999999999.00"), dec("0.99")]).unwrap();
        assert_eq!(at_limit.final_price, MAX_LINE_TOTAL);
        assert!(matches!(
            CartTotals::from_line_prices([dec("9999999999.00"), dec("1.00")]),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn to_currency_pads_scale() {
        assert_eq!(to_currency(dec("12")).to_string(), "12.00");
        assert_eq!(to_currency(dec("12.5")).to_string(), "12.50");
    }
}
