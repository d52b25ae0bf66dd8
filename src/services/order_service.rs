use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    catalog::VariantRegistry,
    dto::orders::{CheckoutForm, CheckoutRequest, OrderList, OrderWithCart},
    entity::{
        carts::{ActiveModel as CartActive, Entity as Carts, Model as CartModel},
        customers::Model as CustomerModel,
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, DeliveryType, Entity as Orders,
            Model as OrderModel, OrderStatus,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::{cart_service, customer_service},
    state::AppState,
};

const NAME_MAX_LEN: usize = 30;
const PHONE_MAX_LEN: usize = 20;
const ADDRESS_MAX_LEN: usize = 255;

fn required(value: &str, field: &str, max_len: usize) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    if value.chars().count() > max_len {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(value.to_string())
}

fn optional(value: Option<&str>, field: &str, max_len: usize) -> AppResult<Option<String>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => required(value, field, max_len).map(Some),
        None => Ok(None),
    }
}

/// Checked contents of the order form.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub delivery_type: DeliveryType,
    pub order_date: NaiveDate,
}

pub fn validate_checkout(form: &CheckoutRequest) -> AppResult<OrderForm> {
    let order_date = NaiveDate::parse_from_str(form.order_date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation("order_date must be a date in YYYY-MM-DD form".into()))?;

    Ok(OrderForm {
        first_name: required(&form.first_name, "first_name", NAME_MAX_LEN)?,
        last_name: required(&form.last_name, "last_name", NAME_MAX_LEN)?,
        phone: optional(form.phone.as_deref(), "phone", PHONE_MAX_LEN)?,
        address: optional(form.address.as_deref(), "address", ADDRESS_MAX_LEN)?,
        delivery_type: form.delivery_type,
        order_date,
    })
}

/// Snapshot `cart` into a new order for `customer` and close the cart.
///
/// Returns the order and the cart as stored after `in_order` is set.
pub async fn place_order(
    txn: &DatabaseTransaction,
    customer: &CustomerModel,
    cart: CartModel,
    form: &CheckoutRequest,
) -> AppResult<(OrderModel, CartModel)> {
    let form = validate_checkout(form)?;
    if cart.total_line_items == 0 {
        return Err(AppError::Validation("cart is empty".into()));
    }
    if cart.in_order {
        return Err(AppError::Validation("cart is already part of an order".into()));
    }

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        customer_id: Set(customer.id),
        first_name: Set(form.first_name),
        last_name: Set(form.last_name),
        phone: Set(form.phone),
        address: Set(form.address),
        cart_id: Set(Some(cart.id)),
        status: Set(OrderStatus::New),
        delivery_type: Set(form.delivery_type),
        order_date: Set(form.order_date),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    let mut active: CartActive = cart.into();
    active.in_order = Set(true);
    let cart = active.update(txn).await?;

    tracing::info!(
        order_id = %order.id,
        cart_id = %cart.id,
        final_price = %cart.final_price,
        "order placed"
    );
    Ok((order, cart))
}

/// An order together with the cart it was placed from.
pub async fn order_with_cart(
    txn: &DatabaseTransaction,
    catalog: &VariantRegistry,
    order: OrderModel,
) -> AppResult<OrderWithCart> {
    let cart = match order.cart_id {
        Some(cart_id) => match Carts::find_by_id(cart_id).one(txn).await? {
            Some(cart) => Some(cart_service::cart_view(txn, catalog, cart).await?),
            None => None,
        },
        None => None,
    };
    Ok(OrderWithCart {
        order: order.into(),
        cart,
    })
}

pub async fn checkout_form(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<CheckoutForm>> {
    let txn = state.orm.begin().await?;
    let customer = customer_service::customer_for_user(&txn, user.user_id).await?;
    let cart = cart_service::active_cart(&txn, &customer).await?;
    let cart = cart_service::cart_view(&txn, &state.catalog, cart).await?;
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Checkout",
        CheckoutForm {
            cart,
            delivery_types: vec![DeliveryType::Pickup, DeliveryType::Delivery],
            phone: customer.phone,
            address: customer.address,
        },
        Some(Meta::empty()),
    ))
}

pub async fn make_order(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<OrderWithCart>> {
    let txn = state.orm.begin().await?;
    let customer = customer_service::customer_for_user(&txn, user.user_id).await?;
    let cart = cart_service::active_cart(&txn, &customer).await?;

    let (order, _cart) = place_order(&txn, &customer, cart, &payload).await?;
    let data = order_with_cart(&txn, &state.catalog, order).await?;
    txn.commit().await?;

    audit::record(
        state,
        Some(user.user_id),
        "order_placed",
        "orders",
        serde_json::json!({ "order_id": data.order.id, "cart_id": data.order.cart_id }),
    )
    .await;

    Ok(ApiResponse::success("Order placed", data, Some(Meta::empty())))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let customer = customer_service::customer_for_user(&state.orm, user.user_id).await?;

    let mut condition = Condition::all().add(OrderCol::CustomerId.eq(customer.id));
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        OrderList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithCart>> {
    let txn = state.orm.begin().await?;
    let customer = customer_service::customer_for_user(&txn, user.user_id).await?;
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::CustomerId.eq(customer.id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let data = order_with_cart(&txn, &state.catalog, order).await?;
    txn.commit().await?;

    Ok(ApiResponse::success("OK", data, Some(Meta::empty())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CheckoutRequest {
        CheckoutRequest {
            first_name: " Ada ".into(),
            last_name: "Lovelace".into(),
            phone: Some("+44 20 7946 0000".into()),
            address: Some("   ".into()),
            delivery_type: DeliveryType::Delivery,
            order_date: "2026-11-02".into(),
        }
    }

    #[test]
    fn accepts_and_normalises_a_complete_form() {
        let checked = validate_checkout(&form()).unwrap();
        assert_eq!(checked.first_name, "Ada");
        assert_eq!(checked.address, None);
        assert_eq!(checked.delivery_type, DeliveryType::Delivery);
        assert_eq!(
            checked.order_date,
            NaiveDate::from_ymd_opt(2026, 11, 2).unwrap()
        );
    }

    #[test]
    fn rejects_missing_names() {
        let mut request = form();
        request.last_name = "  ".into();
        assert!(matches!(
            validate_checkout(&request),
            Err(AppError::Validation(msg)) if msg.contains("last_name")
        ));
    }

    #[test]
    fn rejects_unparsable_dates() {
        for bad in ["", "02.11.2026", "2026-13-01", "tomorrow"] {
            let mut request = form();
            request.order_date = bad.into();
            assert!(
                matches!(validate_checkout(&request), Err(AppError::Validation(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_overlong_fields() {
        let mut request = form();
        request.first_name = "x".repeat(NAME_MAX_LEN + 1);
        assert!(matches!(
            validate_checkout(&request),
            Err(AppError::Validation(_))
        ));
    }
}
