//! Cart line and cart total maintenance.
//!
//! Every function here expects to run inside the caller's transaction, with
//! the cart row already locked, so the totals written by [`recalc_cart`]
//! always match the lines committed alongside them.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, sea_query::LockType,
};
use uuid::Uuid;

use crate::{
    catalog::VariantRegistry,
    entity::{
        cart_line_items::{
            ActiveModel as LineActive, Column as LineCol, Entity as CartLineItems,
            Model as LineModel,
        },
        carts::{
            ActiveModel as CartActive, Column as CartCol, Entity as Carts, Model as CartModel,
        },
    },
    error::{AppError, AppResult},
    pricing::{CartTotals, line_total},
};

fn line_condition(cart_id: Uuid, variant: &str, product_id: Uuid) -> Condition {
    Condition::all()
        .add(LineCol::CartId.eq(cart_id))
        .add(LineCol::ProductVariant.eq(variant))
        .add(LineCol::ProductId.eq(product_id))
}

pub async fn find_line(
    txn: &DatabaseTransaction,
    cart_id: Uuid,
    variant: &str,
    product_id: Uuid,
) -> AppResult<Option<LineModel>> {
    Ok(CartLineItems::find()
        .filter(line_condition(cart_id, variant, product_id))
        .one(txn)
        .await?)
}

pub async fn cart_lines(txn: &DatabaseTransaction, cart_id: Uuid) -> AppResult<Vec<LineModel>> {
    Ok(CartLineItems::find()
        .filter(LineCol::CartId.eq(cart_id))
        .order_by_asc(LineCol::CreatedAt)
        .all(txn)
        .await?)
}

/// Persist `item.quantity` together with its price at `unit_price`.
async fn save_line(
    txn: &DatabaseTransaction,
    item: LineModel,
    unit_price: Decimal,
) -> AppResult<LineModel> {
    let quantity = item.quantity;
    let final_price = line_total(quantity, unit_price)?;
    let mut active: LineActive = item.into();
    active.quantity = Set(quantity);
    active.final_price = Set(final_price);
    Ok(active.update(txn).await?)
}

/// Set `final_price = quantity × price` of the referenced product and save.
pub async fn recalc_line_item(
    txn: &DatabaseTransaction,
    catalog: &VariantRegistry,
    item: LineModel,
) -> AppResult<LineModel> {
    let product = match catalog
        .resolve(txn, &item.product_variant, item.product_id)
        .await
    {
        Ok(product) => product,
        Err(AppError::NotFound) => {
            return Err(AppError::Reference(format!(
                "cart line {} points at missing {}/{}",
                item.id, item.product_variant, item.product_id
            )));
        }
        Err(err) => return Err(err),
    };
    save_line(txn, item, product.price).await
}

/// Recount the cart's lines and re-sum their prices, then save the cart.
pub async fn recalc_cart(txn: &DatabaseTransaction, cart: CartModel) -> AppResult<CartModel> {
    let prices: Vec<Decimal> = CartLineItems::find()
        .select_only()
        .column(LineCol::FinalPrice)
        .filter(LineCol::CartId.eq(cart.id))
        .into_tuple()
        .all(txn)
        .await?;
    let totals = CartTotals::from_line_prices(prices)?;

    let mut active: CartActive = cart.into();
    active.total_line_items = Set(totals.total_line_items);
    active.final_price = Set(totals.final_price);
    Ok(active.update(txn).await?)
}

/// Add one unit of a product: bump an existing line or open a new one.
pub async fn add_to_cart(
    txn: &DatabaseTransaction,
    catalog: &VariantRegistry,
    cart: CartModel,
    variant: &str,
    product_id: Uuid,
) -> AppResult<CartModel> {
    let product = catalog.resolve(txn, variant, product_id).await?;

    match find_line(txn, cart.id, variant, product_id).await? {
        Some(mut item) => {
            item.quantity = item
                .quantity
                .checked_add(1)
                .ok_or_else(|| AppError::InvalidArgument("quantity is too large".into()))?;
            save_line(txn, item, product.price).await?;
        }
        None => {
            LineActive {
                id: Set(Uuid::new_v4()),
                customer_id: Set(cart.owner_id),
                cart_id: Set(cart.id),
                product_variant: Set(variant.to_string()),
                product_id: Set(product_id),
                quantity: Set(1),
                final_price: Set(line_total(1, product.price)?),
                ..Default::default()
            }
            .insert(txn)
            .await?;
        }
    }

    tracing::debug!(cart_id = %cart.id, variant, %product_id, "added to cart");
    recalc_cart(txn, cart).await
}

/// Drop the product's line if present; absent lines are not an error.
pub async fn remove_from_cart(
    txn: &DatabaseTransaction,
    cart: CartModel,
    variant: &str,
    product_id: Uuid,
) -> AppResult<CartModel> {
    let result = CartLineItems::delete_many()
        .filter(line_condition(cart.id, variant, product_id))
        .exec(txn)
        .await?;

    tracing::debug!(
        cart_id = %cart.id,
        variant,
        %product_id,
        removed = result.rows_affected,
        "removed from cart"
    );
    recalc_cart(txn, cart).await
}

pub async fn set_quantity(
    txn: &DatabaseTransaction,
    catalog: &VariantRegistry,
    cart: CartModel,
    variant: &str,
    product_id: Uuid,
    quantity: i32,
) -> AppResult<CartModel> {
    if quantity < 1 {
        return Err(AppError::InvalidArgument(
            "quantity must be at least 1".to_string(),
        ));
    }

    let mut item = find_line(txn, cart.id, variant, product_id)
        .await?
        .ok_or(AppError::NotFound)?;
    item.quantity = quantity;
    recalc_line_item(txn, catalog, item).await?;

    recalc_cart(txn, cart).await
}

/// Take a product out of every cart that is not yet in an order.
///
/// Returns how many carts lost a line. Ordered carts keep theirs as a record
/// of what was bought.
pub async fn purge_from_open_carts(
    txn: &DatabaseTransaction,
    variant: &str,
    product_id: Uuid,
) -> AppResult<usize> {
    let carts = Carts::find()
        .inner_join(CartLineItems)
        .filter(CartCol::InOrder.eq(false))
        .filter(LineCol::ProductVariant.eq(variant))
        .filter(LineCol::ProductId.eq(product_id))
        .order_by_asc(CartCol::Id)
        .lock(LockType::Update)
        .all(txn)
        .await?;

    let purged = carts.len();
    for cart in carts {
        remove_from_cart(txn, cart, variant, product_id).await?;
    }
    Ok(purged)
}
