use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::LockType,
};
use uuid::Uuid;

use crate::{
    audit,
    catalog::VariantRegistry,
    dto::cart::{CartLineView, CartView, ChangeQuantityRequest},
    entity::{
        carts::{
            ActiveModel as CartActive, Column as CartCol, Entity as Carts, Model as CartModel,
        },
        customers::Model as CustomerModel,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    pricing::to_currency,
    response::{ApiResponse, Meta},
    services::{cart_aggregator, customer_service},
    state::AppState,
};

/// The customer's open cart (not yet in an order), created on first use.
///
/// Locks the customer row and then the cart row for the rest of `txn`.
pub async fn active_cart(
    txn: &DatabaseTransaction,
    customer: &CustomerModel,
) -> AppResult<CartModel> {
    customer_service::lock_customer(txn, customer.id).await?;

    let existing = Carts::find()
        .filter(
            Condition::all()
                .add(CartCol::OwnerId.eq(customer.id))
                .add(CartCol::InOrder.eq(false)),
        )
        .order_by_desc(CartCol::CreatedAt)
        .lock(LockType::Update)
        .one(txn)
        .await?;

    if let Some(cart) = existing {
        return Ok(cart);
    }

    let cart = CartActive {
        id: Set(Uuid::new_v4()),
        owner_id: Set(Some(customer.id)),
        total_line_items: Set(0),
        in_order: Set(false),
        for_anonymous_user: Set(false),
        final_price: Set(to_currency(Decimal::ZERO)),
        ..Default::default()
    }
    .insert(txn)
    .await?;
    tracing::debug!(cart_id = %cart.id, customer_id = %customer.id, "opened cart");
    Ok(cart)
}

pub async fn cart_view(
    txn: &DatabaseTransaction,
    catalog: &VariantRegistry,
    cart: CartModel,
) -> AppResult<CartView> {
    let lines = cart_aggregator::cart_lines(txn, cart.id).await?;
    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        let product = match catalog.variant(&line.product_variant) {
            Ok(variant) => variant.find_by_id(txn, line.product_id).await?,
            Err(_) => None,
        };
        items.push(CartLineView {
            id: line.id,
            product_variant: line.product_variant,
            product_id: line.product_id,
            product,
            quantity: line.quantity,
            final_price: line.final_price,
        });
    }
    Ok(CartView {
        cart: cart.into(),
        items,
    })
}

pub async fn view_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let txn = state.orm.begin().await?;
    let customer = customer_service::customer_for_user(&txn, user.user_id).await?;
    let cart = active_cart(&txn, &customer).await?;
    let view = cart_view(&txn, &state.catalog, cart).await?;
    txn.commit().await?;

    Ok(ApiResponse::success("OK", view, Some(Meta::empty())))
}

pub async fn add_product(
    state: &AppState,
    user: &AuthUser,
    variant: &str,
    slug: &str,
) -> AppResult<ApiResponse<CartView>> {
    let txn = state.orm.begin().await?;
    let customer = customer_service::customer_for_user(&txn, user.user_id).await?;
    let cart = active_cart(&txn, &customer).await?;
    let product = state.catalog.resolve_slug(&txn, variant, slug).await?;

    let cart = cart_aggregator::add_to_cart(&txn, &state.catalog, cart, variant, product.id).await?;
    let view = cart_view(&txn, &state.catalog, cart).await?;
    txn.commit().await?;

    audit::record(
        state,
        Some(user.user_id),
        "cart_add",
        "cart_line_items",
        serde_json::json!({
            "cart_id": view.cart.id,
            "variant": variant,
            "product_id": product.id,
        }),
    )
    .await;

    Ok(ApiResponse::success("Added to cart", view, Some(Meta::empty())))
}

pub async fn remove_product(
    state: &AppState,
    user: &AuthUser,
    variant: &str,
    slug: &str,
) -> AppResult<ApiResponse<CartView>> {
    let txn = state.orm.begin().await?;
    let customer = customer_service::customer_for_user(&txn, user.user_id).await?;
    let cart = active_cart(&txn, &customer).await?;
    let product = state.catalog.resolve_slug(&txn, variant, slug).await?;

    let cart = cart_aggregator::remove_from_cart(&txn, cart, variant, product.id).await?;
    let view = cart_view(&txn, &state.catalog, cart).await?;
    txn.commit().await?;

    audit::record(
        state,
        Some(user.user_id),
        "cart_remove",
        "cart_line_items",
        serde_json::json!({
            "cart_id": view.cart.id,
            "variant": variant,
            "product_id": product.id,
        }),
    )
    .await;

    Ok(ApiResponse::success("Removed from cart", view, Some(Meta::empty())))
}

pub async fn change_quantity(
    state: &AppState,
    user: &AuthUser,
    variant: &str,
    slug: &str,
    payload: ChangeQuantityRequest,
) -> AppResult<ApiResponse<CartView>> {
    let txn = state.orm.begin().await?;
    let customer = customer_service::customer_for_user(&txn, user.user_id).await?;
    let cart = active_cart(&txn, &customer).await?;
    let product = state.catalog.resolve_slug(&txn, variant, slug).await?;

    let cart = cart_aggregator::set_quantity(
        &txn,
        &state.catalog,
        cart,
        variant,
        product.id,
        payload.quantity,
    )
    .await?;
    let view = cart_view(&txn, &state.catalog, cart).await?;
    txn.commit().await?;

    audit::record(
        state,
        Some(user.user_id),
        "cart_quantity",
        "cart_line_items",
        serde_json::json!({
            "cart_id": view.cart.id,
            "variant": variant,
            "product_id": product.id,
            "quantity": payload.quantity,
        }),
    )
    .await;

    Ok(ApiResponse::success("Quantity updated", view, Some(Meta::empty())))
}
