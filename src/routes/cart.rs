use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::{
        cart::{CartView, ChangeQuantityRequest},
        orders::{CheckoutForm, CheckoutRequest, OrderWithCart},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::{cart_service, order_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cart/", get(view_cart))
        .route("/add-to-cart/{variant}/{slug}/", post(add_to_cart))
        .route("/remove-from-cart/{variant}/{slug}/", post(remove_from_cart))
        .route("/change_quantity/{variant}/{slug}", post(change_quantity))
        .route("/checkout/", get(checkout))
        .route("/make-order/", post(make_order))
}

#[utoipa::path(
    get,
    path = "/cart/",
    responses(
        (status = 200, description = "Open cart of the current customer", body = ApiResponse<CartView>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn view_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::view_cart(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/add-to-cart/{variant}/{slug}/",
    params(
        ("variant" = String, Path, description = "Product variant tag"),
        ("slug" = String, Path, description = "Product slug")
    ),
    responses(
        (status = 200, description = "One unit of the product added to the cart", body = ApiResponse<CartView>),
        (status = 400, description = "Cart totals too large"),
        (status = 404, description = "Unknown variant or product"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path((variant, slug)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::add_product(&state, &user, &variant, &slug).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/remove-from-cart/{variant}/{slug}/",
    params(
        ("variant" = String, Path, description = "Product variant tag"),
        ("slug" = String, Path, description = "Product slug")
    ),
    responses(
        (status = 200, description = "Product removed from the cart", body = ApiResponse<CartView>),
        (status = 404, description = "Unknown variant or product"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path((variant, slug)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::remove_product(&state, &user, &variant, &slug).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/change_quantity/{variant}/{slug}",
    params(
        ("variant" = String, Path, description = "Product variant tag"),
        ("slug" = String, Path, description = "Product slug")
    ),
    request_body = ChangeQuantityRequest,
    responses(
        (status = 200, description = "Line quantity updated", body = ApiResponse<CartView>),
        (status = 400, description = "Quantity below 1 or totals too large"),
        (status = 404, description = "Unknown variant or product, or product is not in the cart"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn change_quantity(
    State(state): State<AppState>,
    user: AuthUser,
    Path((variant, slug)): Path<(String, String)>,
    Json(payload): Json<ChangeQuantityRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::change_quantity(&state, &user, &variant, &slug, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/checkout/",
    responses(
        (status = 200, description = "Cart and defaults for the order form", body = ApiResponse<CheckoutForm>)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CheckoutForm>>> {
    let resp = order_service::checkout_form(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/make-order/",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Order placed from the open cart", body = ApiResponse<OrderWithCart>),
        (status = 422, description = "Invalid form or empty cart"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn make_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<OrderWithCart>>> {
    let resp = order_service::make_order(&state, &user, payload).await?;
    Ok(Json(resp))
}
