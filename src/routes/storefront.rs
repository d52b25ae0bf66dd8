use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::catalog::{CategoryPage, HomePage, HomeQuery, ProductPage},
    error::AppResult,
    response::ApiResponse,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/products/{variant}/{slug}/", get(product_detail))
        .route("/category/{slug}/", get(category_detail))
}

#[utoipa::path(
    get,
    path = "/",
    params(
        ("with_respect_to" = Option<String>, Query, description = "Variant tag listed first, e.g. smartphone")
    ),
    responses(
        (status = 200, description = "Sidebar categories and latest products", body = ApiResponse<HomePage>)
    ),
    tag = "Storefront"
)]
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
) -> AppResult<Json<ApiResponse<HomePage>>> {
    let resp = catalog_service::home(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/products/{variant}/{slug}/",
    params(
        ("variant" = String, Path, description = "Product variant tag"),
        ("slug" = String, Path, description = "Product slug")
    ),
    responses(
        (status = 200, description = "Product detail", body = ApiResponse<ProductPage>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Storefront"
)]
pub async fn product_detail(
    State(state): State<AppState>,
    Path((variant, slug)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<ProductPage>>> {
    let resp = catalog_service::product_detail(&state, &variant, &slug).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/category/{slug}/",
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Category with its products", body = ApiResponse<CategoryPage>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Storefront"
)]
pub async fn category_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<CategoryPage>>> {
    let resp = catalog_service::category_detail(&state, &slug).await?;
    Ok(Json(resp))
}
