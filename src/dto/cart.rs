use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{catalog::CatalogProduct, models::Cart};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeQuantityRequest {
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub cart: Cart,
    pub items: Vec<CartLineView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineView {
    pub id: Uuid,
    pub product_variant: String,
    pub product_id: Uuid,
    /// `None` when the referenced product has been deleted.
    pub product: Option<CatalogProduct>,
    pub quantity: i32,
    pub final_price: Decimal,
}
