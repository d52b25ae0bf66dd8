use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    catalog::image::ImageUpload,
    entity::orders::OrderStatus,
    models::Category,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryList {
    pub items: Vec<Category>,
}

/// Fields shared by every product variant.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductBase {
    pub category_id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub image: ImageUpload,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateNotebookRequest {
    #[serde(flatten)]
    pub base: ProductBase,
    pub diagonal: String,
    pub display_type: String,
    pub ram: String,
    pub processor_freq: String,
    pub video: String,
    pub time_without_charge: String,
    pub os: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSmartphoneRequest {
    #[serde(flatten)]
    pub base: ProductBase,
    pub diagonal: String,
    pub display_type: String,
    pub resolution: String,
    pub ram: String,
    pub accum_volume: String,
    #[serde(default)]
    pub sd: bool,
    pub sd_volume: Option<String>,
    pub main_cam: String,
    pub frontal_cam: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}
