use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::cart::CartView,
    entity::orders::DeliveryType,
    models::Order,
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub delivery_type: DeliveryType,
    /// Requested pickup/delivery date, `YYYY-MM-DD`.
    pub order_date: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutForm {
    pub cart: CartView,
    pub delivery_types: Vec<DeliveryType>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithCart {
    pub order: Order,
    pub cart: Option<CartView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
