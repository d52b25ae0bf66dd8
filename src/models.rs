use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    cart_line_items, carts,
    categories::{self, category_url},
    customers,
    orders::{self, DeliveryType, OrderStatus},
    users,
};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Customer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<customers::Model> for Customer {
    fn from(model: customers::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            phone: model.phone,
            address: model.address,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub url: String,
}

impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Self {
            url: category_url(&model.slug),
            id: model.id,
            name: model.name,
            slug: model.slug,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Cart {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub total_line_items: i32,
    pub in_order: bool,
    pub for_anonymous_user: bool,
    pub final_price: Decimal,
}

impl From<carts::Model> for Cart {
    fn from(model: carts::Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            total_line_items: model.total_line_items,
            in_order: model.in_order,
            for_anonymous_user: model.for_anonymous_user,
            final_price: model.final_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartLineItem {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub product_variant: String,
    pub product_id: Uuid,
    pub quantity: i32,
    pub final_price: Decimal,
}

impl From<cart_line_items::Model> for CartLineItem {
    fn from(model: cart_line_items::Model) -> Self {
        Self {
            id: model.id,
            cart_id: model.cart_id,
            customer_id: model.customer_id,
            product_variant: model.product_variant,
            product_id: model.product_id,
            quantity: model.quantity,
            final_price: model.final_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub cart_id: Option<Uuid>,
    pub status: OrderStatus,
    pub delivery_type: DeliveryType,
    pub order_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<orders::Model> for Order {
    fn from(model: orders::Model) -> Self {
        Self {
            id: model.id,
            customer_id: model.customer_id,
            first_name: model.first_name,
            last_name: model.last_name,
            phone: model.phone,
            address: model.address,
            cart_id: model.cart_id,
            status: model.status,
            delivery_type: model.delivery_type,
            order_date: model.order_date,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
