use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{catalog::CatalogProduct, models::Category};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SidebarCategory {
    pub name: String,
    pub url: String,
    pub count: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct HomeQuery {
    /// Variant tag whose products are listed first.
    pub with_respect_to: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HomePage {
    pub categories: Vec<SidebarCategory>,
    pub products: Vec<CatalogProduct>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductPage {
    pub category: Category,
    pub product: CatalogProduct,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryPage {
    pub category: Category,
    pub categories: Vec<SidebarCategory>,
    pub products: Vec<CatalogProduct>,
}
