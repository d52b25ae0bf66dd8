use rust_decimal::Decimal;
use uuid::Uuid;

use super::{CatalogEntity, Purchasable, Specification};
use crate::entity::notebooks::{Column, Entity, Model};

pub const NOTEBOOK: &str = "notebook";

impl CatalogEntity for Entity {
    const TAG: &'static str = NOTEBOOK;
    const CATEGORY_SLUG: &'static str = "notebooks";

    fn id_column() -> Column {
        Column::Id
    }

    fn slug_column() -> Column {
        Column::Slug
    }

    fn category_column() -> Column {
        Column::CategoryId
    }

    fn created_at_column() -> Column {
        Column::CreatedAt
    }
}

impl Purchasable for Model {
    fn id(&self) -> Uuid {
        self.id
    }

    fn category_id(&self) -> Uuid {
        self.category_id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn price(&self) -> Decimal {
        self.price
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn image(&self) -> &str {
        &self.image
    }

    fn specifications(&self) -> Vec<Specification> {
        vec![
            Specification::new("Diagonal", &self.diagonal),
            Specification::new("Display type", &self.display_type),
            Specification::new("RAM", &self.ram),
            Specification::new("Processor frequency", &self.processor_freq),
            Specification::new("Graphics", &self.video),
            Specification::new("Battery life", &self.time_without_charge),
            Specification::new("Operating system", &self.os),
        ]
    }
}
