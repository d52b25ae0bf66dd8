use rust_decimal::Decimal;
use uuid::Uuid;

use super::{CatalogEntity, Purchasable, Specification};
use crate::entity::smartphones::{Column, Entity, Model};

pub const SMARTPHONE: &str = "smartphone";

impl CatalogEntity for Entity {
    const TAG: &'static str = SMARTPHONE;
    const CATEGORY_SLUG: &'static str = "smartphones";

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
        let mut specs = vec![
            Specification::new("Diagonal", &self.diagonal),
            Specification::new("Display type", &self.display_type),
            Specification::new("Screen resolution", &self.resolution),
            Specification::new("RAM", &self.ram),
            Specification::new("Battery capacity", &self.accum_volume),
        ];
        // Without an SD slot there is no maximum card size to show.
        if let (true, Some(volume)) = (self.sd, self.sd_volume.as_deref()) {
            specs.push(Specification::new("Max SD card size", volume));
        }
        specs.push(Specification::new("Main camera", &self.main_cam));
        specs.push(Specification::new("Front camera", &self.frontal_cam));
        specs
    }
}
