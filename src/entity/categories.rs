use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::notebooks::Entity")]
    Notebooks,
    #[sea_orm(has_many = "super::smartphones::Entity")]
    Smartphones,
}

impl Related<super::notebooks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notebooks.def()
    }
}

impl Related<super::smartphones::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Smartphones.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn category_url(slug: &str) -> String {
    format!("/category/{slug}/")
}
