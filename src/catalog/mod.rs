//! Product catalog: the variant tables and the generic item reference.
//!
//! Cart lines point at products through a `(variant tag, id)` pair. Each
//! product table implements [`Purchasable`] for its rows and is registered in
//! a [`VariantRegistry`], so cart and order code never match on concrete
//! product types.

use std::{collections::BTreeMap, collections::HashMap, marker::PhantomData, sync::Arc};

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::Expr,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub mod image;
mod notebook;
mod smartphone;

pub use notebook::NOTEBOOK;
pub use smartphone::SMARTPHONE;

/// Read surface shared by every product variant.
pub trait Purchasable {
    fn id(&self) -> Uuid;
    fn category_id(&self) -> Uuid;
    fn title(&self) -> &str;
    fn slug(&self) -> &str;
    fn price(&self) -> Decimal;
    fn description(&self) -> &str;
    fn image(&self) -> &str;
    /// Variant-specific fields, in display order.
    fn specifications(&self) -> Vec<Specification>;
}

pub fn product_url(variant: &str, slug: &str) -> String {
    format!("/products/{variant}/{slug}/")
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Specification {
    pub label: String,
    pub value: String,
}

impl Specification {
    pub fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// A resolved generic reference.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CatalogProduct {
    pub variant: String,
    pub id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub image: String,
    pub url: String,
    pub specifications: Vec<Specification>,
}

impl CatalogProduct {
    pub fn from_item(variant: &str, item: &impl Purchasable) -> Self {
        Self {
            variant: variant.to_string(),
            id: item.id(),
            category_id: item.category_id(),
            title: item.title().to_string(),
            slug: item.slug().to_string(),
            description: item.description().to_string(),
            price: item.price(),
            image: item.image().to_string(),
            url: product_url(variant, item.slug()),
            specifications: item.specifications(),
        }
    }
}

/// Loader for one product table.
#[async_trait]
pub trait ProductVariant: Send + Sync {
    /// Tag stored in cart lines and used in product URLs.
    fn tag(&self) -> &'static str;

    /// Slug of the category whose sidebar count this variant feeds.
    fn category_slug(&self) -> &'static str;

    async fn find_by_id(
        &self,
        txn: &DatabaseTransaction,
        id: Uuid,
    ) -> AppResult<Option<CatalogProduct>>;

    async fn find_by_slug(
        &self,
        txn: &DatabaseTransaction,
        slug: &str,
    ) -> AppResult<Option<CatalogProduct>>;

    /// Newest first.
    async fn latest(&self, txn: &DatabaseTransaction, limit: u64)
    -> AppResult<Vec<CatalogProduct>>;

    async fn in_category(
        &self,
        txn: &DatabaseTransaction,
        category_id: Uuid,
    ) -> AppResult<Vec<CatalogProduct>>;

    /// Row count per `category_id`.
    async fn count_by_category(&self, txn: &DatabaseTransaction) -> AppResult<HashMap<Uuid, i64>>;

    /// Returns the number of rows removed.
    async fn delete(&self, txn: &DatabaseTransaction, id: Uuid) -> AppResult<u64>;
}

/// A sea-orm entity that stores one product variant.
pub trait CatalogEntity: EntityTrait {
    const TAG: &'static str;
    const CATEGORY_SLUG: &'static str;

    fn id_column() -> Self::Column;
    fn slug_column() -> Self::Column;
    fn category_column() -> Self::Column;
    fn created_at_column() -> Self::Column;
}

/// [`ProductVariant`] for any [`CatalogEntity`] whose rows are [`Purchasable`].
pub struct CatalogTable<E> {
    _entity: PhantomData<fn() -> E>,
}

impl<E> CatalogTable<E> {
    pub fn new() -> Self {
        Self {
            _entity: PhantomData,
        }
    }
}

impl<E> Default for CatalogTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E> ProductVariant for CatalogTable<E>
where
    E: CatalogEntity,
    E::Model: Purchasable + Send + Sync,
{
    fn tag(&self) -> &'static str {
        E::TAG
    }

    fn category_slug(&self) -> &'static str {
        E::CATEGORY_SLUG
    }

    async fn find_by_id(
        &self,
        txn: &DatabaseTransaction,
        id: Uuid,
    ) -> AppResult<Option<CatalogProduct>> {
        let row = E::find()
            .filter(E::id_column().eq(id))
            .one(txn)
            .await?;
        Ok(row.map(|model| CatalogProduct::from_item(E::TAG, &model)))
    }

    async fn find_by_slug(
        &self,
        txn: &DatabaseTransaction,
        slug: &str,
    ) -> AppResult<Option<CatalogProduct>> {
        let row = E::find()
            .filter(E::slug_column().eq(slug))
            .one(txn)
            .await?;
        Ok(row.map(|model| CatalogProduct::from_item(E::TAG, &model)))
    }

    async fn latest(
        &self,
        txn: &DatabaseTransaction,
        limit: u64,
    ) -> AppResult<Vec<CatalogProduct>> {
        let rows = E::find()
            .order_by_desc(E::created_at_column())
            .limit(limit)
            .all(txn)
            .await?;
        Ok(rows
            .iter()
            .map(|model| CatalogProduct::from_item(E::TAG, model))
            .collect())
    }

    async fn in_category(
        &self,
        txn: &DatabaseTransaction,
        category_id: Uuid,
    ) -> AppResult<Vec<CatalogProduct>> {
        let rows = E::find()
            .filter(E::category_column().eq(category_id))
            .order_by_desc(E::created_at_column())
            .all(txn)
            .await?;
        Ok(rows
            .iter()
            .map(|model| CatalogProduct::from_item(E::TAG, model))
            .collect())
    }

    async fn count_by_category(&self, txn: &DatabaseTransaction) -> AppResult<HashMap<Uuid, i64>> {
        let rows: Vec<(Uuid, i64)> = E::find()
            .select_only()
            .column(E::category_column())
            .column_as(Expr::col(E::id_column()).count(), "product_count")
            .group_by(E::category_column())
            .into_tuple()
            .all(txn)
            .await?;
        Ok(rows.into_iter().collect())
    }

    async fn delete(&self, txn: &DatabaseTransaction, id: Uuid) -> AppResult<u64> {
        let result = E::delete_many()
            .filter(E::id_column().eq(id))
            .exec(txn)
            .await?;
        Ok(result.rows_affected)
    }
}

/// Variant tag → loader.
#[derive(Clone, Default)]
pub struct VariantRegistry {
    variants: BTreeMap<&'static str, Arc<dyn ProductVariant>>,
}

impl VariantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notebooks and smartphones.
    pub fn storefront() -> Self {
        Self::new()
            .register(CatalogTable::<crate::entity::notebooks::Entity>::new())
            .register(CatalogTable::<crate::entity::smartphones::Entity>::new())
    }

    pub fn register<V>(mut self, variant: V) -> Self
    where
        V: ProductVariant + 'static,
    {
        self.variants.insert(variant.tag(), Arc::new(variant));
        self
    }

    pub fn variant(&self, tag: &str) -> AppResult<&dyn ProductVariant> {
        self.variants
            .get(tag)
            .map(|variant| variant.as_ref())
            .ok_or(AppError::NotFound)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.variants.contains_key(tag)
    }

    pub fn variants(&self) -> impl Iterator<Item = &dyn ProductVariant> {
        self.variants.values().map(|variant| variant.as_ref())
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.variants.keys().copied()
    }

    /// The variant whose catalog segment is the category with this slug.
    pub fn for_category(&self, category_slug: &str) -> Option<&dyn ProductVariant> {
        self.variants()
            .find(|variant| variant.category_slug() == category_slug)
    }

    pub async fn resolve(
        &self,
        txn: &DatabaseTransaction,
        tag: &str,
        id: Uuid,
    ) -> AppResult<CatalogProduct> {
        self.variant(tag)?
            .find_by_id(txn, id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn resolve_slug(
        &self,
        txn: &DatabaseTransaction,
        tag: &str,
        slug: &str,
    ) -> AppResult<CatalogProduct> {
        self.variant(tag)?
            .find_by_slug(txn, slug)
            .await?
            .ok_or(AppError::NotFound)
    }
}
