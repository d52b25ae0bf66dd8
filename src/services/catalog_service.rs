use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    catalog::{CatalogProduct, VariantRegistry},
    dto::catalog::{CategoryPage, HomePage, HomeQuery, ProductPage, SidebarCategory},
    entity::categories::{
        Column as CategoryCol, Entity as Categories, Model as CategoryModel, category_url,
    },
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Products per variant shown on the home page.
pub const LATEST_PER_VARIANT: u64 = 5;

/// Build sidebar rows from per-variant counts keyed by category id.
///
/// A category counts only the variant that claims its slug; categories no
/// variant claims show zero.
pub fn sidebar_entries(
    categories: &[CategoryModel],
    counts: &HashMap<&'static str, HashMap<Uuid, i64>>,
    catalog: &VariantRegistry,
) -> Vec<SidebarCategory> {
    categories
        .iter()
        .map(|category| {
            let count = catalog
                .for_category(&category.slug)
                .and_then(|variant| counts.get(variant.tag()))
                .and_then(|per_category| per_category.get(&category.id))
                .copied()
                .unwrap_or(0);
            SidebarCategory {
                name: category.name.clone(),
                url: category_url(&category.slug),
                count,
            }
        })
        .collect()
}

pub async fn categories_for_sidebar(
    txn: &DatabaseTransaction,
    catalog: &VariantRegistry,
) -> AppResult<Vec<SidebarCategory>> {
    let categories = Categories::find()
        .order_by_asc(CategoryCol::Name)
        .all(txn)
        .await?;

    let mut counts = HashMap::new();
    for variant in catalog.variants() {
        counts.insert(variant.tag(), variant.count_by_category(txn).await?);
    }

    Ok(sidebar_entries(&categories, &counts, catalog))
}

/// Stable-sort so products of `tag` come first, keeping recency order inside each group.
pub fn prioritize_variant(products: &mut [CatalogProduct], tag: &str) {
    products.sort_by_key(|product| product.variant != tag);
}

pub async fn latest_products(
    txn: &DatabaseTransaction,
    catalog: &VariantRegistry,
    with_respect_to: Option<&str>,
) -> AppResult<Vec<CatalogProduct>> {
    let mut products = Vec::new();
    for variant in catalog.variants() {
        products.extend(variant.latest(txn, LATEST_PER_VARIANT).await?);
    }

    if let Some(tag) = with_respect_to.filter(|tag| catalog.contains(tag)) {
        prioritize_variant(&mut products, tag);
    }
    Ok(products)
}

pub async fn home(state: &AppState, query: HomeQuery) -> AppResult<ApiResponse<HomePage>> {
    let txn = state.orm.begin().await?;
    let categories = categories_for_sidebar(&txn, &state.catalog).await?;
    let products =
        latest_products(&txn, &state.catalog, query.with_respect_to.as_deref()).await?;
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Home",
        HomePage {
            categories,
            products,
        },
        Some(Meta::empty()),
    ))
}

pub async fn product_detail(
    state: &AppState,
    variant: &str,
    slug: &str,
) -> AppResult<ApiResponse<ProductPage>> {
    let txn = state.orm.begin().await?;
    let product = state.catalog.resolve_slug(&txn, variant, slug).await?;
    let category = Categories::find_by_id(product.category_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Product",
        ProductPage {
            category: category.into(),
            product,
        },
        Some(Meta::empty()),
    ))
}

pub async fn category_detail(
    state: &AppState,
    slug: &str,
) -> AppResult<ApiResponse<CategoryPage>> {
    let txn = state.orm.begin().await?;
    let category = Categories::find()
        .filter(CategoryCol::Slug.eq(slug))
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let products = match state.catalog.for_category(&category.slug) {
        Some(variant) => variant.in_category(&txn, category.id).await?,
        None => Vec::new(),
    };
    let categories = categories_for_sidebar(&txn, &state.catalog).await?;
    txn.commit().await?;

    let total = products.len() as i64;
    Ok(ApiResponse::success(
        "Category",
        CategoryPage {
            category: category.into(),
            categories,
            products,
        },
        Some(Meta::unpaged(total)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn category(name: &str, slug: &str) -> CategoryModel {
        CategoryModel {
            id: Uuid::new_v4(),
            name: name.into(),
            slug: slug.into(),
            created_at: Utc::now().into(),
        }
    }

    fn product(variant: &str, slug: &str) -> CatalogProduct {
        CatalogProduct {
            variant: variant.into(),
            id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            title: slug.into(),
            slug: slug.into(),
            description: String::new(),
            price: Decimal::new(100_000, 2),
            image: String::new(),
            url: String::new(),
            specifications: Vec::new(),
        }
    }

    #[test]
    fn sidebar_counts_only_the_matching_variant() {
        let catalog = VariantRegistry::storefront();
        let notebooks = category("Notebooks", "notebooks");
        let smartphones = category("Smartphones", "smartphones");
        let misc = category("Accessories", "accessories");

        let mut counts = HashMap::new();
        counts.insert("notebook", HashMap::from([(notebooks.id, 3)]));
        // Smartphones filed under the notebooks category must not leak into its count.
        counts.insert(
            "smartphone",
            HashMap::from([(notebooks.id, 2), (misc.id, 4)]),
        );

        let rows = sidebar_entries(
            &[notebooks.clone(), smartphones, misc],
            &counts,
            &catalog,
        );

        assert_eq!(
            rows[0],
            SidebarCategory {
                name: "Notebooks".into(),
                url: "/category/notebooks/".into(),
                count: 3,
            }
        );
        assert_eq!(rows[1].count, 0);
        assert_eq!(rows[2].count, 0);
    }

    #[test]
    fn prioritize_keeps_recency_within_groups() {
        let mut products = vec![
            product("notebook", "n1"),
            product("notebook", "n2"),
            product("smartphone", "s1"),
            product("smartphone", "s2"),
        ];
        prioritize_variant(&mut products, "smartphone");
        let slugs: Vec<_> = products.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["s1", "s2", "n1", "n2"]);
    }
}
