use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::LockType,
};
use uuid::Uuid;

use crate::{
    audit,
    catalog::{CatalogProduct, NOTEBOOK, SMARTPHONE, VariantRegistry, image::validate_image},
    dto::{
        admin::{
            CategoryList, CreateCategoryRequest, CreateNotebookRequest, CreateSmartphoneRequest,
            ProductBase, UpdateOrderStatusRequest,
        },
        orders::{OrderList, OrderWithCart},
    },
    entity::{
        categories::{ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories},
        notebooks::ActiveModel as NotebookActive,
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        smartphones::ActiveModel as SmartphoneActive,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, Order},
    pricing::to_currency,
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::{cart_aggregator, order_service},
    state::AppState,
};

const CATEGORY_NAME_MAX_LEN: usize = 200;
const TITLE_MAX_LEN: usize = 250;

/// Largest value a `NUMERIC(9, 2)` price column holds.
const MAX_PRICE: Decimal = Decimal::from_parts(999_999_999, 0, 0, false, 2);

fn validate_slug(slug: &str) -> AppResult<()> {
    let valid = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(
            "slug may only contain lowercase letters, digits, '-' and '_'".into(),
        ))
    }
}

fn validate_price(price: Decimal) -> AppResult<Decimal> {
    if price.is_sign_negative() || price > MAX_PRICE || price.scale() > 2 {
        return Err(AppError::Validation(
            "price must be between 0 and 9999999.99 with at most two decimals".into(),
        ));
    }
    Ok(to_currency(price))
}

fn non_blank(value: &str, field: &str, max_len: usize) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    if value.chars().count() > max_len {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(value.to_string())
}

/// Shared admin-form checks for a new product of variant `tag`.
async fn check_product_base(
    txn: &DatabaseTransaction,
    catalog: &VariantRegistry,
    tag: &str,
    base: &ProductBase,
) -> AppResult<()> {
    validate_image(&base.image)?;
    validate_slug(&base.slug)?;
    non_blank(&base.title, "title", TITLE_MAX_LEN)?;
    validate_price(base.price)?;

    let variant = catalog.variant(tag)?;
    let category = Categories::find_by_id(base.category_id)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::Validation("category does not exist".into()))?;
    if category.slug != variant.category_slug() {
        return Err(AppError::Validation(format!(
            "{tag} products belong in the '{}' category",
            variant.category_slug()
        )));
    }

    if variant.find_by_slug(txn, &base.slug).await?.is_some() {
        return Err(AppError::Validation("slug is already in use".into()));
    }
    Ok(())
}

pub async fn list_categories(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<CategoryList>> {
    ensure_admin(user)?;
    let items: Vec<Category> = Categories::find()
        .order_by_asc(CategoryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(Meta::unpaged(total)),
    ))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    let name = non_blank(&payload.name, "name", CATEGORY_NAME_MAX_LEN)?;
    validate_slug(&payload.slug)?;

    let taken = Categories::find()
        .filter(CategoryCol::Slug.eq(payload.slug.as_str()))
        .count(&state.orm)
        .await?;
    if taken > 0 {
        return Err(AppError::Validation("slug is already in use".into()));
    }

    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        slug: Set(payload.slug),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        Some(user.user_id),
        "category_create",
        "categories",
        serde_json::json!({ "category_id": category.id, "slug": category.slug }),
    )
    .await;

    Ok(ApiResponse::success(
        "Category created",
        category.into(),
        Some(Meta::empty()),
    ))
}

pub async fn create_notebook(
    state: &AppState,
    user: &AuthUser,
    payload: CreateNotebookRequest,
) -> AppResult<ApiResponse<CatalogProduct>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;
    check_product_base(&txn, &state.catalog, NOTEBOOK, &payload.base).await?;

    let CreateNotebookRequest { base, .. } = &payload;
    let model = NotebookActive {
        id: Set(Uuid::new_v4()),
        category_id: Set(base.category_id),
        slug: Set(base.slug.clone()),
        title: Set(base.title.trim().to_string()),
        description: Set(base.description.clone()),
        price: Set(validate_price(base.price)?),
        image: Set(base.image.path.clone()),
        diagonal: Set(payload.diagonal.clone()),
        display_type: Set(payload.display_type.clone()),
        ram: Set(payload.ram.clone()),
        processor_freq: Set(payload.processor_freq.clone()),
        video: Set(payload.video.clone()),
        time_without_charge: Set(payload.time_without_charge.clone()),
        os: Set(payload.os.clone()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    let product = CatalogProduct::from_item(NOTEBOOK, &model);
    audit::record(
        state,
        Some(user.user_id),
        "product_create",
        "notebooks",
        serde_json::json!({ "product_id": product.id, "slug": product.slug }),
    )
    .await;

    Ok(ApiResponse::success("Notebook created", product, Some(Meta::empty())))
}

pub async fn create_smartphone(
    state: &AppState,
    user: &AuthUser,
    payload: CreateSmartphoneRequest,
) -> AppResult<ApiResponse<CatalogProduct>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;
    check_product_base(&txn, &state.catalog, SMARTPHONE, &payload.base).await?;

    // A phone without an SD slot has no card size.
    let sd_volume = if payload.sd {
        payload.sd_volume.clone().filter(|v| !v.trim().is_empty())
    } else {
        None
    };

    let base = &payload.base;
    let model = SmartphoneActive {
        id: Set(Uuid::new_v4()),
        category_id: Set(base.category_id),
        slug: Set(base.slug.clone()),
        title: Set(base.title.trim().to_string()),
        description: Set(base.description.clone()),
        price: Set(validate_price(base.price)?),
        image: Set(base.image.path.clone()),
        diagonal: Set(payload.diagonal.clone()),
        display_type: Set(payload.display_type.clone()),
        resolution: Set(payload.resolution.clone()),
        ram: Set(payload.ram.clone()),
        accum_volume: Set(payload.accum_volume.clone()),
        sd: Set(payload.sd),
        sd_volume: Set(sd_volume),
        main_cam: Set(payload.main_cam.clone()),
        frontal_cam: Set(payload.frontal_cam.clone()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    let product = CatalogProduct::from_item(SMARTPHONE, &model);
    audit::record(
        state,
        Some(user.user_id),
        "product_create",
        "smartphones",
        serde_json::json!({ "product_id": product.id, "slug": product.slug }),
    )
    .await;

    Ok(ApiResponse::success("Smartphone created", product, Some(Meta::empty())))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    variant: &str,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;
    let removed = state.catalog.variant(variant)?.delete(&txn, id).await?;
    if removed == 0 {
        return Err(AppError::NotFound);
    }
    let carts = cart_aggregator::purge_from_open_carts(&txn, variant, id).await?;
    txn.commit().await?;

    audit::record(
        state,
        Some(user.user_id),
        "product_delete",
        variant,
        serde_json::json!({ "product_id": id, "open_carts": carts }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(ApiResponse::success(
        "Orders",
        OrderList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithCart>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;
    let order = Orders::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let data = order_service::order_with_cart(&txn, &state.catalog, order).await?;
    txn.commit().await?;

    Ok(ApiResponse::success("Order found", data, Some(Meta::empty())))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;
    let existing = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let current = existing.status;
    if !current.can_advance_to(payload.status) {
        return Err(AppError::Validation(format!(
            "order status cannot move from {current:?} to {:?}",
            payload.status
        )));
    }

    let mut active: OrderActive = existing.into();
    active.status = Set(payload.status);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;
    txn.commit().await?;

    audit::record(
        state,
        Some(user.user_id),
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "from": current, "to": order.status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order updated",
        order.into(),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn slugs_follow_url_rules() {
        assert!(validate_slug("thinkpad-x1_2024").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("ThinkPad").is_err());
        assert!(validate_slug("with space").is_err());
    }

    #[test]
    fn prices_fit_the_column() {
        assert_eq!(
            validate_price(Decimal::from_str("1000").unwrap())
                .unwrap()
                .to_string(),
            "1000.00"
        );
        assert!(validate_price(Decimal::from_str("9999999.99").unwrap()).is_ok());
        assert!(validate_price(Decimal::from_str("10000000.00").unwrap()).is_err());
        assert!(validate_price(Decimal::from_str("-1.00").unwrap()).is_err());
        assert!(validate_price(Decimal::from_str("1.005").unwrap()).is_err());
    }
}
