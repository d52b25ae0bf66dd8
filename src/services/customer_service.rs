use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, Set,
    sea_query::{LockType, OnConflict},
};
use uuid::Uuid;

use crate::{
    entity::customers::{
        ActiveModel as CustomerActive, Column as CustomerCol, Entity as Customers,
        Model as CustomerModel,
    },
    error::{AppError, AppResult},
};

/// The storefront profile of a user, created the first time it is needed.
pub async fn customer_for_user<C>(conn: &C, user_id: Uuid) -> AppResult<CustomerModel>
where
    C: ConnectionTrait,
{
    if let Some(customer) = Customers::find()
        .filter(CustomerCol::UserId.eq(user_id))
        .one(conn)
        .await?
    {
        return Ok(customer);
    }

    Customers::insert(CustomerActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        phone: Set(None),
        address: Set(None),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::column(CustomerCol::UserId)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(conn)
    .await?;

    Customers::find()
        .filter(CustomerCol::UserId.eq(user_id))
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)
}

/// Serialises cart and checkout work of one customer.
pub async fn lock_customer<C>(conn: &C, customer_id: Uuid) -> AppResult<CustomerModel>
where
    C: ConnectionTrait,
{
    Customers::find_by_id(customer_id)
        .lock(LockType::Update)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)
}
