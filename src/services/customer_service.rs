use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    db::OrmConn,
    dto::customers::CreateCustomerRequest,
    entity::customers::{ActiveModel as CustomerActive, Column as CustomerCol, Entity as Customers},
    error::{AppError, AppResult},
    models::Customer,
};

pub fn customer_from_entity(model: crate::entity::customers::Model) -> Customer {
    Customer {
        id: model.id,
        user_id: model.user_id,
        name: model.name,
        phone: model.phone,
        email: model.email,
        address: model.address,
        total_invoices: model.total_invoices,
        total_amount: model.total_amount,
        pending_amount: model.pending_amount,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub async fn list_customers(orm: &OrmConn, user_id: Uuid) -> AppResult<Vec<Customer>> {
    let customers = Customers::find()
        .filter(CustomerCol::UserId.eq(user_id))
        .order_by_desc(CustomerCol::CreatedAt)
        .all(orm)
        .await?;
    Ok(customers.into_iter().map(customer_from_entity).collect())
}

pub async fn recent(
    orm: &OrmConn,
    user_id: Uuid,
    limit: u64,
) -> AppResult<Vec<crate::entity::customers::Model>> {
    let customers = Customers::find()
        .filter(CustomerCol::UserId.eq(user_id))
        .order_by_desc(CustomerCol::CreatedAt)
        .limit(limit)
        .all(orm)
        .await?;
    Ok(customers)
}

pub async fn count(orm: &OrmConn, user_id: Uuid) -> AppResult<i64> {
    let count = Customers::find()
        .filter(CustomerCol::UserId.eq(user_id))
        .count(orm)
        .await?;
    Ok(count as i64)
}

/// Explicit customer creation with zeroed running totals; the totals only
/// move when invoices are created for the phone number.
pub async fn add_customer(
    orm: &OrmConn,
    user_id: Uuid,
    payload: CreateCustomerRequest,
) -> AppResult<Customer> {
    let existing = Customers::find()
        .filter(
            Condition::all()
                .add(CustomerCol::UserId.eq(user_id))
                .add(CustomerCol::Phone.eq(payload.phone.as_str())),
        )
        .one(orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::BadRequest(
            "Customer with this phone already exists".into(),
        ));
    }

    let customer = CustomerActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        name: Set(payload.name),
        phone: Set(payload.phone),
        email: Set(payload.email),
        address: Set(payload.address),
        total_invoices: Set(0),
        total_amount: Set(0.0),
        pending_amount: Set(0.0),
        created_at: NotSet,
    }
    .insert(orm)
    .await?;

    Ok(customer_from_entity(customer))
}
