//! Customer registry: CRUD and name search.

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::audit::{AuditActor, CreateAuditLog};
use crate::models::customer::{non_blank, CreateCustomer, Customer, UpdateCustomer};
use crate::models::pagination::{PagedResult, Pagination};
use crate::services::audit;

/// Filters for listing customers.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CustomerFilters {
    /// Case-insensitive match on name, phone or email.
    pub search: Option<String>,
}

/// Create a new customer.
pub async fn create(pool: &PgPool, input: &CreateCustomer) -> Result<Customer, AppError> {
    let input = input.normalized();
    input.validate()?;

    let customer = sqlx::query_as::<_, Customer>(
        r#"
        INSERT INTO customers (name, phone, email, address)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(&input.name)
    .bind(&input.phone)
    .bind(&input.email)
    .bind(&input.address)
    .fetch_one(pool)
    .await?;

    tracing::info!(customer_id = %customer.id, "Customer created");
    Ok(customer)
}

/// Find customer by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Customer, AppError> {
    sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))
}

/// List customers ordered by name.
pub async fn list(
    pool: &PgPool,
    filters: &CustomerFilters,
    pagination: &Pagination,
) -> Result<PagedResult<Customer>, AppError> {
    let pattern = non_blank(&filters.search).map(|s| format!("%{s}%"));

    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM customers \
         WHERE $1::text IS NULL OR name ILIKE $1 OR phone ILIKE $1 OR email ILIKE $1",
    )
    .bind(&pattern)
    .fetch_one(pool)
    .await?;

    let items = sqlx::query_as::<_, Customer>(
        "SELECT * FROM customers \
         WHERE $1::text IS NULL OR name ILIKE $1 OR phone ILIKE $1 OR email ILIKE $1 \
         ORDER BY name ASC LIMIT $2 OFFSET $3",
    )
    .bind(&pattern)
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(pool)
    .await?;

    Ok(PagedResult::new(items, total, pagination))
}

/// Update a customer by ID. Absent fields keep their current value.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: &UpdateCustomer,
) -> Result<Customer, AppError> {
    let input = input.normalized()?;
    input.validate()?;
    find_by_id(pool, id).await?;

    let customer = sqlx::query_as::<_, Customer>(
        r#"
        UPDATE customers SET
            name = COALESCE($2, name),
            phone = COALESCE($3, phone),
            email = COALESCE($4, email),
            address = COALESCE($5, address),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.name)
    .bind(&input.phone)
    .bind(&input.email)
    .bind(&input.address)
    .fetch_one(pool)
    .await?;

    Ok(customer)
}

/// Delete a customer. Refused while vehicles or service orders still reference it.
pub async fn delete(pool: &PgPool, id: Uuid, actor: &AuditActor) -> Result<(), AppError> {
    let customer = find_by_id(pool, id).await?;

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM customers WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::from_write(
                e,
                "Customer already exists",
                "Customer still has vehicles or service orders",
            )
        })?;

    audit::record(
        &mut *tx,
        actor,
        &CreateAuditLog {
            entity_type: "customer".to_string(),
            entity_id: Some(id),
            action: "delete".to_string(),
            details: Some(serde_json::json!({ "name": customer.name })),
        },
    )
    .await?;

    tx.commit().await?;
    tracing::info!(customer_id = %id, actor = %actor.username, "Customer deleted");
    Ok(())
}
