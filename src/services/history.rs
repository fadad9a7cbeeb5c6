//! Free-form service history attached to a customer.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::customer::non_blank;
use crate::models::service_history::{CreateHistoryEntry, ServiceHistoryEntry};
use crate::models::service_order::check_amount;
use crate::services::customer;

/// A customer's history, most recent service first.
pub async fn list_for_customer(
    pool: &PgPool,
    customer_id: Uuid,
) -> Result<Vec<ServiceHistoryEntry>, AppError> {
    customer::find_by_id(pool, customer_id).await?;

    let entries = sqlx::query_as::<_, ServiceHistoryEntry>(
        "SELECT * FROM service_history WHERE customer_id = $1 \
         ORDER BY performed_on DESC, created_at DESC",
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

pub async fn add_entry(
    pool: &PgPool,
    customer_id: Uuid,
    input: &CreateHistoryEntry,
) -> Result<ServiceHistoryEntry, AppError> {
    input.validate()?;
    let service = input.service.trim();
    if service.is_empty() {
        return Err(AppError::Validation("service is required".to_string()));
    }
    check_amount(&input.amount)?;
    customer::find_by_id(pool, customer_id).await?;

    let entry = sqlx::query_as::<_, ServiceHistoryEntry>(
        r#"
        INSERT INTO service_history (customer_id, service, amount, performed_on, notes)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(customer_id)
    .bind(service)
    .bind(input.amount)
    .bind(input.performed_on)
    .bind(non_blank(&input.notes))
    .fetch_one(pool)
    .await?;

    tracing::debug!(customer_id = %customer_id, entry_id = %entry.id, "Service history entry added");
    Ok(entry)
}
