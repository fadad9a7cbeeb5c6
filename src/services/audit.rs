//! Audit trail writes.

use sqlx::PgExecutor;

use crate::errors::AppError;
use crate::models::audit::{AuditActor, CreateAuditLog};

/// Append an audit entry. Accepts a pool or an open transaction.
pub async fn record<'e, E>(
    executor: E,
    actor: &AuditActor,
    entry: &CreateAuditLog,
) -> Result<(), AppError>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO audit_log (entity_type, entity_id, action, actor_id, actor_name, details)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(&entry.entity_type)
    .bind(entry.entity_id)
    .bind(&entry.action)
    .bind(actor.id)
    .bind(&actor.username)
    .bind(&entry.details)
    .execute(executor)
    .await?;
    Ok(())
}
