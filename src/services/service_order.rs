//! Service order CRUD. Status changes and deletions are audited.

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::audit::{AuditActor, CreateAuditLog};
use crate::models::customer::non_blank;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::service_order::{
    check_amount, CreateServiceOrder, OrderStatus, ServiceOrder, ServiceOrderDetails,
    UpdateServiceOrder,
};
use crate::services::{audit, customer, vehicle};

/// Filters for listing service orders.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OrderFilters {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
}

const DETAILS_SELECT: &str = "SELECT o.id, o.customer_id, o.vehicle_id, \
     c.name AS customer_name, v.model AS vehicle_model, v.plate AS vehicle_plate, \
     o.entry_date, o.reported_problem, o.diagnosis, o.services_performed, \
     o.amount, o.status, o.created_at \
     FROM service_orders o \
     LEFT JOIN customers c ON c.id = o.customer_id \
     LEFT JOIN vehicles v ON v.id = o.vehicle_id";

const FILTER_CLAUSE: &str = "WHERE ($1::text IS NULL OR o.status = $1) \
     AND ($2::uuid IS NULL OR o.customer_id = $2) \
     AND ($3::uuid IS NULL OR o.vehicle_id = $3)";

/// The vehicle on an order must belong to the order's customer.
async fn check_ownership(pool: &PgPool, customer_id: Uuid, vehicle_id: Uuid) -> Result<(), AppError> {
    customer::find_by_id(pool, customer_id).await?;
    let vehicle = vehicle::find_by_id(pool, vehicle_id).await?;
    if vehicle.customer_id != customer_id {
        return Err(AppError::Validation(
            "vehicle does not belong to the selected customer".to_string(),
        ));
    }
    Ok(())
}

/// Open a new service order.
pub async fn create(pool: &PgPool, input: &CreateServiceOrder) -> Result<ServiceOrder, AppError> {
    check_amount(&input.amount)?;
    check_ownership(pool, input.customer_id, input.vehicle_id).await?;

    let order = sqlx::query_as::<_, ServiceOrder>(
        r#"
        INSERT INTO service_orders
            (customer_id, vehicle_id, entry_date, reported_problem, diagnosis,
             services_performed, amount, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(input.customer_id)
    .bind(input.vehicle_id)
    .bind(input.entry_date)
    .bind(non_blank(&input.reported_problem))
    .bind(non_blank(&input.diagnosis))
    .bind(non_blank(&input.services_performed))
    .bind(input.amount)
    .bind(input.status.label())
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_write(e, "Service order already exists", "Customer or vehicle not found"))?;

    tracing::info!(
        order_id = %order.id,
        customer_id = %order.customer_id,
        status = %order.status,
        "Service order created"
    );
    Ok(order)
}

/// Find a bare order by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<ServiceOrder, AppError> {
    sqlx::query_as::<_, ServiceOrder>("SELECT * FROM service_orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Service order not found".to_string()))
}

/// Find an order joined with its customer and vehicle.
pub async fn find_details(pool: &PgPool, id: Uuid) -> Result<ServiceOrderDetails, AppError> {
    let sql = format!("{DETAILS_SELECT} WHERE o.id = $1");
    sqlx::query_as::<_, ServiceOrderDetails>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Service order not found".to_string()))
}

/// List orders newest entry date first.
pub async fn list(
    pool: &PgPool,
    filters: &OrderFilters,
    pagination: &Pagination,
) -> Result<PagedResult<ServiceOrderDetails>, AppError> {
    let status = filters.status.map(|s| s.label());

    let count_sql = format!("SELECT COUNT(*) FROM service_orders o {FILTER_CLAUSE}");
    let total = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(status)
        .bind(filters.customer_id)
        .bind(filters.vehicle_id)
        .fetch_one(pool)
        .await?;

    let data_sql = format!(
        "{DETAILS_SELECT} {FILTER_CLAUSE} \
         ORDER BY o.entry_date DESC, o.created_at DESC NULLS LAST LIMIT $4 OFFSET $5"
    );
    let items = sqlx::query_as::<_, ServiceOrderDetails>(&data_sql)
        .bind(status)
        .bind(filters.customer_id)
        .bind(filters.vehicle_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(pool)
        .await?;

    Ok(PagedResult::new(items, total, pagination))
}

/// Update an order. A status change is written to the audit log in the same transaction.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: &UpdateServiceOrder,
    actor: &AuditActor,
) -> Result<ServiceOrder, AppError> {
    let current = find_by_id(pool, id).await?;

    if let Some(amount) = &input.amount {
        check_amount(amount)?;
    }
    if input.customer_id.is_some() || input.vehicle_id.is_some() {
        check_ownership(
            pool,
            input.customer_id.unwrap_or(current.customer_id),
            input.vehicle_id.unwrap_or(current.vehicle_id),
        )
        .await?;
    }

    let new_status = input.status.map(|s| s.label());

    let mut tx = pool.begin().await?;

    let order = sqlx::query_as::<_, ServiceOrder>(
        r#"
        UPDATE service_orders SET
            customer_id = COALESCE($2, customer_id),
            vehicle_id = COALESCE($3, vehicle_id),
            entry_date = COALESCE($4, entry_date),
            reported_problem = COALESCE($5, reported_problem),
            diagnosis = COALESCE($6, diagnosis),
            services_performed = COALESCE($7, services_performed),
            amount = COALESCE($8, amount),
            status = COALESCE($9, status),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.customer_id)
    .bind(input.vehicle_id)
    .bind(input.entry_date)
    .bind(non_blank(&input.reported_problem))
    .bind(non_blank(&input.diagnosis))
    .bind(non_blank(&input.services_performed))
    .bind(input.amount)
    .bind(new_status)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| AppError::from_write(e, "Service order conflict", "Customer or vehicle not found"))?;

    if let Some(new_status) = new_status.filter(|s| *s != current.status) {
        audit::record(
            &mut *tx,
            actor,
            &CreateAuditLog {
                entity_type: "service_order".to_string(),
                entity_id: Some(id),
                action: "status_change".to_string(),
                details: Some(serde_json::json!({
                    "from": current.status,
                    "to": new_status,
                })),
            },
        )
        .await?;
        tracing::info!(order_id = %id, from = %current.status, to = new_status, "Service order status changed");
    }

    tx.commit().await?;
    Ok(order)
}

/// Delete an order and record who removed it.
pub async fn delete(pool: &PgPool, id: Uuid, actor: &AuditActor) -> Result<(), AppError> {
    let order = find_by_id(pool, id).await?;

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM service_orders WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    audit::record(
        &mut *tx,
        actor,
        &CreateAuditLog {
            entity_type: "service_order".to_string(),
            entity_id: Some(id),
            action: "delete".to_string(),
            details: Some(serde_json::json!({
                "status": order.status,
                "amount": order.amount,
                "entry_date": order.entry_date,
            })),
        },
    )
    .await?;

    tx.commit().await?;
    tracing::info!(order_id = %id, actor = %actor.username, "Service order deleted");
    Ok(())
}
