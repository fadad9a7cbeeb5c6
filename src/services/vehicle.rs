//! Vehicle registry: CRUD with plate normalization and owner checks.

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::customer::non_blank;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::vehicle::{
    check_model_year, normalize_plate, CreateVehicle, UpdateVehicle, Vehicle, VehicleSummary,
};
use crate::services::customer;

/// Filters for listing vehicles.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct VehicleFilters {
    pub customer_id: Option<Uuid>,
    /// Case-insensitive match on model, make or plate.
    pub search: Option<String>,
}

const SUMMARY_SELECT: &str = "SELECT v.id, v.customer_id, c.name AS customer_name, v.model, v.make, \
     v.plate, v.year, v.mileage \
     FROM vehicles v JOIN customers c ON c.id = v.customer_id";

const FILTER_CLAUSE: &str = "WHERE ($1::uuid IS NULL OR v.customer_id = $1) \
     AND ($2::text IS NULL OR v.model ILIKE $2 OR v.make ILIKE $2 OR v.plate ILIKE $2)";

/// Create a vehicle for an existing customer.
pub async fn create(pool: &PgPool, input: &CreateVehicle) -> Result<Vehicle, AppError> {
    input.validate()?;
    let model = input.model.trim();
    if model.is_empty() {
        return Err(AppError::Validation("model is required".to_string()));
    }
    let plate = normalize_plate(&input.plate)?;
    check_model_year(input.year)?;
    customer::find_by_id(pool, input.customer_id).await?;

    let vehicle = sqlx::query_as::<_, Vehicle>(
        r#"
        INSERT INTO vehicles (customer_id, model, make, plate, year, mileage)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(input.customer_id)
    .bind(model)
    .bind(non_blank(&input.make))
    .bind(&plate)
    .bind(input.year)
    .bind(input.mileage)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        AppError::from_write(
            e,
            &format!("Vehicle with plate '{plate}' already exists"),
            "Customer not found",
        )
    })?;

    tracing::info!(vehicle_id = %vehicle.id, customer_id = %vehicle.customer_id, "Vehicle created");
    Ok(vehicle)
}

/// Find vehicle by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Vehicle, AppError> {
    sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))
}

/// List vehicles with owner names, ordered by model.
pub async fn list(
    pool: &PgPool,
    filters: &VehicleFilters,
    pagination: &Pagination,
) -> Result<PagedResult<VehicleSummary>, AppError> {
    let pattern = non_blank(&filters.search).map(|s| format!("%{s}%"));

    let count_sql = format!(
        "SELECT COUNT(*) FROM vehicles v JOIN customers c ON c.id = v.customer_id {FILTER_CLAUSE}"
    );
    let total = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(filters.customer_id)
        .bind(&pattern)
        .fetch_one(pool)
        .await?;

    let data_sql = format!(
        "{SUMMARY_SELECT} {FILTER_CLAUSE} ORDER BY v.model ASC, v.plate ASC LIMIT $3 OFFSET $4"
    );
    let items = sqlx::query_as::<_, VehicleSummary>(&data_sql)
        .bind(filters.customer_id)
        .bind(&pattern)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(pool)
        .await?;

    Ok(PagedResult::new(items, total, pagination))
}

/// Update a vehicle. A new owner must exist; a new plate must be valid and unique.
pub async fn update(pool: &PgPool, id: Uuid, input: &UpdateVehicle) -> Result<Vehicle, AppError> {
    input.validate()?;
    let input = input.normalized()?;
    find_by_id(pool, id).await?;

    check_model_year(input.year)?;
    if let Some(customer_id) = input.customer_id {
        customer::find_by_id(pool, customer_id).await?;
    }

    let vehicle = sqlx::query_as::<_, Vehicle>(
        r#"
        UPDATE vehicles SET
            customer_id = COALESCE($2, customer_id),
            model = COALESCE($3, model),
            make = COALESCE($4, make),
            plate = COALESCE($5, plate),
            year = COALESCE($6, year),
            mileage = COALESCE($7, mileage),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.customer_id)
    .bind(&input.model)
    .bind(&input.make)
    .bind(&input.plate)
    .bind(input.year)
    .bind(input.mileage)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_write(e, "Plate already registered", "Customer not found"))?;

    Ok(vehicle)
}

/// Delete a vehicle. Refused while service orders still reference it.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            AppError::from_write(e, "Vehicle conflict", "Vehicle still has service orders")
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Vehicle not found".to_string()));
    }
    tracing::info!(vehicle_id = %id, "Vehicle deleted");
    Ok(())
}
