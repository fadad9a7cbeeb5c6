//! Dashboard statistics: entity counts plus the monthly order aggregation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::service_order::OrderRecord;
use crate::services::aggregation::{
    self, AggregationSettings, StackedMonthBucket, StatusSummary, TrendMonthPoint,
};

/// Everything the admin overview page renders.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub customers: i64,
    pub vehicles: i64,
    pub status_summary: StatusSummary,
    pub monthly_status: Vec<StackedMonthBucket>,
    pub monthly_totals: Vec<TrendMonthPoint>,
    pub generated_at: DateTime<Utc>,
}

/// Fetch counts and order records in parallel, then aggregate.
///
/// Aggregation only runs once all three queries have succeeded.
pub async fn get_stats(pool: &PgPool, config: &AppConfig) -> Result<DashboardStats, AppError> {
    let (customers, vehicles, records) = tokio::try_join!(
        count(pool, "SELECT COUNT(*) FROM customers"),
        count(pool, "SELECT COUNT(*) FROM vehicles"),
        fetch_order_records(pool),
    )?;

    let settings = AggregationSettings::new(config.shop_utc_offset_minutes, config.month_labels);
    let now = Utc::now();
    let aggregates = aggregation::aggregate_with(&records, &settings, now);

    tracing::debug!(
        orders = records.len(),
        months = aggregates.trend.len(),
        "Dashboard statistics computed"
    );

    Ok(DashboardStats {
        customers,
        vehicles,
        status_summary: aggregates.summary,
        monthly_status: aggregates.stacked,
        monthly_totals: aggregates.trend,
        generated_at: now,
    })
}

async fn count(pool: &PgPool, sql: &'static str) -> Result<i64, AppError> {
    Ok(sqlx::query_scalar::<_, i64>(sql).fetch_one(pool).await?)
}

/// Snapshot of the fields the aggregator reads from every order.
pub async fn fetch_order_records(pool: &PgPool) -> Result<Vec<OrderRecord>, AppError> {
    let records = sqlx::query_as::<_, OrderRecord>(
        "SELECT created_at, entry_date, status FROM service_orders",
    )
    .fetch_all(pool)
    .await?;
    Ok(records)
}
