//! General report: order and customer totals, revenue and per-status counts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::errors::AppError;
use crate::models::service_order::OrderStatus;

/// Per-status totals as grouped by the database.
#[derive(Debug, Clone, FromRow)]
pub struct StatusTotals {
    pub status: String,
    pub orders: i64,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneralReport {
    pub total_orders: i64,
    pub total_customers: i64,
    /// Sum of amounts over finished orders only.
    pub revenue: Decimal,
    pub by_status: Vec<StatusCount>,
    pub generated_at: DateTime<Utc>,
}

/// Build the report from grouped totals.
///
/// The four canonical statuses always appear, in workflow order, followed by
/// any other stored labels sorted alphabetically.
pub fn build_report(
    rows: &[StatusTotals],
    total_customers: i64,
    generated_at: DateTime<Utc>,
) -> GeneralReport {
    let finished = OrderStatus::Finished.label();

    let mut by_status: Vec<StatusCount> = OrderStatus::ALL
        .iter()
        .map(|s| StatusCount {
            status: s.label().to_string(),
            count: 0,
        })
        .collect();
    let mut others: Vec<StatusCount> = Vec::new();
    let mut revenue = Decimal::ZERO;

    for row in rows {
        if row.status == finished {
            revenue += row.amount;
        }
        match by_status.iter_mut().find(|c| c.status == row.status) {
            Some(known) => known.count += row.orders,
            None => others.push(StatusCount {
                status: row.status.clone(),
                count: row.orders,
            }),
        }
    }

    others.sort_by(|a, b| a.status.cmp(&b.status));
    by_status.extend(others);

    GeneralReport {
        total_orders: rows.iter().map(|r| r.orders).sum(),
        total_customers,
        revenue: revenue.round_dp(2),
        by_status,
        generated_at,
    }
}

pub async fn general(pool: &PgPool) -> Result<GeneralReport, AppError> {
    let (rows, customers) = tokio::try_join!(
        async {
            sqlx::query_as::<_, StatusTotals>(
                "SELECT status, COUNT(*) AS orders, COALESCE(SUM(amount), 0) AS amount \
                 FROM service_orders GROUP BY status",
            )
            .fetch_all(pool)
            .await
        },
        async {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
                .fetch_one(pool)
                .await
        },
    )?;

    Ok(build_report(&rows, customers, Utc::now()))
}

/// Totals rows, then a `status,count` table.
pub fn to_csv(report: &GeneralReport) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let write_err = |e: csv::Error| AppError::Internal(format!("CSV write failed: {e}"));

    writer
        .write_record(["total_orders", &report.total_orders.to_string()])
        .map_err(write_err)?;
    writer
        .write_record(["total_customers", &report.total_customers.to_string()])
        .map_err(write_err)?;
    writer
        .write_record(["revenue", &format!("{:.2}", report.revenue)])
        .map_err(write_err)?;
    writer.write_record(["status", "count"]).map_err(write_err)?;
    for row in &report.by_status {
        writer
            .write_record([row.status.as_str(), &row.count.to_string()])
            .map_err(write_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV flush failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV encoding failed: {e}")))
}
