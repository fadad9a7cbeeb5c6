//! Per-customer service history kept alongside formal service orders.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceHistoryEntry {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub service: String,
    pub amount: Decimal,
    pub performed_on: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateHistoryEntry {
    #[validate(length(min = 1, message = "is required"))]
    pub service: String,
    pub amount: Decimal,
    pub performed_on: NaiveDate,
    pub notes: Option<String>,
}
