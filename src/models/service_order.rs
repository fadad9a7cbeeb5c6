//! Service orders: the unit of repair work tracked by status and amount.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

/// Canonical status labels accepted on writes.
///
/// The column itself is free text, so rows written by older clients may hold
/// labels outside this set; readers must go through [`StatusLabel::classify`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "Aberta")]
    Open,
    #[serde(rename = "Em Andamento")]
    InProgress,
    #[serde(rename = "Finalizada")]
    Finished,
    #[serde(rename = "Cancelada")]
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Open,
        OrderStatus::InProgress,
        OrderStatus::Finished,
        OrderStatus::Cancelled,
    ];

    /// Stored and displayed label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Aberta",
            Self::InProgress => "Em Andamento",
            Self::Finished => "Finalizada",
            Self::Cancelled => "Cancelada",
        }
    }

    /// Exact match against the canonical labels.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

/// A stored status value: one of the canonical labels, or anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLabel<'a> {
    Known(OrderStatus),
    Unrecognized(&'a str),
}

impl<'a> StatusLabel<'a> {
    pub fn classify(raw: &'a str) -> Self {
        match OrderStatus::from_label(raw) {
            Some(status) => Self::Known(status),
            None => Self::Unrecognized(raw),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceOrder {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub entry_date: NaiveDate,
    pub reported_problem: Option<String>,
    pub diagnosis: Option<String>,
    pub services_performed: Option<String>,
    pub amount: Decimal,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Order joined with customer and vehicle names, for lists and printed sheets.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceOrderDetails {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub customer_name: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_plate: Option<String>,
    pub entry_date: NaiveDate,
    pub reported_problem: Option<String>,
    pub diagnosis: Option<String>,
    pub services_performed: Option<String>,
    pub amount: Decimal,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceOrder {
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub entry_date: NaiveDate,
    pub reported_problem: Option<String>,
    pub diagnosis: Option<String>,
    pub services_performed: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateServiceOrder {
    pub customer_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub entry_date: Option<NaiveDate>,
    pub reported_problem: Option<String>,
    pub diagnosis: Option<String>,
    pub services_performed: Option<String>,
    pub amount: Option<Decimal>,
    pub status: Option<OrderStatus>,
}

/// Amounts are money: never negative.
pub fn check_amount(amount: &Decimal) -> Result<(), AppError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AppError::Validation("amount must not be negative".to_string()));
    }
    Ok(())
}

/// Minimal order projection consumed by the dashboard aggregation.
///
/// Decoding from a JSON snapshot is lenient: a timestamp that is not a string
/// or does not parse is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct OrderRecord {
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub entry_date: Option<NaiveDate>,
    pub status: String,
}

impl OrderRecord {
    pub fn new(
        created_at: Option<DateTime<Utc>>,
        entry_date: Option<NaiveDate>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            created_at,
            entry_date,
            status: status.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawField {
    Text(String),
    Other(IgnoredAny),
}

fn raw_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<RawField>::deserialize(deserializer)? {
        Some(RawField::Text(s)) => Some(s),
        Some(RawField::Other(_)) | None => None,
    })
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(raw_text(deserializer)?.and_then(|s| parse_timestamp(&s)))
}

fn lenient_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error> {
    Ok(raw_text(deserializer)?.and_then(|s| parse_date(&s)))
}

/// Parse RFC 3339, `YYYY-MM-DD HH:MM:SS[.fff]` (UTC) or a bare date (UTC midnight).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse a bare date, or take the date part of a full timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(raw).map(|ts| ts.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn status_labels_round_trip_through_serde() {
        for status in OrderStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.label()));
            assert_eq!(OrderStatus::from_label(status.label()), Some(status));
        }
    }

    #[test]
    fn status_match_is_exact() {
        assert_eq!(
            StatusLabel::classify("Em andamento"),
            StatusLabel::Unrecognized("Em andamento")
        );
        assert_eq!(
            StatusLabel::classify("Concluída"),
            StatusLabel::Unrecognized("Concluída")
        );
        assert_eq!(
            StatusLabel::classify("Finalizada"),
            StatusLabel::Known(OrderStatus::Finished)
        );
    }

    #[test]
    fn create_order_defaults_to_open() {
        let body = serde_json::json!({
            "customer_id": Uuid::nil(),
            "vehicle_id": Uuid::nil(),
            "entry_date": "2024-03-10",
            "amount": "150.00"
        });
        let input: CreateServiceOrder = serde_json::from_value(body).unwrap();
        assert_eq!(input.status, OrderStatus::Open);
        assert_eq!(input.amount, Decimal::new(15000, 2));
    }

    #[test]
    fn create_order_rejects_unknown_status() {
        let body = serde_json::json!({
            "customer_id": Uuid::nil(),
            "vehicle_id": Uuid::nil(),
            "entry_date": "2024-03-10",
            "amount": 10,
            "status": "Concluída"
        });
        assert!(serde_json::from_value::<CreateServiceOrder>(body).is_err());
    }

    #[test]
    fn negative_amount_rejected() {
        assert!(check_amount(&Decimal::new(-1, 2)).is_err());
        assert!(check_amount(&Decimal::ZERO).is_ok());
        assert!(check_amount(&Decimal::new(9990, 2)).is_ok());
    }

    #[test]
    fn record_decodes_timestamp_formats() {
        let record: OrderRecord = serde_json::from_value(serde_json::json!({
            "created_at": "2024-01-15T10:30:00-04:00",
            "entry_date": "2024-01-14",
            "status": "Aberta"
        }))
        .unwrap();
        assert_eq!(
            record.created_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap())
        );
        assert_eq!(record.entry_date, NaiveDate::from_ymd_opt(2024, 1, 14));

        assert_eq!(
            parse_timestamp("2024-02-01 08:00:00"),
            Some(Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2024-02-01"),
            Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn record_treats_garbage_timestamps_as_missing() {
        let record: OrderRecord = serde_json::from_value(serde_json::json!({
            "created_at": "not a date",
            "entry_date": 20240114,
            "status": "Aberta"
        }))
        .unwrap();
        assert_eq!(record.created_at, None);
        assert_eq!(record.entry_date, None);

        let record: OrderRecord =
            serde_json::from_value(serde_json::json!({ "status": "Finalizada" })).unwrap();
        assert_eq!(record, OrderRecord::new(None, None, "Finalizada"));
    }
}
