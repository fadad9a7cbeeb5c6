//! Customer vehicles with Brazilian licence plate validation.

use std::sync::OnceLock;

use chrono::{DateTime, Datelike, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::customer::{non_blank, required_trimmed};

/// Oldest model year accepted for a vehicle.
pub const MIN_MODEL_YEAR: i32 = 1900;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub model: String,
    pub make: Option<String>,
    pub plate: String,
    pub year: Option<i32>,
    pub mileage: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List row joined with the owner's name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleSummary {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub model: String,
    pub make: Option<String>,
    pub plate: String,
    pub year: Option<i32>,
    pub mileage: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateVehicle {
    pub customer_id: Uuid,
    #[validate(length(min = 1, message = "is required"))]
    pub model: String,
    pub make: Option<String>,
    #[validate(length(min = 1, message = "is required"))]
    pub plate: String,
    pub year: Option<i32>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub mileage: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
pub struct UpdateVehicle {
    pub customer_id: Option<Uuid>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub model: Option<String>,
    pub make: Option<String>,
    pub plate: Option<String>,
    pub year: Option<i32>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub mileage: Option<i32>,
}

fn plate_regex() -> &'static Regex {
    static PLATE: OnceLock<Regex> = OnceLock::new();
    // Legacy ABC1234 and Mercosul ABC1D23, optional hyphen after the letters.
    PLATE.get_or_init(|| {
        Regex::new(r"^[A-Z]{3}-?[0-9][A-Z0-9][0-9]{2}$").expect("plate pattern compiles")
    })
}

/// Upper-case and trim a plate, check it against the accepted formats, and
/// store it without the hyphen so `ABC-1234` and `ABC1234` collide on uniqueness.
pub fn normalize_plate(raw: &str) -> Result<String, AppError> {
    let plate = raw.trim().to_uppercase();
    if plate_regex().is_match(&plate) {
        Ok(plate.replace('-', ""))
    } else {
        Err(AppError::Validation(format!("Invalid licence plate '{}'", raw.trim())))
    }
}

impl UpdateVehicle {
    /// Trim the model (rejecting a blank one), normalize the plate and drop
    /// a blank make, so the partial update cannot store empty required text.
    pub fn normalized(&self) -> Result<Self, AppError> {
        Ok(Self {
            customer_id: self.customer_id,
            model: required_trimmed("model", &self.model)?,
            make: non_blank(&self.make),
            plate: self.plate.as_deref().map(normalize_plate).transpose()?,
            year: self.year,
            mileage: self.mileage,
        })
    }
}

/// Model year must lie between 1900 and the current calendar year.
pub fn check_model_year(year: Option<i32>) -> Result<(), AppError> {
    let current = Utc::now().year();
    match year {
        Some(y) if !(MIN_MODEL_YEAR..=current).contains(&y) => Err(AppError::Validation(
            format!("year must be between {MIN_MODEL_YEAR} and {current}"),
        )),
        _ => Ok(()),
    }
}
