//! Customer records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCustomer {
    #[validate(length(min = 1, message = "is required"))]
    pub name: String,
    pub phone: Option<String>,
    #[validate(email(message = "must be a valid email"))]
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
pub struct UpdateCustomer {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "must be a valid email"))]
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Drop blank optional strings so forms that post `""` store NULL.
pub fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Trim an optional required field on update. Absent stays absent; present
/// but blank is rejected instead of overwriting the stored value with `""`.
pub fn required_trimmed(field: &str, value: &Option<String>) -> Result<Option<String>, AppError> {
    match value.as_deref().map(str::trim) {
        None => Ok(None),
        Some("") => Err(AppError::Validation(format!("{field} must not be empty"))),
        Some(v) => Ok(Some(v.to_string())),
    }
}

impl UpdateCustomer {
    /// Same clean-up as on create: trimmed name, blank optionals become `None`.
    pub fn normalized(&self) -> Result<Self, AppError> {
        Ok(Self {
            name: required_trimmed("name", &self.name)?,
            phone: non_blank(&self.phone),
            email: non_blank(&self.email),
            address: non_blank(&self.address),
        })
    }
}

impl CreateCustomer {
    /// Trim the name and turn blank optional fields into `None` before validation.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            phone: non_blank(&self.phone),
            email: non_blank(&self.email),
            address: non_blank(&self.address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_optionals_become_none() {
        let input = CreateCustomer {
            name: "  Maria Souza ".to_string(),
            phone: Some("   ".to_string()),
            email: Some(String::new()),
            address: Some("Rua E05".to_string()),
        }
        .normalized();
        assert_eq!(input.name, "Maria Souza");
        assert_eq!(input.phone, None);
        assert_eq!(input.email, None);
        assert_eq!(input.address.as_deref(), Some("Rua E05"));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn name_is_required() {
        let input = CreateCustomer {
            name: "   ".to_string(),
            phone: None,
            email: None,
            address: None,
        }
        .normalized();
        assert!(input.validate().is_err());
    }

    #[test]
    fn malformed_email_rejected() {
        let input = CreateCustomer {
            name: "Carlos".to_string(),
            phone: None,
            email: Some("carlos-at-mail".to_string()),
            address: None,
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn update_blank_optionals_become_none() {
        let patch = UpdateCustomer {
            name: Some(" Maria ".to_string()),
            phone: Some("  ".to_string()),
            email: Some(String::new()),
            address: None,
        }
        .normalized()
        .unwrap();
        assert_eq!(patch.name.as_deref(), Some("Maria"));
        assert_eq!(patch.phone, None);
        assert_eq!(patch.email, None);
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn update_rejects_whitespace_name() {
        let patch = UpdateCustomer {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
        assert!(patch.normalized().is_err());
    }

    #[test]
    fn required_trimmed_keeps_absent_fields_absent() {
        assert_eq!(required_trimmed("model", &None).unwrap(), None);
        assert_eq!(
            required_trimmed("model", &Some(" Gol ".to_string())).unwrap(),
            Some("Gol".to_string())
        );
    }
}
