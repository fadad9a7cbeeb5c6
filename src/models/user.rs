//! User model with role-based access control.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::customer::{non_blank, required_trimmed};

/// Shop staff role. Admins see the dashboard, reports and user management.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[sqlx(rename = "funcionario")]
    #[serde(rename = "funcionario")]
    Employee,
}

impl UserRole {
    /// Label used in JWT claims, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Employee => "funcionario",
        }
    }

    pub fn from_claim(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "funcionario" => Some(Self::Employee),
            _ => None,
        }
    }
}

/// User row, including the password hash. Never returned by the API.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub failed_login_attempts: i32,
    pub locked_until: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// API view of a user without credentials or lockout state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            display_name: u.display_name,
            phone: u.phone,
            role: u.role,
            is_active: u.is_active,
            last_login: u.last_login,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, message = "is required"))]
    pub username: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "must have at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "is required"))]
    pub display_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
}

/// Public self sign-up; always creates an employee account.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUp {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "must have at least 6 characters"))]
    pub password: String,
    pub username: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub username: Option<String>,
    #[validate(email(message = "must be a valid email"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

impl UpdateUser {
    /// Trim and reject blank names, lowercase the email and drop a blank phone.
    pub fn normalized(&self) -> Result<Self, AppError> {
        Ok(Self {
            username: required_trimmed("username", &self.username)?,
            email: self.email.as_deref().map(|e| e.trim().to_lowercase()),
            display_name: required_trimmed("display_name", &self.display_name)?,
            phone: non_blank(&self.phone),
            role: self.role,
            is_active: self.is_active,
        })
    }
}
