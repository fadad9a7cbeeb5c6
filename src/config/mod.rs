use std::env;

use crate::services::aggregation::MonthNames;

/// Shop identity printed on service order sheets and reports.
#[derive(Debug, Clone)]
pub struct CompanyProfile {
    pub name: String,
    pub tax_id: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub redis_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_access_token_expiry_secs: i64,
    pub jwt_refresh_token_expiry_secs: i64,
    pub frontend_url: String,
    pub tls_cert_path: Option<String>,
    pub tls_key_path: Option<String>,
    pub allow_signup: bool,
    /// Offset applied to `created_at` before bucketing orders by month.
    pub shop_utc_offset_minutes: i32,
    pub month_labels: MonthNames,
    pub company: CompanyProfile,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("BACKEND_PORT", 3000),
            jwt_secret: env::var("JWT_SECRET")?,
            jwt_access_token_expiry_secs: parse_or("JWT_ACCESS_TOKEN_EXPIRY_SECS", 900),
            jwt_refresh_token_expiry_secs: parse_or("JWT_REFRESH_TOKEN_EXPIRY_SECS", 604800),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            tls_cert_path: env::var("TLS_CERT_PATH").ok().filter(|s| !s.is_empty()),
            tls_key_path: env::var("TLS_KEY_PATH").ok().filter(|s| !s.is_empty()),
            allow_signup: parse_or("ALLOW_SIGNUP", true),
            shop_utc_offset_minutes: parse_or("SHOP_UTC_OFFSET_MINUTES", 0),
            month_labels: env::var("MONTH_LABELS")
                .ok()
                .and_then(|code| MonthNames::from_code(&code))
                .unwrap_or_default(),
            company: CompanyProfile {
                name: env::var("COMPANY_NAME")
                    .unwrap_or_else(|_| "Oficina Mecânica".to_string()),
                tax_id: env::var("COMPANY_TAX_ID").unwrap_or_default(),
                phone: env::var("COMPANY_PHONE").unwrap_or_default(),
                email: env::var("COMPANY_EMAIL").unwrap_or_default(),
                address: env::var("COMPANY_ADDRESS").unwrap_or_default(),
            },
        })
    }

    /// Certificate and key paths, only when both halves are configured.
    pub fn tls_paths(&self) -> Option<(&str, &str)> {
        self.tls_cert_path.as_deref().zip(self.tls_key_path.as_deref())
    }
}

/// Read and parse an optional variable, falling back on absence or parse failure.
fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
