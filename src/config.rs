//! Runtime Settings
//!
//! Configuration is read from the environment exactly once at startup and
//! carried as an immutable struct. Components receive the values they need;
//! nothing reads the ambient environment after boot.

use std::env;
use std::path::PathBuf;

/// Immutable runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Application name used in log output
    pub app_name: String,

    /// Allowed CORS origins; `["*"]` means any origin
    pub allowed_origins: Vec<String>,

    /// Whether the rate limiter is active
    pub rate_limit_enabled: bool,

    /// Requests accepted per window per client key
    pub rate_limit_requests: u32,

    /// Fixed window length in seconds
    pub rate_limit_window_seconds: u64,

    /// Path prefix the rate limiter applies to
    pub rate_limit_scope: String,

    /// Optional trusted header carrying the client IP (e.g. X-Forwarded-For)
    pub rate_limit_client_ip_header: Option<String>,

    /// SQLite database file
    pub db_path: PathBuf,

    /// Directory holding the downloaded dataset files
    pub data_dir: PathBuf,

    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "OpenFlight".to_string(),
            allowed_origins: vec!["*".to_string()],
            rate_limit_enabled: true,
            rate_limit_requests: 120,
            rate_limit_window_seconds: 60,
            rate_limit_scope: "/api".to_string(),
            rate_limit_client_ip_header: None,
            db_path: PathBuf::from("data/openflight.db"),
            data_dir: PathBuf::from("data/import"),
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Settings {
    /// Build settings from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            app_name: string_var("APP_NAME").unwrap_or(defaults.app_name),
            allowed_origins: string_var("ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or(defaults.allowed_origins),
            rate_limit_enabled: string_var("RATE_LIMIT_ENABLED")
                .map(|v| parse_bool(&v))
                .unwrap_or(defaults.rate_limit_enabled),
            rate_limit_requests: parsed_var("RATE_LIMIT_REQUESTS")
                .unwrap_or(defaults.rate_limit_requests)
                .max(1),
            rate_limit_window_seconds: parsed_var("RATE_LIMIT_WINDOW_SECONDS")
                .unwrap_or(defaults.rate_limit_window_seconds)
                .max(1),
            rate_limit_scope: string_var("RATE_LIMIT_SCOPE").unwrap_or(defaults.rate_limit_scope),
            rate_limit_client_ip_header: string_var("RATE_LIMIT_CLIENT_IP_HEADER"),
            db_path: string_var("DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            data_dir: string_var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            host: string_var("HOST").unwrap_or(defaults.host),
            port: parsed_var("PORT").unwrap_or(defaults.port),
        }
    }
}

/// Read a trimmed, non-empty environment variable
fn string_var(name: &str) -> Option<String> {
    let value = env::var(name).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Read and parse an environment variable, ignoring malformed values
fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    string_var(name).and_then(|v| v.parse().ok())
}

/// Accepts 1/true/yes/on (case-insensitive) as true
fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Comma-separated origin list; empty or `*` means any origin
fn parse_origins(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "*" {
        return vec!["*".to_string()];
    }
    trimmed
        .split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}
