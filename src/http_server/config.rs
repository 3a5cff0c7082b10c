//! HTTP Server Configuration
//!
//! Bind address and CORS origins, derived from the runtime settings.

use crate::config::Settings;

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    pub host: String,

    /// Port to bind to (default: 8080)
    pub port: u16,

    /// CORS allowed origins; `["*"]` means any origin
    pub cors_origins: Vec<String>,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl HttpServerConfig {
    /// Derive the server configuration from runtime settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
            cors_origins: settings.allowed_origins.clone(),
        }
    }

    /// True when any origin is allowed
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
