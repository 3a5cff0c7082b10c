//! # OpenFlight HTTP Server Module
//!
//! Axum server for the public dataset API.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/airports` - Filtered, paginated airport list
//! - `/api/airports/{slug}` - Airport details

pub mod api_routes;
pub mod config;
pub mod rate_limit;
pub mod server;
pub mod system_routes;

pub use config::HttpServerConfig;
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use server::HttpServer;
