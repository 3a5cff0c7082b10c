//! # HTTP Server
//!
//! Builds the combined router (system routes, public API, rate limiting,
//! CORS) and serves it. State is constructed once here and injected into
//! the route modules.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use super::api_routes::{api_routes, ApiState};
use super::config::HttpServerConfig;
use super::rate_limit::{rate_limit_middleware, RateLimitConfig, RateLimiter};
use super::system_routes::system_routes;
use crate::config::Settings;
use crate::observability::Logger;
use crate::store::Store;

/// HTTP server for the OpenFlight API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server from runtime settings and an opened store
    pub fn new(settings: &Settings, store: Arc<Store>) -> Self {
        let config = HttpServerConfig::from_settings(settings);
        let router = Self::build_router(settings, &config, store);
        Self { config, router }
    }

    /// Build the combined router with all endpoints and middleware
    fn build_router(settings: &Settings, config: &HttpServerConfig, store: Arc<Store>) -> Router {
        let api_state = Arc::new(ApiState::new(store));
        let limiter = Arc::new(RateLimiter::new(RateLimitConfig::from_settings(settings)));

        // Configure CORS from settings
        let cors = if config.allows_any_origin() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            use tower_http::cors::AllowOrigin;
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            // Health check at root level
            .merge(system_routes())
            // Public dataset API under /api
            .nest("/api", api_routes(api_state))
            // Rate limiting; the middleware scopes itself to its path prefix
            .layer(middleware::from_fn_with_state(
                limiter,
                rate_limit_middleware,
            ))
            // CORS outermost so preflight requests are answered directly
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("{}", e)))?;

        Logger::info("HTTP_SERVER_STARTED", &[("addr", &addr.to_string())]);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(
            listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;

        Ok(())
    }
}
