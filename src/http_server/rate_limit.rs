//! # Fixed-Window Rate Limiter
//!
//! In-memory request counter per client key. Windows reset at discrete
//! interval boundaries (`now - now % window`). State is process-local and
//! mutex-guarded; restarts reset all counters. Constructed once per process
//! and injected into the router as middleware state.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::config::Settings;

/// Entry count above which stale windows are pruned
const PRUNE_THRESHOLD: usize = 1024;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Whether checks are performed at all
    pub enabled: bool,

    /// Requests accepted per window per client key
    pub limit: u32,

    /// Fixed window length in seconds
    pub window_seconds: u64,

    /// Only paths starting with this prefix are checked
    pub scope_prefix: String,

    /// Trusted header carrying the client IP; first entry of a
    /// comma-separated list is used
    pub client_ip_header: Option<String>,
}

impl RateLimitConfig {
    /// Derive the limiter configuration from runtime settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            enabled: settings.rate_limit_enabled,
            limit: settings.rate_limit_requests.max(1),
            window_seconds: settings.rate_limit_window_seconds.max(1),
            scope_prefix: if settings.rate_limit_scope.is_empty() {
                "/api".to_string()
            } else {
                settings.rate_limit_scope.clone()
            },
            client_ip_header: settings.rate_limit_client_ip_header.clone(),
        }
    }
}

/// Outcome of a check-and-record operation
#[derive(Debug, Clone, Copy)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u32,
    /// Requests left in the current window
    pub remaining: u32,
    /// Seconds until the window resets (>= 1)
    pub retry_after_seconds: u64,
}

/// Fixed-window counter keyed by (client key, window start)
pub struct RateLimiter {
    config: RateLimitConfig,
    counts: Mutex<HashMap<(String, u64), u32>>,
}

impl RateLimiter {
    /// Create a limiter with the given configuration
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            counts: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Check and record a request for `key` at the current time
    pub fn check(&self, key: &str) -> Decision {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.check_at(key, now)
    }

    /// Check and record a request for `key` at `now` (unix seconds).
    ///
    /// Counts the request even when it is rejected; the window only clears
    /// at the interval boundary.
    pub fn check_at(&self, key: &str, now: u64) -> Decision {
        let window = self.config.window_seconds;
        let window_start = now - (now % window);

        let mut counts = self.counts.lock().unwrap_or_else(|e| e.into_inner());

        // Bound memory by dropping windows that can no longer be hit
        if counts.len() > PRUNE_THRESHOLD {
            counts.retain(|(_, start), _| *start >= window_start);
        }

        let count = counts.entry((key.to_string(), window_start)).or_insert(0);
        *count += 1;

        Decision {
            allowed: *count <= self.config.limit,
            limit: self.config.limit,
            remaining: self.config.limit.saturating_sub(*count),
            retry_after_seconds: (window - (now - window_start)).max(1),
        }
    }

    /// Derive the client key for a request: trusted header first, then the
    /// transport remote address, then a shared anonymous bucket
    pub fn client_key(&self, request: &Request) -> String {
        if let Some(header) = &self.config.client_ip_header {
            if let Some(value) = request
                .headers()
                .get(header.as_str())
                .and_then(|v| v.to_str().ok())
            {
                let first = value.split(',').next().unwrap_or("").trim();
                if !first.is_empty() {
                    return first.to_string();
                }
            }
        }

        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip().to_string())
            .unwrap_or_else(|| "anonymous".to_string())
    }
}

/// Axum middleware applying the limiter to its configured path prefix
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let config = limiter.config();
    if !config.enabled || !request.uri().path().starts_with(&config.scope_prefix) {
        return next.run(request).await;
    }

    let key = limiter.client_key(&request);
    let decision = limiter.check(&key);

    if !decision.allowed {
        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "detail": "Too Many Requests" })),
        )
            .into_response();
        let headers = response.headers_mut();
        headers.insert("X-RateLimit-Limit", HeaderValue::from(decision.limit));
        headers.insert("X-RateLimit-Remaining", HeaderValue::from(0u32));
        headers.insert(
            "Retry-After",
            HeaderValue::from(decision.retry_after_seconds),
        );
        return response;
    }

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Limit", HeaderValue::from(decision.limit));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from(decision.remaining));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(limit: u32, window_seconds: u64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            enabled: true,
            limit,
            window_seconds,
            scope_prefix: "/api".to_string(),
            client_ip_header: None,
        })
    }

    #[test]
    fn test_fourth_request_rejected_within_window() {
        let limiter = limiter(3, 60);
        assert!(limiter.check_at("1.2.3.4", 100).allowed);
        assert!(limiter.check_at("1.2.3.4", 110).allowed);
        assert!(limiter.check_at("1.2.3.4", 115).allowed);
        assert!(!limiter.check_at("1.2.3.4", 119).allowed);
    }

    #[test]
    fn test_window_elapse_resets_counter() {
        let limiter = limiter(3, 60);
        for t in [100, 101, 102, 103] {
            limiter.check_at("1.2.3.4", t);
        }
        // 100 falls in the [60, 120) window; 125 starts a fresh one
        assert!(limiter.check_at("1.2.3.4", 125).allowed);
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = limiter(1, 60);
        assert!(limiter.check_at("1.2.3.4", 100).allowed);
        assert!(limiter.check_at("5.6.7.8", 100).allowed);
        assert!(!limiter.check_at("1.2.3.4", 101).allowed);
    }

    #[test]
    fn test_remaining_and_retry_after() {
        let limiter = limiter(3, 60);
        let decision = limiter.check_at("1.2.3.4", 60);
        assert_eq!(decision.remaining, 2);
        assert_eq!(decision.retry_after_seconds, 60);

        let decision = limiter.check_at("1.2.3.4", 119);
        assert_eq!(decision.remaining, 1);
        assert_eq!(decision.retry_after_seconds, 1);
    }

    #[test]
    fn test_stale_windows_pruned() {
        let limiter = limiter(3, 60);
        for i in 0..(PRUNE_THRESHOLD + 10) {
            limiter.check_at(&format!("10.0.0.{}", i), 100);
        }
        // A check in a later window triggers pruning of the old one
        limiter.check_at("1.2.3.4", 100 + 120);
        let counts = limiter.counts.lock().unwrap();
        assert!(counts.len() <= 2);
    }
}
