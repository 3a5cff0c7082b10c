//! Public API Routes
//!
//! List and detail endpoints for the combined airports dataset.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue},
    routing::get,
    Json, Router,
};

use crate::rest_api::{pagination_headers, parse_list_query, RestError, RestResult};
use crate::store::{Airport, Paging, Store};

// ==================
// Shared State
// ==================

/// API state shared across handlers
pub struct ApiState {
    pub store: Arc<Store>,
}

impl ApiState {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

// ==================
// Routes
// ==================

/// Create the public API routes (nested under /api)
pub fn api_routes(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/airports", get(list_airports_handler))
        .route("/airports/:slug", get(airport_details_handler))
        .with_state(state)
}

// ==================
// Handlers
// ==================

/// List airports with filters and pagination.
///
/// Without `size` the response is a plain array bounded by `limit`
/// (default 50). With `size`, pagination headers report the total match
/// count, current page, page size, and total pages.
async fn list_airports_handler(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<HashMap<String, String>>,
) -> RestResult<(HeaderMap, Json<Vec<Airport>>)> {
    let query = parse_list_query(&params)?;
    ensure_dataset_ready(&state.store)?;

    let outcome = state.store.query_airports(&query.filter, &query.paging)?;

    let mut headers = HeaderMap::new();
    if let (Paging::Page { page, size }, Some(total)) = (&query.paging, outcome.total) {
        for (name, value) in pagination_headers(total, *page, *size) {
            headers.insert(name, HeaderValue::from(value));
        }
    }

    Ok((headers, Json(outcome.airports)))
}

/// Airport details by slug
async fn airport_details_handler(
    State(state): State<Arc<ApiState>>,
    Path(slug): Path<String>,
) -> RestResult<Json<Airport>> {
    ensure_dataset_ready(&state.store)?;

    match state.store.airport_by_slug(&slug)? {
        Some(airport) => Ok(Json(airport)),
        None => Err(RestError::NotFound),
    }
}

/// An empty store means the loader never found its input files
fn ensure_dataset_ready(store: &Store) -> RestResult<()> {
    if store.airport_count()? == 0 {
        return Err(RestError::DatasetNotReady(
            "no airports loaded".to_string(),
        ));
    }
    Ok(())
}
