//! # Query Parameter Parser
//!
//! Parses list-endpoint query parameters into a validated store query.
//! Unknown keys are rejected rather than ignored, so a typo in a filter
//! name surfaces as a 400 instead of silently returning the unfiltered set.

use std::collections::HashMap;

use super::errors::{RestError, RestResult};
use crate::store::{AirportFilter, Paging};

/// Default number of rows returned when neither `limit` nor `size` is given
pub const DEFAULT_LIMIT: u32 = 50;

/// Maximum rows a single request may ask for
pub const MAX_PAGE_SIZE: u32 = 1000;

/// A parsed and validated list query
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub filter: AirportFilter,
    pub paging: Paging,
}

/// Parse the query-string map for the airports list endpoint.
///
/// Pagination: `page` (default 1) and `size` switch on pagination headers;
/// without `size`, `limit` (default 50) bounds a plain list. When both
/// `size` and `limit` are present, `size` wins. All three must be >= 1.
pub fn parse_list_query(params: &HashMap<String, String>) -> RestResult<ListQuery> {
    let mut filter = AirportFilter::default();
    let mut page: u32 = 1;
    let mut size: Option<u32> = None;
    let mut limit: Option<u32> = None;

    for (key, value) in params {
        match key.as_str() {
            "ident" => filter.ident = Some(value.clone()),
            "icao" => filter.icao = Some(value.clone()),
            "iata" => filter.iata = Some(value.clone()),
            "municipality" => filter.municipality = Some(value.clone()),
            "country_name" => filter.country_name = Some(value.clone()),
            "region_name" => filter.region_name = Some(value.clone()),
            "iso_country" => filter.iso_country = Some(value.clone()),
            "iso_region" => filter.iso_region = Some(value.clone()),
            "type" => filter.airport_type = Some(value.clone()),
            "q" => filter.q = Some(value.clone()),
            "page" => page = parse_positive("page", value)?,
            "size" => size = Some(parse_positive("size", value)?),
            "limit" => limit = Some(parse_positive("limit", value)?),
            _ => return Err(RestError::UnknownParam(key.clone())),
        }
    }

    let paging = match size {
        Some(size) => {
            if size > MAX_PAGE_SIZE {
                return Err(RestError::LimitExceeded(size, MAX_PAGE_SIZE));
            }
            Paging::Page { page, size }
        }
        None => {
            let limit = limit.unwrap_or(DEFAULT_LIMIT);
            if limit > MAX_PAGE_SIZE {
                return Err(RestError::LimitExceeded(limit, MAX_PAGE_SIZE));
            }
            Paging::Limit(limit)
        }
    };

    Ok(ListQuery { filter, paging })
}

/// Parse a 1-based positive integer parameter
fn parse_positive(name: &str, value: &str) -> RestResult<u32> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|v| *v >= 1)
        .ok_or_else(|| RestError::InvalidParam {
            name: name.to_string(),
            value: value.to_string(),
        })
}

/// Ceiling division for the X-Total-Pages header
pub fn total_pages(total: u64, size: u32) -> u64 {
    let size = u64::from(size);
    (total + size - 1) / size
}

/// Pagination response headers for a page-mode query
pub fn pagination_headers(total: u64, page: u32, size: u32) -> [(&'static str, u64); 4] {
    [
        ("X-Total-Count", total),
        ("X-Page", u64::from(page)),
        ("X-Page-Size", u64::from(size)),
        ("X-Total-Pages", total_pages(total, size)),
    ]
}
