//! # REST API Module
//!
//! Query-string parsing and error types for the JSON API. Handlers live in
//! `http_server`; this module turns raw parameters into validated store
//! queries and maps failures to HTTP responses.

pub mod errors;
pub mod parser;

pub use errors::{RestError, RestResult};
pub use parser::{pagination_headers, parse_list_query, total_pages, ListQuery};
