//! openflight - public aviation reference data over a JSON API
//!
//! A local SQLite store is populated from OurAirports/OpenFlights dataset
//! files at startup, then served through a filtered, paginated HTTP API.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod http_server;
pub mod observability;
pub mod rest_api;
pub mod slug;
pub mod store;
