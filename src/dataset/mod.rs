//! Dataset ingestion
//!
//! Parses the locally downloaded OurAirports CSV files (airports, countries,
//! regions, comments) and OpenFlights `.dat` samples (airlines, routes) into
//! typed records and loads them into the store. Loading is idempotent:
//! records whose primary key already exists are skipped.

mod loader;
mod records;

pub use loader::{load_dir, EntityCount, LoadError, LoadReport, LoadResult};
pub use records::{AirportRow, CommentRow, CountryRow, RegionRow, RowError};
