//! # Dataset Loader
//!
//! Reads the source files from a directory and populates the store.
//! Idempotent: every insert is keyed on the record's primary key, so
//! re-running against the same files changes nothing. A malformed row is
//! skipped and logged; a missing file leaves that entity absent and logs a
//! warning. Only store failures abort a load.

use std::path::Path;

use csv::ReaderBuilder;
use thiserror::Error;

use super::records::{self, AirportRow, CommentRow, CountryRow, RegionRow};
use crate::observability::Logger;
use crate::store::{Store, StoreError};

/// Expected source file names
const COUNTRIES_FILE: &str = "countries.csv";
const REGIONS_FILE: &str = "regions.csv";
const AIRPORTS_FILE: &str = "airports.csv";
const COMMENTS_FILE: &str = "airport-comments.csv";
const AIRLINES_FILE: &str = "airlines.dat";
const ROUTES_FILE: &str = "routes.dat";

/// Result type for load operations
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors that abort a load
#[derive(Debug, Error)]
pub enum LoadError {
    /// The store rejected an operation
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Inserted vs. total rows seen for one entity
#[derive(Debug, Default, Clone, Copy)]
pub struct EntityCount {
    pub inserted: u64,
    pub total: u64,
}

/// Per-entity load counts
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadReport {
    pub countries: EntityCount,
    pub regions: EntityCount,
    pub airports: EntityCount,
    pub comments: EntityCount,
    /// Comments matching neither a known airport id nor a known ident
    pub comments_discarded: u64,
    pub airlines: EntityCount,
    pub routes: EntityCount,
}

impl LoadReport {
    /// Rows inserted across all entities
    pub fn inserted(&self) -> u64 {
        self.countries.inserted
            + self.regions.inserted
            + self.airports.inserted
            + self.comments.inserted
            + self.airlines.inserted
            + self.routes.inserted
    }

    /// Rows seen across all entities
    pub fn total(&self) -> u64 {
        self.countries.total
            + self.regions.total
            + self.airports.total
            + self.comments.total
            + self.airlines.total
            + self.routes.total
    }
}

/// Load every known source file from `dir` into the store.
///
/// Reference entities load first so airports and comments can resolve
/// against them. Safe to call on every process start.
pub fn load_dir(store: &Store, dir: &Path) -> LoadResult<LoadReport> {
    let mut report = LoadReport::default();

    report.countries = load_countries(store, &dir.join(COUNTRIES_FILE))?;
    report.regions = load_regions(store, &dir.join(REGIONS_FILE))?;
    report.airports = load_airports(store, &dir.join(AIRPORTS_FILE))?;
    (report.comments, report.comments_discarded) =
        load_comments(store, &dir.join(COMMENTS_FILE))?;
    report.airlines = load_airlines(store, &dir.join(AIRLINES_FILE))?;
    report.routes = load_routes(store, &dir.join(ROUTES_FILE))?;

    Ok(report)
}

/// Open a headered CSV reader, logging a warning when the file is absent
fn open_csv(path: &Path) -> Option<csv::Reader<std::fs::File>> {
    match ReaderBuilder::new().flexible(true).from_path(path) {
        Ok(reader) => Some(reader),
        Err(e) => {
            Logger::warn(
                "DATASET_FILE_MISSING",
                &[
                    ("path", &path.display().to_string()),
                    ("error", &e.to_string()),
                ],
            );
            None
        }
    }
}

/// Open a headerless `.dat` reader, logging a warning when the file is absent
fn open_dat(path: &Path) -> Option<csv::Reader<std::fs::File>> {
    match ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
    {
        Ok(reader) => Some(reader),
        Err(e) => {
            Logger::warn(
                "DATASET_FILE_MISSING",
                &[
                    ("path", &path.display().to_string()),
                    ("error", &e.to_string()),
                ],
            );
            None
        }
    }
}

fn log_row_skipped(file: &str, line: u64, reason: &str) {
    Logger::warn(
        "ROW_SKIPPED",
        &[
            ("file", file),
            ("line", &line.to_string()),
            ("reason", reason),
        ],
    );
}

fn log_file_loaded(file: &str, count: &EntityCount) {
    Logger::info(
        "DATASET_FILE_LOADED",
        &[
            ("file", file),
            ("inserted", &count.inserted.to_string()),
            ("total", &count.total.to_string()),
        ],
    );
}

fn load_countries(store: &Store, path: &Path) -> LoadResult<EntityCount> {
    let mut count = EntityCount::default();
    let Some(mut reader) = open_csv(path) else {
        return Ok(count);
    };

    for result in reader.deserialize::<CountryRow>() {
        count.total += 1;
        let record = match result.map_err(|e| e.to_string()).and_then(|row| {
            row.into_record().map_err(|e| e.to_string())
        }) {
            Ok(record) => record,
            Err(reason) => {
                log_row_skipped(COUNTRIES_FILE, count.total, &reason);
                continue;
            }
        };
        if store.insert_country(&record)? {
            count.inserted += 1;
        }
    }

    log_file_loaded(COUNTRIES_FILE, &count);
    Ok(count)
}

fn load_regions(store: &Store, path: &Path) -> LoadResult<EntityCount> {
    let mut count = EntityCount::default();
    let Some(mut reader) = open_csv(path) else {
        return Ok(count);
    };

    for result in reader.deserialize::<RegionRow>() {
        count.total += 1;
        let record = match result.map_err(|e| e.to_string()).and_then(|row| {
            row.into_record().map_err(|e| e.to_string())
        }) {
            Ok(record) => record,
            Err(reason) => {
                log_row_skipped(REGIONS_FILE, count.total, &reason);
                continue;
            }
        };
        if store.insert_region(&record)? {
            count.inserted += 1;
        }
    }

    log_file_loaded(REGIONS_FILE, &count);
    Ok(count)
}

fn load_airports(store: &Store, path: &Path) -> LoadResult<EntityCount> {
    let mut count = EntityCount::default();
    let Some(mut reader) = open_csv(path) else {
        return Ok(count);
    };

    for result in reader.deserialize::<AirportRow>() {
        count.total += 1;
        let record = match result.map_err(|e| e.to_string()).and_then(|row| {
            row.into_record().map_err(|e| e.to_string())
        }) {
            Ok(record) => record,
            Err(reason) => {
                log_row_skipped(AIRPORTS_FILE, count.total, &reason);
                continue;
            }
        };
        if store.insert_airport(&record)? {
            count.inserted += 1;
        }
    }

    log_file_loaded(AIRPORTS_FILE, &count);
    Ok(count)
}

/// Comments resolve to an airport by reference id, falling back to ident;
/// a comment matching neither is discarded. Returns (counts, discarded).
fn load_comments(store: &Store, path: &Path) -> LoadResult<(EntityCount, u64)> {
    let mut count = EntityCount::default();
    let mut discarded = 0;
    let Some(mut reader) = open_csv(path) else {
        return Ok((count, discarded));
    };

    for result in reader.deserialize::<CommentRow>() {
        count.total += 1;
        let record = match result.map_err(|e| e.to_string()).and_then(|row| {
            row.into_record().map_err(|e| e.to_string())
        }) {
            Ok(record) => record,
            Err(reason) => {
                log_row_skipped(COMMENTS_FILE, count.total, &reason);
                continue;
            }
        };

        match store.resolve_airport(record.airport_ref, record.airport_ident.as_deref())? {
            Some(airport_id) => {
                if store.insert_comment(&record, airport_id)? {
                    count.inserted += 1;
                }
            }
            None => discarded += 1,
        }
    }

    if discarded > 0 {
        Logger::warn(
            "COMMENTS_DISCARDED",
            &[
                ("file", COMMENTS_FILE),
                ("count", &discarded.to_string()),
            ],
        );
    }
    log_file_loaded(COMMENTS_FILE, &count);
    Ok((count, discarded))
}

fn load_airlines(store: &Store, path: &Path) -> LoadResult<EntityCount> {
    let mut count = EntityCount::default();
    let Some(mut reader) = open_dat(path) else {
        return Ok(count);
    };

    for result in reader.records() {
        count.total += 1;
        let airline = match result.map_err(|e| e.to_string()).and_then(|record| {
            records::airline_from_dat(&record).map_err(|e| e.to_string())
        }) {
            Ok(airline) => airline,
            Err(reason) => {
                log_row_skipped(AIRLINES_FILE, count.total, &reason);
                continue;
            }
        };
        if store.insert_airline(&airline)? {
            count.inserted += 1;
        }
    }

    log_file_loaded(AIRLINES_FILE, &count);
    Ok(count)
}

fn load_routes(store: &Store, path: &Path) -> LoadResult<EntityCount> {
    let mut count = EntityCount::default();
    let Some(mut reader) = open_dat(path) else {
        return Ok(count);
    };

    for result in reader.records() {
        count.total += 1;
        let route = match result.map_err(|e| e.to_string()).and_then(|record| {
            records::route_from_dat(&record).map_err(|e| e.to_string())
        }) {
            Ok(route) => route,
            Err(reason) => {
                log_row_skipped(ROUTES_FILE, count.total, &reason);
                continue;
            }
        };
        if store.insert_route(&route)? {
            count.inserted += 1;
        }
    }

    log_file_loaded(ROUTES_FILE, &count);
    Ok(count)
}
