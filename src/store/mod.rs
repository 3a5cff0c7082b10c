//! # Query Store
//!
//! SQLite-backed store for the combined aviation dataset. The schema is
//! applied on every open (idempotent), inserts skip rows whose primary key
//! already exists, and airport queries return enriched records with the
//! joined country, region, and comments embedded.
//!
//! The connection sits behind a mutex; every operation is its own
//! transaction. Ordering of query results is by airport id ascending so
//! pagination is deterministic.

pub mod errors;
mod filter;
mod records;
mod schema;

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension, Row};

pub use errors::{StoreError, StoreResult};
pub use filter::{AirportFilter, Paging};
pub use records::{Airline, Airport, Comment, Country, NewAirport, NewComment, Region, RouteSample};

/// How long a writer waits on a locked database before giving up
const BUSY_TIMEOUT_MS: u64 = 5_000;

/// Columns selected for enriched airport rows, in `airport_from_row` order
const AIRPORT_COLUMNS: &str = "a.id, a.ident, a.type, a.name, a.latitude_deg, a.longitude_deg, \
     a.elevation_ft, a.continent, a.iso_country, a.iso_region, a.municipality, \
     a.scheduled_service, a.icao_code, a.iata_code, a.gps_code, a.local_code, a.slug, \
     c.code, c.name, c.continent, r.code, r.name, r.local_code";

/// Join clause shared by the count and page queries
const AIRPORT_JOINS: &str = "FROM airports a \
     LEFT JOIN countries c ON c.code = a.iso_country \
     LEFT JOIN regions r ON r.code = a.iso_region";

/// One page of query results
#[derive(Debug)]
pub struct QueryOutcome {
    pub airports: Vec<Airport>,
    /// Pre-pagination match count; `None` in limit mode
    pub total: Option<u64>,
}

/// The SQLite-backed query store
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (creating if needed) the database at `path` and apply the schema
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::configure(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (used by tests)
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::Open {
            path: ":memory:".into(),
            source,
        })?;
        Self::configure(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Pragmas and schema for a fresh connection
    fn configure(conn: &Connection) -> StoreResult<()> {
        conn.busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))?;
        // WAL for concurrent readers; in-memory databases report "memory"
        let _mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        schema::init(conn).map_err(StoreError::Schema)?;
        Ok(())
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of airports in the store
    pub fn airport_count(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM airports", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ==================
    // Inserts (if-absent)
    // ==================

    /// Insert an airport unless one with the same id exists.
    /// Returns true when a row was inserted.
    pub fn insert_airport(&self, airport: &NewAirport) -> StoreResult<bool> {
        let changed = self.conn().execute(
            "INSERT OR IGNORE INTO airports (id, ident, type, name, latitude_deg, \
             longitude_deg, elevation_ft, continent, iso_country, iso_region, municipality, \
             scheduled_service, icao_code, iata_code, gps_code, local_code, slug) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            params![
                airport.id,
                airport.ident,
                airport.airport_type,
                airport.name,
                airport.latitude_deg,
                airport.longitude_deg,
                airport.elevation_ft,
                airport.continent,
                airport.iso_country,
                airport.iso_region,
                airport.municipality,
                airport.scheduled_service,
                airport.icao_code,
                airport.iata_code,
                airport.gps_code,
                airport.local_code,
                airport.slug,
            ],
        )?;
        Ok(changed > 0)
    }

    /// Insert a country unless one with the same code exists
    pub fn insert_country(&self, country: &Country) -> StoreResult<bool> {
        let changed = self.conn().execute(
            "INSERT OR IGNORE INTO countries (code, name, continent) VALUES (?1, ?2, ?3)",
            params![country.code, country.name, country.continent],
        )?;
        Ok(changed > 0)
    }

    /// Insert a region unless one with the same code exists
    pub fn insert_region(&self, region: &Region) -> StoreResult<bool> {
        let changed = self.conn().execute(
            "INSERT OR IGNORE INTO regions (code, name, local_code) VALUES (?1, ?2, ?3)",
            params![region.code, region.name, region.local_code],
        )?;
        Ok(changed > 0)
    }

    /// Insert a comment attached to `airport_id` unless the comment id exists
    pub fn insert_comment(&self, comment: &NewComment, airport_id: i64) -> StoreResult<bool> {
        let changed = self.conn().execute(
            "INSERT OR IGNORE INTO comments (id, airport_id, date, member_nickname, subject, body) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                comment.id,
                airport_id,
                comment.date,
                comment.member_nickname,
                comment.subject,
                comment.body,
            ],
        )?;
        Ok(changed > 0)
    }

    /// Insert an airline sample unless one with the same id exists
    pub fn insert_airline(&self, airline: &Airline) -> StoreResult<bool> {
        let changed = self.conn().execute(
            "INSERT OR IGNORE INTO airlines (id, name, iata, icao, callsign, country, active) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                airline.id,
                airline.name,
                airline.iata,
                airline.icao,
                airline.callsign,
                airline.country,
                airline.active,
            ],
        )?;
        Ok(changed > 0)
    }

    /// Insert a route sample unless the (airline, source, destination)
    /// triple exists
    pub fn insert_route(&self, route: &RouteSample) -> StoreResult<bool> {
        let changed = self.conn().execute(
            "INSERT OR IGNORE INTO routes (airline, source_airport, destination_airport, stops, equipment) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                route.airline,
                route.source_airport,
                route.destination_airport,
                route.stops,
                route.equipment,
            ],
        )?;
        Ok(changed > 0)
    }

    // ==================
    // Queries
    // ==================

    /// Resolve a comment's airport: by reference id first, then by ident.
    /// Returns `None` when neither matches a stored airport.
    pub fn resolve_airport(
        &self,
        airport_ref: Option<i64>,
        ident: Option<&str>,
    ) -> StoreResult<Option<i64>> {
        let conn = self.conn();

        if let Some(id) = airport_ref {
            let found: Option<i64> = conn
                .query_row("SELECT id FROM airports WHERE id = ?1", [id], |row| {
                    row.get(0)
                })
                .optional()?;
            if found.is_some() {
                return Ok(found);
            }
        }

        if let Some(ident) = ident {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT id FROM airports WHERE LOWER(ident) = LOWER(?1) ORDER BY id LIMIT 1",
                    [ident],
                    |row| row.get(0),
                )
                .optional()?;
            return Ok(found);
        }

        Ok(None)
    }

    /// Query airports matching `filter`, ordered by id ascending.
    ///
    /// In page mode the pre-pagination total is computed first; a page past
    /// the last one yields an empty list with the total still reflecting
    /// the full filtered set.
    pub fn query_airports(
        &self,
        filter: &AirportFilter,
        paging: &Paging,
    ) -> StoreResult<QueryOutcome> {
        let conn = self.conn();
        let (where_clause, filter_params) = filter.where_clause();

        let total = match paging {
            Paging::Page { .. } => {
                let sql = format!("SELECT COUNT(*) {} {}", AIRPORT_JOINS, where_clause);
                let count: i64 = conn.query_row(
                    &sql,
                    rusqlite::params_from_iter(filter_params.iter()),
                    |row| row.get(0),
                )?;
                Some(count as u64)
            }
            Paging::Limit(_) => None,
        };

        let mut sql = format!(
            "SELECT {} {} {} ORDER BY a.id ASC",
            AIRPORT_COLUMNS, AIRPORT_JOINS, where_clause
        );
        // Bounds are validated integers; formatting them keeps the
        // parameter list identical to the count query above.
        match paging {
            Paging::Limit(limit) => sql.push_str(&format!(" LIMIT {}", limit)),
            Paging::Page { page, size } => {
                let offset = (u64::from(*page) - 1) * u64::from(*size);
                sql.push_str(&format!(" LIMIT {} OFFSET {}", size, offset));
            }
        }

        let mut stmt = conn.prepare(&sql)?;
        let mut airports: Vec<Airport> = stmt
            .query_map(
                rusqlite::params_from_iter(filter_params.iter()),
                Self::airport_from_row,
            )?
            .collect::<Result<_, _>>()?;

        let ids: Vec<i64> = airports.iter().map(|a| a.id).collect();
        let mut comments = Self::comments_for(&conn, &ids)?;
        for airport in &mut airports {
            if let Some(list) = comments.remove(&airport.id) {
                airport.comments = list;
            }
        }

        Ok(QueryOutcome { airports, total })
    }

    /// Look up a single enriched airport by slug
    pub fn airport_by_slug(&self, slug: &str) -> StoreResult<Option<Airport>> {
        let conn = self.conn();
        let sql = format!(
            "SELECT {} {} WHERE a.slug = ?1 ORDER BY a.id LIMIT 1",
            AIRPORT_COLUMNS, AIRPORT_JOINS
        );

        let airport = conn
            .query_row(&sql, [slug], Self::airport_from_row)
            .optional()?;

        match airport {
            Some(mut airport) => {
                let mut comments = Self::comments_for(&conn, &[airport.id])?;
                if let Some(list) = comments.remove(&airport.id) {
                    airport.comments = list;
                }
                Ok(Some(airport))
            }
            None => Ok(None),
        }
    }

    /// Fetch comments for a set of airports in one query
    fn comments_for(
        conn: &Connection,
        airport_ids: &[i64],
    ) -> rusqlite::Result<HashMap<i64, Vec<Comment>>> {
        let mut map: HashMap<i64, Vec<Comment>> = HashMap::new();
        if airport_ids.is_empty() {
            return Ok(map);
        }

        let placeholders = vec!["?"; airport_ids.len()].join(",");
        let sql = format!(
            "SELECT airport_id, id, date, member_nickname, subject, body \
             FROM comments WHERE airport_id IN ({}) ORDER BY id",
            placeholders
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(airport_ids.iter()), |row| {
            Ok((
                row.get::<_, i64>(0)?,
                Comment {
                    id: row.get(1)?,
                    date: row.get(2)?,
                    member_nickname: row.get(3)?,
                    subject: row.get(4)?,
                    body: row.get(5)?,
                },
            ))
        })?;

        for row in rows {
            let (airport_id, comment) = row?;
            map.entry(airport_id).or_default().push(comment);
        }
        Ok(map)
    }

    /// Build an enriched airport (comments attached separately) from a row
    /// selected with [`AIRPORT_COLUMNS`]
    fn airport_from_row(row: &Row<'_>) -> rusqlite::Result<Airport> {
        let country = match row.get::<_, Option<String>>(17)? {
            Some(code) => Some(Country {
                code,
                name: row.get(18)?,
                continent: row.get(19)?,
            }),
            None => None,
        };
        let region = match row.get::<_, Option<String>>(20)? {
            Some(code) => Some(Region {
                code,
                name: row.get(21)?,
                local_code: row.get(22)?,
            }),
            None => None,
        };

        Ok(Airport {
            id: row.get(0)?,
            ident: row.get(1)?,
            airport_type: row.get(2)?,
            name: row.get(3)?,
            latitude_deg: row.get(4)?,
            longitude_deg: row.get(5)?,
            elevation_ft: row.get(6)?,
            continent: row.get(7)?,
            iso_country: row.get(8)?,
            iso_region: row.get(9)?,
            municipality: row.get(10)?,
            scheduled_service: row.get(11)?,
            icao_code: row.get(12)?,
            iata_code: row.get(13)?,
            gps_code: row.get(14)?,
            local_code: row.get(15)?,
            slug: row.get(16)?,
            country,
            region,
            comments: Vec::new(),
        })
    }
}
