//! Store schema
//!
//! All statements are idempotent (`IF NOT EXISTS`) so the schema can be
//! applied on every open.

use rusqlite::Connection;

/// Schema statements, applied in order
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS airports (
        id INTEGER PRIMARY KEY,
        ident TEXT,
        type TEXT,
        name TEXT,
        latitude_deg REAL,
        longitude_deg REAL,
        elevation_ft INTEGER,
        continent TEXT,
        iso_country TEXT,
        iso_region TEXT,
        municipality TEXT,
        scheduled_service INTEGER NOT NULL DEFAULT 0,
        icao_code TEXT,
        iata_code TEXT,
        gps_code TEXT,
        local_code TEXT,
        slug TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS countries (
        code TEXT PRIMARY KEY,
        name TEXT,
        continent TEXT
    )",
    "CREATE TABLE IF NOT EXISTS regions (
        code TEXT PRIMARY KEY,
        name TEXT,
        local_code TEXT
    )",
    "CREATE TABLE IF NOT EXISTS comments (
        id INTEGER PRIMARY KEY,
        airport_id INTEGER NOT NULL REFERENCES airports(id),
        date TEXT,
        member_nickname TEXT,
        subject TEXT,
        body TEXT
    )",
    "CREATE TABLE IF NOT EXISTS airlines (
        id INTEGER PRIMARY KEY,
        name TEXT,
        iata TEXT,
        icao TEXT,
        callsign TEXT,
        country TEXT,
        active INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS routes (
        airline TEXT NOT NULL,
        source_airport TEXT NOT NULL,
        destination_airport TEXT NOT NULL,
        stops INTEGER,
        equipment TEXT,
        PRIMARY KEY (airline, source_airport, destination_airport)
    )",
    // Indexes backing the filterable columns
    "CREATE INDEX IF NOT EXISTS idx_airports_slug ON airports(slug)",
    "CREATE INDEX IF NOT EXISTS idx_airports_ident ON airports(ident)",
    "CREATE INDEX IF NOT EXISTS idx_airports_iata ON airports(iata_code)",
    "CREATE INDEX IF NOT EXISTS idx_airports_icao ON airports(icao_code)",
    "CREATE INDEX IF NOT EXISTS idx_airports_muni ON airports(municipality)",
    "CREATE INDEX IF NOT EXISTS idx_airports_iso_country ON airports(iso_country)",
    "CREATE INDEX IF NOT EXISTS idx_airports_iso_region ON airports(iso_region)",
    "CREATE INDEX IF NOT EXISTS idx_airports_type ON airports(type)",
    "CREATE INDEX IF NOT EXISTS idx_comments_airport ON comments(airport_id)",
];

/// Apply the schema to a freshly opened connection
pub(crate) fn init(conn: &Connection) -> rusqlite::Result<()> {
    for statement in SCHEMA {
        conn.execute(statement, [])?;
    }
    Ok(())
}
