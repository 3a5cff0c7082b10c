//! Stored record types
//!
//! `New*` types are what the loader inserts; `Airport` is the enriched
//! shape returned by queries, with country, region, and comments embedded
//! the way the JSON API serializes them.

use serde::Serialize;

/// A country reference record
#[derive(Debug, Clone, Serialize)]
pub struct Country {
    pub code: String,
    pub name: Option<String>,
    pub continent: Option<String>,
}

/// A region reference record
#[derive(Debug, Clone, Serialize)]
pub struct Region {
    pub code: String,
    pub name: Option<String>,
    pub local_code: Option<String>,
}

/// A comment attached to an airport, as serialized in responses
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: i64,
    pub date: Option<String>,
    pub member_nickname: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

/// A comment as parsed from the source file, before airport resolution
#[derive(Debug, Clone)]
pub struct NewComment {
    pub id: i64,
    /// Numeric airport reference, when present in the source row
    pub airport_ref: Option<i64>,
    /// Ident fallback used when the reference id resolves nothing
    pub airport_ident: Option<String>,
    pub date: Option<String>,
    pub member_nickname: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

/// An airport row ready for insertion
#[derive(Debug, Clone)]
pub struct NewAirport {
    pub id: i64,
    pub ident: Option<String>,
    pub airport_type: Option<String>,
    pub name: Option<String>,
    pub latitude_deg: Option<f64>,
    pub longitude_deg: Option<f64>,
    pub elevation_ft: Option<i64>,
    pub continent: Option<String>,
    pub iso_country: Option<String>,
    pub iso_region: Option<String>,
    pub municipality: Option<String>,
    pub scheduled_service: bool,
    pub icao_code: Option<String>,
    pub iata_code: Option<String>,
    pub gps_code: Option<String>,
    pub local_code: Option<String>,
    pub slug: String,
}

/// An enriched airport as returned by queries
#[derive(Debug, Clone, Serialize)]
pub struct Airport {
    pub id: i64,
    pub ident: Option<String>,
    #[serde(rename = "type")]
    pub airport_type: Option<String>,
    pub name: Option<String>,
    pub latitude_deg: Option<f64>,
    pub longitude_deg: Option<f64>,
    pub elevation_ft: Option<i64>,
    pub continent: Option<String>,
    pub iso_country: Option<String>,
    pub iso_region: Option<String>,
    pub municipality: Option<String>,
    pub scheduled_service: bool,
    pub icao_code: Option<String>,
    pub iata_code: Option<String>,
    pub gps_code: Option<String>,
    pub local_code: Option<String>,
    pub slug: String,
    pub country: Option<Country>,
    pub region: Option<Region>,
    pub comments: Vec<Comment>,
}

/// An airline sample row from `airlines.dat`
#[derive(Debug, Clone)]
pub struct Airline {
    pub id: i64,
    pub name: Option<String>,
    pub iata: Option<String>,
    pub icao: Option<String>,
    pub callsign: Option<String>,
    pub country: Option<String>,
    pub active: bool,
}

/// A route sample row from `routes.dat`
///
/// Routes carry no source primary key; uniqueness is the
/// (airline, source, destination) triple.
#[derive(Debug, Clone)]
pub struct RouteSample {
    pub airline: String,
    pub source_airport: String,
    pub destination_airport: String,
    pub stops: Option<i64>,
    pub equipment: Option<String>,
}
