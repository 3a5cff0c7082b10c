//! Source row types and field coercion
//!
//! CSV rows arrive as text; numeric fields are coerced the way the source
//! data requires: values like `"123.0"` become 123, blank or unparseable
//! optional numerics become null. A row whose required key cannot be
//! coerced is rejected (and skipped by the loader).

use serde::Deserialize;
use thiserror::Error;

use crate::slug;
use crate::store::{Airline, Country, NewAirport, NewComment, Region, RouteSample};

/// Why a source row was rejected
#[derive(Debug, Error)]
pub enum RowError {
    /// Required numeric id was missing or unparseable
    #[error("missing or non-numeric id: {0:?}")]
    BadId(String),

    /// Required key column was empty
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

// ==================
// CSV rows (headered)
// ==================

/// A raw row from `airports.csv`
#[derive(Debug, Default, Deserialize)]
pub struct AirportRow {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub ident: String,
    #[serde(default, rename = "type")]
    pub airport_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub latitude_deg: String,
    #[serde(default)]
    pub longitude_deg: String,
    #[serde(default)]
    pub elevation_ft: String,
    #[serde(default)]
    pub continent: String,
    #[serde(default)]
    pub iso_country: String,
    #[serde(default)]
    pub iso_region: String,
    #[serde(default)]
    pub municipality: String,
    #[serde(default)]
    pub scheduled_service: String,
    #[serde(default)]
    pub icao_code: String,
    #[serde(default)]
    pub iata_code: String,
    #[serde(default)]
    pub gps_code: String,
    #[serde(default)]
    pub local_code: String,
}

impl AirportRow {
    /// Coerce into an insertable record; fails only on a bad id
    pub fn into_record(self) -> Result<NewAirport, RowError> {
        let id = coerce_int(&self.id).ok_or_else(|| RowError::BadId(self.id.clone()))?;

        let ident = non_empty(self.ident);
        let name = non_empty(self.name);
        let slug = slug::airport_slug(name.as_deref(), ident.as_deref(), id);

        Ok(NewAirport {
            id,
            ident,
            airport_type: non_empty(self.airport_type),
            name,
            latitude_deg: coerce_float(&self.latitude_deg),
            longitude_deg: coerce_float(&self.longitude_deg),
            elevation_ft: coerce_int(&self.elevation_ft),
            continent: non_empty(self.continent),
            iso_country: non_empty(self.iso_country),
            iso_region: non_empty(self.iso_region),
            municipality: non_empty(self.municipality),
            scheduled_service: parse_flag(&self.scheduled_service),
            icao_code: non_empty(self.icao_code),
            iata_code: non_empty(self.iata_code),
            gps_code: non_empty(self.gps_code),
            local_code: non_empty(self.local_code),
            slug,
        })
    }
}

/// A raw row from `countries.csv`
#[derive(Debug, Default, Deserialize)]
pub struct CountryRow {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub continent: String,
}

impl CountryRow {
    pub fn into_record(self) -> Result<Country, RowError> {
        let code = non_empty(self.code).ok_or(RowError::MissingField("code"))?;
        Ok(Country {
            code,
            name: non_empty(self.name),
            continent: non_empty(self.continent),
        })
    }
}

/// A raw row from `regions.csv`
#[derive(Debug, Default, Deserialize)]
pub struct RegionRow {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub local_code: String,
}

impl RegionRow {
    pub fn into_record(self) -> Result<Region, RowError> {
        let code = non_empty(self.code).ok_or(RowError::MissingField("code"))?;
        Ok(Region {
            code,
            name: non_empty(self.name),
            local_code: non_empty(self.local_code),
        })
    }
}

/// A raw row from `airport-comments.csv`
///
/// Aliases cover the camelCase headers used by upstream exports.
#[derive(Debug, Default, Deserialize)]
pub struct CommentRow {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "airportRef")]
    pub airport_ref: String,
    #[serde(default, alias = "airportIdent")]
    pub airport_ident: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, alias = "memberNickname")]
    pub member_nickname: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

impl CommentRow {
    pub fn into_record(self) -> Result<NewComment, RowError> {
        let id = coerce_int(&self.id).ok_or_else(|| RowError::BadId(self.id.clone()))?;
        Ok(NewComment {
            id,
            airport_ref: coerce_int(&self.airport_ref),
            airport_ident: non_empty(self.airport_ident),
            date: non_empty(self.date),
            member_nickname: non_empty(self.member_nickname),
            subject: non_empty(self.subject),
            body: non_empty(self.body),
        })
    }
}

// ==================
// .dat rows (headerless)
// ==================

/// Field from a headerless `.dat` record; `\N` marks null
pub(crate) fn dat_field(record: &csv::StringRecord, index: usize) -> Option<String> {
    let raw = record.get(index)?.trim();
    if raw.is_empty() || raw == "\\N" {
        return None;
    }
    Some(raw.to_string())
}

/// Parse an `airlines.dat` record
/// (id, name, alias, iata, icao, callsign, country, active)
pub(crate) fn airline_from_dat(record: &csv::StringRecord) -> Result<Airline, RowError> {
    let raw_id = dat_field(record, 0).unwrap_or_default();
    let id = coerce_int(&raw_id).ok_or(RowError::BadId(raw_id))?;

    Ok(Airline {
        id,
        name: dat_field(record, 1),
        iata: dat_field(record, 3),
        icao: dat_field(record, 4),
        callsign: dat_field(record, 5),
        country: dat_field(record, 6),
        active: dat_field(record, 7).map(|v| parse_flag(&v)).unwrap_or(false),
    })
}

/// Parse a `routes.dat` record
/// (airline, airline_id, src, src_id, dst, dst_id, codeshare, stops, equipment)
pub(crate) fn route_from_dat(record: &csv::StringRecord) -> Result<RouteSample, RowError> {
    let airline = dat_field(record, 0).ok_or(RowError::MissingField("airline"))?;
    let source_airport = dat_field(record, 2).ok_or(RowError::MissingField("source"))?;
    let destination_airport = dat_field(record, 4).ok_or(RowError::MissingField("destination"))?;

    Ok(RouteSample {
        airline,
        source_airport,
        destination_airport,
        stops: dat_field(record, 7).as_deref().and_then(coerce_int_ref),
        equipment: dat_field(record, 8),
    })
}

fn coerce_int_ref(raw: &str) -> Option<i64> {
    coerce_int(raw)
}

// ==================
// Coercion helpers
// ==================

/// Integer coercion: trims, accepts `"123"` and `"123.0"`, else null
pub(crate) fn coerce_int(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    s.parse::<f64>().ok().map(|f| f as i64)
}

/// Float coercion: trims, null when blank or unparseable
pub(crate) fn coerce_float(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    s.parse().ok()
}

/// Trimmed string, null when blank
pub(crate) fn non_empty(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Source flags: yes/y/1/true are truthy
pub(crate) fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "y" | "yes" | "true"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_int() {
        assert_eq!(coerce_int("13"), Some(13));
        assert_eq!(coerce_int(" 123.0 "), Some(123));
        assert_eq!(coerce_int("12.7"), Some(12));
        assert_eq!(coerce_int(""), None);
        assert_eq!(coerce_int("abc"), None);
    }

    #[test]
    fn test_airport_row_coercion() {
        let row = AirportRow {
            id: "3797".to_string(),
            ident: "KJFK".to_string(),
            name: "John F Kennedy International Airport".to_string(),
            elevation_ft: "not-a-number".to_string(),
            scheduled_service: "yes".to_string(),
            ..Default::default()
        };

        let record = row.into_record().unwrap();
        assert_eq!(record.id, 3797);
        // Unparseable optional numeric coerces to null, not a failure
        assert_eq!(record.elevation_ft, None);
        assert!(record.scheduled_service);
        assert_eq!(record.slug, "john-f-kennedy-international-airport");
    }

    #[test]
    fn test_airport_row_bad_id_rejected() {
        let row = AirportRow {
            id: "n/a".to_string(),
            ..Default::default()
        };
        assert!(row.into_record().is_err());
    }

    #[test]
    fn test_comment_row_fallback_fields() {
        let row = CommentRow {
            id: "55".to_string(),
            airport_ref: "".to_string(),
            airport_ident: "KTEB".to_string(),
            body: "Nice little airport".to_string(),
            ..Default::default()
        };

        let record = row.into_record().unwrap();
        assert_eq!(record.airport_ref, None);
        assert_eq!(record.airport_ident.as_deref(), Some("KTEB"));
    }

    #[test]
    fn test_airline_from_dat() {
        let record = csv::StringRecord::from(vec![
            "324", "All Nippon Airways", "ANA All Nippon Airways", "NH", "ANA", "ALL NIPPON",
            "Japan", "Y",
        ]);
        let airline = airline_from_dat(&record).unwrap();
        assert_eq!(airline.id, 324);
        assert_eq!(airline.iata.as_deref(), Some("NH"));
        assert!(airline.active);
    }

    #[test]
    fn test_route_from_dat_null_markers() {
        let record = csv::StringRecord::from(vec![
            "2B", "410", "AER", "2965", "KZN", "2990", "", "0", "CR2",
        ]);
        let route = route_from_dat(&record).unwrap();
        assert_eq!(route.airline, "2B");
        assert_eq!(route.stops, Some(0));

        let record = csv::StringRecord::from(vec!["\\N", "410", "AER"]);
        assert!(route_from_dat(&record).is_err());
    }
}
