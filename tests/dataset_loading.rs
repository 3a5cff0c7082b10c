//! Dataset loader integration tests
//!
//! Exercises the loader against a fixture directory of source files:
//! idempotent re-runs, numeric coercion, comment attachment, and tolerance
//! of malformed rows and missing files.

use std::fs;
use std::path::Path;

use openflight::dataset;
use openflight::store::{AirportFilter, Paging, Store};
use tempfile::TempDir;

const AIRPORTS_CSV: &str = "\
id,ident,type,name,latitude_deg,longitude_deg,elevation_ft,continent,iso_country,iso_region,municipality,scheduled_service,icao_code,iata_code,gps_code,local_code
3797,KJFK,large_airport,John F Kennedy International Airport,40.639801,-73.7789,13,NA,US,US-NY,New York,yes,KJFK,JFK,KJFK,JFK
507,KTEB,medium_airport,Teterboro Airport,40.850101,-74.060799,9,NA,US,US-NJ,Teterboro,no,KTEB,TEB,KTEB,TEB
2434,EGLL,large_airport,London Heathrow Airport,51.4706,-0.461941,83,EU,GB,GB-ENG,London,yes,EGLL,LHR,EGLL,LHR
9999,XBAD,small_airport,Bad Elevation Field,10.0,10.0,not-a-number,NA,US,US-NY,Nowhere,no,,,,
not-an-id,XGAR,small_airport,Garbage Row,0.0,0.0,0,NA,US,US-NY,,no,,,,
";

const COUNTRIES_CSV: &str = "\
id,code,name,continent,wikipedia_link,keywords
302755,US,United States,NA,,
302634,GB,United Kingdom,EU,,
";

const REGIONS_CSV: &str = "\
id,code,local_code,name,continent,iso_country,wikipedia_link,keywords
306098,US-NY,NY,New York,NA,US,,
306094,US-NJ,NJ,New Jersey,NA,US,,
303992,GB-ENG,ENG,England,EU,GB,,
";

const COMMENTS_CSV: &str = "\
id,threadRef,airportRef,airportIdent,date,memberNickname,subject,body
1,10,3797,KJFK,2019-05-01,avgeek,Great airport,Long queues though
2,11,,KTEB,2020-01-15,pilot99,GA friendly,Quick turnarounds
3,12,424242,ZZZZ,2021-07-04,ghost,Orphan,Matches nothing
4,13,424242,KJFK,2022-03-09,spotter,Ref is stale,Ident still resolves
";

const AIRLINES_DAT: &str = "\
324,\"All Nippon Airways\",\\N,\"NH\",\"ANA\",\"ALL NIPPON\",\"Japan\",\"Y\"
412,\"Aerolineas Argentinas\",\\N,\"AR\",\"ARG\",\"ARGENTINA\",\"Argentina\",\"Y\"
";

const ROUTES_DAT: &str = "\
2B,410,AER,2965,KZN,2990,,0,CR2
2B,410,ASF,2966,KZN,2990,,0,CR2
";

fn write_fixtures(dir: &Path) {
    fs::write(dir.join("airports.csv"), AIRPORTS_CSV).unwrap();
    fs::write(dir.join("countries.csv"), COUNTRIES_CSV).unwrap();
    fs::write(dir.join("regions.csv"), REGIONS_CSV).unwrap();
    fs::write(dir.join("airport-comments.csv"), COMMENTS_CSV).unwrap();
    fs::write(dir.join("airlines.dat"), AIRLINES_DAT).unwrap();
    fs::write(dir.join("routes.dat"), ROUTES_DAT).unwrap();
}

fn airport_by_ident(store: &Store, ident: &str) -> openflight::store::Airport {
    let filter = AirportFilter {
        ident: Some(ident.to_string()),
        ..Default::default()
    };
    let outcome = store.query_airports(&filter, &Paging::Limit(10)).unwrap();
    assert_eq!(outcome.airports.len(), 1, "expected exactly one {}", ident);
    outcome.airports.into_iter().next().unwrap()
}

#[test]
fn test_load_counts_and_idempotence() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let store = Store::open_in_memory().unwrap();

    let first = dataset::load_dir(&store, dir.path()).unwrap();
    // Five airport rows seen, the garbage-id row skipped
    assert_eq!(first.airports.total, 5);
    assert_eq!(first.airports.inserted, 4);
    assert_eq!(first.countries.inserted, 2);
    assert_eq!(first.regions.inserted, 3);
    assert_eq!(first.airlines.inserted, 2);
    assert_eq!(first.routes.inserted, 2);

    // Re-running against the same files inserts nothing new
    let second = dataset::load_dir(&store, dir.path()).unwrap();
    assert_eq!(second.airports.total, 5);
    assert_eq!(second.airports.inserted, 0);
    assert_eq!(second.countries.inserted, 0);
    assert_eq!(second.comments.inserted, 0);
    assert_eq!(second.airlines.inserted, 0);
    assert_eq!(second.routes.inserted, 0);

    assert_eq!(store.airport_count().unwrap(), 4);
}

#[test]
fn test_unparseable_elevation_loads_as_null() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let store = Store::open_in_memory().unwrap();
    dataset::load_dir(&store, dir.path()).unwrap();

    let airport = airport_by_ident(&store, "XBAD");
    assert_eq!(airport.elevation_ft, None);

    let airport = airport_by_ident(&store, "KJFK");
    assert_eq!(airport.elevation_ft, Some(13));
}

#[test]
fn test_comment_attachment_and_discard() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let store = Store::open_in_memory().unwrap();

    let report = dataset::load_dir(&store, dir.path()).unwrap();
    assert_eq!(report.comments.total, 4);
    assert_eq!(report.comments.inserted, 3);
    // The comment matching neither ref nor ident is dropped without error
    assert_eq!(report.comments_discarded, 1);

    // Direct ref and stale-ref-with-known-ident both land on KJFK
    let kjfk = airport_by_ident(&store, "KJFK");
    let ids: Vec<i64> = kjfk.comments.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 4]);

    // Blank ref falls back to the ident
    let kteb = airport_by_ident(&store, "KTEB");
    assert_eq!(kteb.comments.len(), 1);
    assert_eq!(kteb.comments[0].member_nickname.as_deref(), Some("pilot99"));
}

#[test]
fn test_enrichment_from_reference_files() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let store = Store::open_in_memory().unwrap();
    dataset::load_dir(&store, dir.path()).unwrap();

    let kjfk = airport_by_ident(&store, "KJFK");
    assert_eq!(
        kjfk.country.as_ref().unwrap().name.as_deref(),
        Some("United States")
    );
    assert_eq!(kjfk.region.as_ref().unwrap().name.as_deref(), Some("New York"));
    assert_eq!(kjfk.slug, "john-f-kennedy-international-airport");
}

#[test]
fn test_missing_files_are_tolerated() {
    let dir = TempDir::new().unwrap();
    let store = Store::open_in_memory().unwrap();

    let report = dataset::load_dir(&store, dir.path()).unwrap();
    assert_eq!(report.total(), 0);
    assert_eq!(report.inserted(), 0);
    assert_eq!(store.airport_count().unwrap(), 0);
}

#[test]
fn test_airports_without_reference_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("airports.csv"), AIRPORTS_CSV).unwrap();
    let store = Store::open_in_memory().unwrap();

    let report = dataset::load_dir(&store, dir.path()).unwrap();
    assert_eq!(report.airports.inserted, 4);

    // Joins degrade to null references
    let kjfk = airport_by_ident(&store, "KJFK");
    assert!(kjfk.country.is_none());
    assert!(kjfk.region.is_none());
    assert!(kjfk.comments.is_empty());
}

#[test]
fn test_load_against_file_backed_store() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let db_path = dir.path().join("data").join("openflight.db");

    {
        let store = Store::open(&db_path).unwrap();
        dataset::load_dir(&store, dir.path()).unwrap();
    }

    // A fresh connection sees the persisted rows and stays idempotent
    let store = Store::open(&db_path).unwrap();
    assert_eq!(store.airport_count().unwrap(), 4);
    let report = dataset::load_dir(&store, dir.path()).unwrap();
    assert_eq!(report.inserted(), 0);
}
