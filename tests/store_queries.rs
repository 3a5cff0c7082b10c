//! Query store integration tests
//!
//! Pagination determinism and completeness, case-insensitive filtering,
//! and the unified search term.

use std::collections::HashSet;

use openflight::store::{AirportFilter, Country, NewAirport, Paging, Region, Store};

fn airport(id: i64, ident: &str, country: &str, kind: &str, municipality: &str) -> NewAirport {
    NewAirport {
        id,
        ident: Some(ident.to_string()),
        airport_type: Some(kind.to_string()),
        name: Some(format!("{} Field", ident)),
        latitude_deg: Some(1.0),
        longitude_deg: Some(2.0),
        elevation_ft: Some(100),
        continent: None,
        iso_country: Some(country.to_string()),
        iso_region: None,
        municipality: Some(municipality.to_string()),
        scheduled_service: false,
        icao_code: Some(ident.to_string()),
        iata_code: None,
        gps_code: None,
        local_code: None,
        slug: ident.to_lowercase(),
    }
}

/// 23 airports, ids 1..=23, inserted out of order; odd ids are US
fn seeded_store() -> Store {
    let store = Store::open_in_memory().unwrap();
    store
        .insert_country(&Country {
            code: "US".to_string(),
            name: Some("United States".to_string()),
            continent: Some("NA".to_string()),
        })
        .unwrap();
    store
        .insert_country(&Country {
            code: "GB".to_string(),
            name: Some("United Kingdom".to_string()),
            continent: Some("EU".to_string()),
        })
        .unwrap();
    store
        .insert_region(&Region {
            code: "US-NY".to_string(),
            name: Some("New York".to_string()),
            local_code: Some("NY".to_string()),
        })
        .unwrap();

    let mut ids: Vec<i64> = (1..=23).collect();
    ids.reverse();
    for id in ids {
        let country = if id % 2 == 1 { "US" } else { "GB" };
        let kind = if id % 3 == 0 { "heliport" } else { "small_airport" };
        store
            .insert_airport(&airport(
                id,
                &format!("AP{:02}", id),
                country,
                kind,
                &format!("Town {}", id),
            ))
            .unwrap();
    }
    store
}

#[test]
fn test_pages_cover_result_set_exactly_once() {
    let store = seeded_store();
    let filter = AirportFilter::default();

    let first = store
        .query_airports(&filter, &Paging::Page { page: 1, size: 5 })
        .unwrap();
    let total = first.total.unwrap();
    assert_eq!(total, 23);

    let mut seen: Vec<i64> = Vec::new();
    for page in 1..=5 {
        let outcome = store
            .query_airports(&filter, &Paging::Page { page, size: 5 })
            .unwrap();
        assert_eq!(outcome.total, Some(23));
        seen.extend(outcome.airports.iter().map(|a| a.id));
    }

    // Union of all pages is the full set, each id exactly once
    assert_eq!(seen.len(), 23);
    let unique: HashSet<i64> = seen.iter().copied().collect();
    assert_eq!(unique.len(), 23);
    // Deterministic ordering by id ascending across pages
    let mut sorted = seen.clone();
    sorted.sort_unstable();
    assert_eq!(seen, sorted);
}

#[test]
fn test_page_beyond_last_is_empty_with_full_total() {
    let store = seeded_store();

    let outcome = store
        .query_airports(&AirportFilter::default(), &Paging::Page { page: 9, size: 5 })
        .unwrap();
    assert!(outcome.airports.is_empty());
    assert_eq!(outcome.total, Some(23));
}

#[test]
fn test_filters_are_case_insensitive() {
    let store = seeded_store();

    let upper = AirportFilter {
        iso_country: Some("US".to_string()),
        ..Default::default()
    };
    let lower = AirportFilter {
        iso_country: Some("us".to_string()),
        ..Default::default()
    };

    let upper_ids: Vec<i64> = store
        .query_airports(&upper, &Paging::Limit(100))
        .unwrap()
        .airports
        .iter()
        .map(|a| a.id)
        .collect();
    let lower_ids: Vec<i64> = store
        .query_airports(&lower, &Paging::Limit(100))
        .unwrap()
        .airports
        .iter()
        .map(|a| a.id)
        .collect();

    assert_eq!(upper_ids, lower_ids);
    assert_eq!(upper_ids.len(), 12);
    assert!(upper_ids.iter().all(|id| id % 2 == 1));
}

#[test]
fn test_filter_on_joined_country_name() {
    let store = seeded_store();

    let filter = AirportFilter {
        country_name: Some("united kingdom".to_string()),
        ..Default::default()
    };
    let outcome = store
        .query_airports(&filter, &Paging::Page { page: 1, size: 50 })
        .unwrap();
    assert_eq!(outcome.total, Some(11));
    assert!(outcome
        .airports
        .iter()
        .all(|a| a.iso_country.as_deref() == Some("GB")));
}

#[test]
fn test_type_other_excludes_common_types() {
    let store = seeded_store();

    // All seeded heliports, none of the small_airport rows
    let filter = AirportFilter {
        airport_type: Some("other".to_string()),
        ..Default::default()
    };
    let outcome = store.query_airports(&filter, &Paging::Limit(100)).unwrap();
    assert!(!outcome.airports.is_empty());
    assert!(outcome
        .airports
        .iter()
        .all(|a| a.airport_type.as_deref() == Some("heliport")));
}

#[test]
fn test_unified_search_spans_columns() {
    let store = seeded_store();

    // Matches the municipality column
    let filter = AirportFilter {
        q: Some("town 2".to_string()),
        ..Default::default()
    };
    let outcome = store.query_airports(&filter, &Paging::Limit(100)).unwrap();
    let ids: HashSet<i64> = outcome.airports.iter().map(|a| a.id).collect();
    // "Town 2" is a prefix of Town 2, 20, 21, 22, 23
    assert_eq!(ids, HashSet::from([2, 20, 21, 22, 23]));

    // Matches the joined country name
    let filter = AirportFilter {
        q: Some("kingdom".to_string()),
        ..Default::default()
    };
    let outcome = store.query_airports(&filter, &Paging::Limit(100)).unwrap();
    assert_eq!(outcome.airports.len(), 11);
}

#[test]
fn test_filter_and_pagination_compose() {
    let store = seeded_store();

    let filter = AirportFilter {
        iso_country: Some("US".to_string()),
        ..Default::default()
    };
    let outcome = store
        .query_airports(&filter, &Paging::Page { page: 2, size: 5 })
        .unwrap();
    assert_eq!(outcome.total, Some(12));
    assert_eq!(outcome.airports.len(), 5);
    // Second page of odd ids ascending: 1,3,5,7,9 | 11,13,15,17,19
    let ids: Vec<i64> = outcome.airports.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![11, 13, 15, 17, 19]);
}
