//! Airport filter predicates
//!
//! Filters are combined with AND logic; string comparisons are
//! case-insensitive. The `q` term is a substring search across the ident,
//! codes, name, municipality, and the joined country/region names.

/// Common airport type values; everything else is bucketed as `other`
const COMMON_TYPES: &str = "('large_airport','medium_airport','small_airport')";

/// Equality/substring filters over airports and their joined
/// country/region rows
#[derive(Debug, Clone, Default)]
pub struct AirportFilter {
    pub ident: Option<String>,
    pub icao: Option<String>,
    pub iata: Option<String>,
    pub municipality: Option<String>,
    pub country_name: Option<String>,
    pub region_name: Option<String>,
    pub iso_country: Option<String>,
    pub iso_region: Option<String>,
    /// Airport type; the special value `other` matches everything outside
    /// the common large/medium/small types
    pub airport_type: Option<String>,
    /// Unified substring search term
    pub q: Option<String>,
}

/// Pagination mode for airport queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    /// Bounded list without a total count
    Limit(u32),
    /// Page of `size` rows with pre-pagination total (both 1-based, >= 1)
    Page { page: u32, size: u32 },
}

impl AirportFilter {
    /// True when no predicate is set
    pub fn is_empty(&self) -> bool {
        self.ident.is_none()
            && self.icao.is_none()
            && self.iata.is_none()
            && self.municipality.is_none()
            && self.country_name.is_none()
            && self.region_name.is_none()
            && self.iso_country.is_none()
            && self.iso_region.is_none()
            && self.airport_type.is_none()
            && self.q.is_none()
    }

    /// Build the WHERE clause and its parameters.
    ///
    /// Columns are qualified against the aliases used by the store query:
    /// `a` (airports), `c` (countries), `r` (regions). Returns an empty
    /// string when no predicate is set.
    pub(crate) fn where_clause(&self) -> (String, Vec<String>) {
        let mut conditions: Vec<String> = Vec::new();
        let mut params: Vec<String> = Vec::new();

        let mut add_eq = |column: &str, value: &Option<String>| {
            if let Some(value) = value {
                conditions.push(format!("LOWER({}) = LOWER(?)", column));
                params.push(value.clone());
            }
        };

        add_eq("a.ident", &self.ident);
        add_eq("a.icao_code", &self.icao);
        add_eq("a.iata_code", &self.iata);
        add_eq("a.municipality", &self.municipality);
        add_eq("c.name", &self.country_name);
        add_eq("r.name", &self.region_name);
        add_eq("a.iso_country", &self.iso_country);
        add_eq("a.iso_region", &self.iso_region);

        match self.airport_type.as_deref().map(str::trim) {
            Some(t) if t.eq_ignore_ascii_case("other") => {
                conditions.push(format!("LOWER(a.type) NOT IN {}", COMMON_TYPES));
            }
            Some(t) => {
                conditions.push("LOWER(a.type) = LOWER(?)".to_string());
                params.push(t.to_string());
            }
            None => {}
        }

        if let Some(q) = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let like = format!("%{}%", q.to_lowercase());
            let columns = [
                "a.ident",
                "a.icao_code",
                "a.iata_code",
                "a.name",
                "a.municipality",
                "a.iso_country",
                "c.name",
                "r.name",
            ];
            let parts: Vec<String> = columns
                .iter()
                .map(|col| format!("LOWER({}) LIKE ?", col))
                .collect();
            conditions.push(format!("({})", parts.join(" OR ")));
            for _ in columns {
                params.push(like.clone());
            }
        }

        if conditions.is_empty() {
            (String::new(), params)
        } else {
            (format!("WHERE {}", conditions.join(" AND ")), params)
        }
    }
}
