//! URL slug derivation
//!
//! Airport detail pages are addressed by a slug derived from the airport
//! name, falling back to the ident code and finally the numeric id.

use deunicode::deunicode;

/// Create a URL-friendly slug from a string.
///
/// - Transliterate to ASCII (strip accents)
/// - Lowercase
/// - Replace non-alphanumeric runs with single hyphens, trimmed
///
/// An empty result falls back to the lowercased fallback.
pub fn slugify(text: &str, fallback: Option<&str>) -> String {
    let ascii = deunicode(text).to_lowercase();

    let mut slug = String::with_capacity(ascii.len());
    let mut pending_hyphen = false;
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        return fallback.unwrap_or("").trim().to_lowercase();
    }
    slug
}

/// Slug for an airport: name first, then ident, then the numeric id
pub fn airport_slug(name: Option<&str>, ident: Option<&str>, id: i64) -> String {
    let id_string = id.to_string();
    let fallback = ident.filter(|s| !s.trim().is_empty()).unwrap_or(&id_string);
    match name {
        Some(name) if !name.trim().is_empty() => slugify(name, Some(fallback)),
        _ => fallback.trim().to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_slug() {
        assert_eq!(
            slugify("John F Kennedy International Airport", None),
            "john-f-kennedy-international-airport"
        );
    }

    #[test]
    fn test_accents_transliterated() {
        assert_eq!(slugify("Aéroport d'Orly", None), "aeroport-d-orly");
        assert_eq!(slugify("München Flughafen", None), "munchen-flughafen");
    }

    #[test]
    fn test_hyphen_collapse_and_trim() {
        assert_eq!(slugify("  --Foo  Bar--  ", None), "foo-bar");
    }

    #[test]
    fn test_fallback_when_empty() {
        assert_eq!(slugify("???", Some("KJFK")), "kjfk");
        assert_eq!(slugify("", Some("KJFK")), "kjfk");
    }

    #[test]
    fn test_airport_slug_fallback_chain() {
        assert_eq!(airport_slug(Some("Teterboro Airport"), Some("KTEB"), 507), "teterboro-airport");
        assert_eq!(airport_slug(None, Some("KTEB"), 507), "kteb");
        assert_eq!(airport_slug(None, None, 507), "507");
        assert_eq!(airport_slug(Some("  "), Some(" "), 507), "507");
    }
}
