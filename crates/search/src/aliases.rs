//! Province and facility-type alias tables.
//!
//! Keys are stored pre-normalized so a lookup is one normalization plus a
//! map probe. The tables are built on first use and shared read-only.

use crate::normalize::{NormalizedString, normalize};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Label of the museum alias class.
pub const MUSEUM_CLASS: &str = "museum";

/// Province and territory names, French names, and abbreviations mapped to
/// their two-letter code.
static PROVINCES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Alberta
        ("ab", "ab"),
        ("alta", "ab"),
        ("alberta", "ab"),
        // British Columbia
        ("bc", "bc"),
        ("b c", "bc"),
        ("cb", "bc"),
        ("c b", "bc"),
        ("british columbia", "bc"),
        ("colombie britannique", "bc"),
        // Manitoba
        ("mb", "mb"),
        ("man", "mb"),
        ("manitoba", "mb"),
        // New Brunswick
        ("nb", "nb"),
        ("n b", "nb"),
        ("new brunswick", "nb"),
        ("nouveau brunswick", "nb"),
        // Newfoundland and Labrador
        ("nl", "nl"),
        ("nfld", "nl"),
        ("newfoundland", "nl"),
        ("labrador", "nl"),
        ("newfoundland and labrador", "nl"),
        ("newfoundland & labrador", "nl"),
        ("terre neuve et labrador", "nl"),
        ("t n l", "nl"),
        // Nova Scotia
        ("ns", "ns"),
        ("n s", "ns"),
        ("n e", "ns"),
        ("nova scotia", "ns"),
        ("nouvelle ecosse", "ns"),
        // Northwest Territories
        ("nt", "nt"),
        ("nwt", "nt"),
        ("n w t", "nt"),
        ("tno", "nt"),
        ("t n o", "nt"),
        ("northwest territories", "nt"),
        ("territoires du nord ouest", "nt"),
        // Nunavut
        ("nu", "nu"),
        ("nvt", "nu"),
        ("nunavut", "nu"),
        // Ontario
        ("on", "on"),
        ("ont", "on"),
        ("ontario", "on"),
        // Prince Edward Island
        ("pe", "pe"),
        ("pei", "pe"),
        ("p e i", "pe"),
        ("ipe", "pe"),
        ("i p e", "pe"),
        ("prince edward island", "pe"),
        ("ile du prince edouard", "pe"),
        // Quebec
        ("qc", "qc"),
        ("pq", "qc"),
        ("que", "qc"),
        ("quebec", "qc"),
        // Saskatchewan
        ("sk", "sk"),
        ("sask", "sk"),
        ("saskatchewan", "sk"),
        // Yukon
        ("yt", "yt"),
        ("yk", "yt"),
        ("yukon", "yt"),
        ("yukon territory", "yt"),
    ])
});

/// Stored category strings treated as "museum".
static MUSEUM_TYPES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "museum",
        "museums",
        "gallery",
        "art gallery",
        "art or cultural centre",
        "heritage or historic site",
        "musee",
        "galerie d art",
    ])
});

/// Resolve a free-form province name or abbreviation to its two-letter code.
///
/// Unknown input comes back normalized but otherwise unchanged, so it can
/// still be compared literally against stored values.
pub fn resolve_province(input: &str) -> NormalizedString {
    let key = normalize(input);
    match PROVINCES.get(key.as_str()) {
        Some(code) => NormalizedString::from_static_normalized(code),
        None => key,
    }
}

/// True when `input` names a known province or territory.
pub fn is_known_province(input: &str) -> bool {
    PROVINCES.contains_key(normalize(input).as_str())
}

/// Membership in the museum alias class.
pub fn is_museum_type(stored_type: &str) -> bool {
    MUSEUM_TYPES.contains(normalize(stored_type).as_str())
}

/// Decide whether a user-supplied facility type accepts a stored category.
///
/// - empty user type: always true
/// - `"museum"`: stored type must belong to the museum alias set
/// - anything else: normalized containment, so "galler" or "theatre" match
///   their longer stored forms
pub fn type_matches(user_type: &str, stored_type: &str) -> bool {
    let wanted = normalize(user_type);
    if wanted.is_empty() {
        return true;
    }
    if wanted == MUSEUM_CLASS {
        return is_museum_type(stored_type);
    }
    normalize(stored_type).contains(&wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_province_alias_symmetry() {
        assert_eq!(resolve_province("BC"), resolve_province("British Columbia"));
        assert_eq!(resolve_province("Québec"), "qc");
        assert_eq!(resolve_province("P.E.I."), "pe");
        assert_eq!(resolve_province("Newfoundland and Labrador"), "nl");
    }

    #[test]
    fn test_french_abbreviations_resolve() {
        assert_eq!(resolve_province("C.-B."), "bc");
        assert_eq!(resolve_province("N.-É."), "ns");
        assert_eq!(resolve_province("Î.-P.-É."), "pe");
        assert_eq!(resolve_province("T.N.-O."), "nt");
        assert!(!is_known_province("ne"));
    }

    #[test]
    fn test_unknown_province_passes_through() {
        assert_eq!(resolve_province("  Atlantis "), "atlantis");
        assert!(!is_known_province("Atlantis"));
    }

    #[test]
    fn test_table_keys_are_normalized() {
        for key in PROVINCES.keys() {
            assert_eq!(normalize(key), *key, "province key {key:?}");
        }
        for key in MUSEUM_TYPES.iter() {
            assert_eq!(normalize(key), *key, "museum key {key:?}");
        }
    }

    #[test]
    fn test_museum_class_membership() {
        assert!(type_matches("museum", "Art Gallery"));
        assert!(type_matches("Museum", "Heritage or Historic Site"));
        assert!(!type_matches("museum", "Ice Rink"));
        assert!(!type_matches("museum", "Library or Archives"));
    }

    #[test]
    fn test_type_containment() {
        assert!(type_matches("galler", "Gallery"));
        assert!(type_matches("theatre", "Theatre/performance and concert hall"));
        assert!(!type_matches("libraries", "Library or Archives"));
    }

    #[test]
    fn test_empty_type_matches_everything() {
        assert!(type_matches("", "Ice Rink"));
        assert!(type_matches("  ", ""));
    }
}
