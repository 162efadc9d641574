//! Field matching on normalized values.
//!
//! Every comparison normalizes both sides at call time; stored records are
//! never rewritten.

use crate::aliases::{is_known_province, resolve_province};
use crate::normalize::{NormalizedString, normalize};
use crate::record::{Column, FacilityRecord};

/// Fields consulted by free-text search, OR'd per token.
pub const SEARCH_FIELDS: [Column; 4] = [
    Column::Name,
    Column::FacilityType,
    Column::City,
    Column::Province,
];

/// Fields a city filter may hit. The dataset spells localities in more
/// than one column.
pub const CITY_FIELDS: [Column; 3] = [Column::City, Column::Locality, Column::Provider];

/// True when the normalized needle is a substring of the normalized field.
#[inline]
pub fn field_contains(field: &str, needle: &NormalizedString) -> bool {
    normalize(field).contains(needle)
}

/// Province filter test.
///
/// `wanted` is the output of [`resolve_province`]. A known code only
/// matches stored values resolving to that same code. Unresolved input is
/// compared literally against the normalized stored value.
pub fn province_matches(wanted: &NormalizedString, stored: &str) -> bool {
    if wanted.is_empty() {
        return true;
    }
    if is_known_province(wanted.as_str()) {
        return resolve_province(stored) == *wanted;
    }
    field_contains(stored, wanted)
}

/// City filter test against city, locality, and provider.
pub fn city_matches(wanted: &NormalizedString, record: &FacilityRecord) -> bool {
    if wanted.is_empty() {
        return true;
    }
    CITY_FIELDS
        .iter()
        .any(|column| field_contains(record.get(*column), wanted))
}

/// Token-AND / field-OR test.
///
/// Each token must be found in at least one searchable field; different
/// tokens may hit different fields. No tokens means no constraint.
pub fn matches_all_tokens<S: AsRef<str>>(tokens: &[S], record: &FacilityRecord) -> bool {
    let fields: Vec<NormalizedString> = SEARCH_FIELDS
        .iter()
        .map(|column| normalize(record.get(*column)))
        .collect();

    tokens.iter().all(|token| {
        let token = token.as_ref();
        fields.iter().any(|field| field.as_str().contains(token))
    })
}

/// Exact identifier test on the normalized name.
#[inline]
pub fn name_equals(wanted: &NormalizedString, record: &FacilityRecord) -> bool {
    normalize(&record.name) == *wanted
}
