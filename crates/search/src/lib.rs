//! Normalization and matching engine for the ODCAF facility catalog.
//!
//! This crate provides:
//! - Accent-, case- and punctuation-insensitive text normalization
//! - Province and facility-type alias tables
//! - Field matching (containment, token-AND / field-OR)
//! - Stateless filter queries, free-text search, and name lookups over a
//!   read-only [`FacilityStore`]
//!
//! # Example
//!
//! ```
//! use odcaf_search::{FacilityQuery, FacilityRecord, Limit, MemoryStore, QueryEngine};
//!
//! let store = MemoryStore::new(vec![
//!     FacilityRecord::new("Royal BC Museum", "Museum", "Victoria", "bc"),
//!     FacilityRecord::new("Centennial Arena", "Ice Rink", "Victoria", "bc"),
//! ]);
//! let engine = QueryEngine::new(store);
//!
//! let query = FacilityQuery::new()
//!     .with_province("British Columbia")
//!     .with_facility_type("museum");
//! let hits = engine.query_facilities(&query, Limit::default()).unwrap();
//! assert_eq!(hits.len(), 1);
//! ```

mod aliases;
mod error;
mod matcher;
mod normalize;
mod query;
mod record;
mod store;

pub use aliases::{MUSEUM_CLASS, is_known_province, is_museum_type, resolve_province, type_matches};
pub use error::{Result, SearchError, SearchErrorCode};
pub use matcher::{
    CITY_FIELDS, SEARCH_FIELDS, city_matches, field_contains, matches_all_tokens, name_equals,
    province_matches,
};
pub use normalize::{NormalizedString, normalize, normalize_opt, tokenize};
pub use query::{DEFAULT_LIMIT, FacilityQuery, Limit, Lookup, MAX_LIMIT, QueryConfig, QueryEngine};
pub use record::{Column, ColumnInfo, FacilityRecord, Schema};
pub use store::{FacilityStore, MemoryStore, ScanFilter};
