//! Read-only SQLite facility table for the ODCAF lookup engine.
//!
//! The table is produced by a separate ingestion step; this crate only
//! reads it. [`SqliteStore`] implements [`odcaf_search::FacilityStore`], so
//! it plugs straight into [`odcaf_search::QueryEngine`].
//!
//! # Example
//!
//! ```no_run
//! use odcaf_search::{Limit, QueryEngine};
//! use odcaf_store::SqliteStore;
//!
//! let engine = QueryEngine::new(SqliteStore::new("odcaf.db"));
//! let hits = engine.search_facilities("art gallery toronto", Limit::default())?;
//! # Ok::<(), odcaf_search::SearchError>(())
//! ```

mod error;
mod sqlite;

pub use error::{Result, StoreError};
pub use sqlite::{DEFAULT_TABLE, SqliteStore};
