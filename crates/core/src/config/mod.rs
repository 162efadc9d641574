//! Configuration loading and schema definitions
//!
//! Settings for the store location, result limits, and logging.

mod loader;
mod schema;

pub use loader::{Config, DATABASE_ENV};
pub use schema::*;
