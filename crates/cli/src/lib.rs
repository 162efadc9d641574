//! Terminal output helpers for the ODCAF lookup tools
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Facility listings and detail blocks
//! - Duration and count formatting

#![warn(missing_docs)]

pub mod output;
