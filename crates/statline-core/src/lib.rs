//! Core types and trait definitions for the statline scraper.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod store;
pub mod subject;
pub mod summary;
pub mod table;
pub mod title;

pub use error::{Error, Result};
