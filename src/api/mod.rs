//! API clients for external services
//!
//! - Catalog: media listing, lookup by id and search

pub mod catalog;

pub use catalog::{CatalogClient, CatalogConfig, CatalogError};
