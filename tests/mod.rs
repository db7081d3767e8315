//! Integration tests for reelcat
//!
//! Tests are organized by component:
//! - catalog_test: Catalog client against a mock service
//! - flow_test: End-to-end flows (List/Search -> Detail -> Play), library and CLI

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
