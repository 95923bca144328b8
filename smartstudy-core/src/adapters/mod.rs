//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the KeyValueStore port (the default on-disk store)
//! - An in-memory map for tests

pub mod duckdb;
pub mod memory;
