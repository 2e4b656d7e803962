//! Fixtures used while a test runs.
//!
//! - `factory` builds ESI models and killmail / RedisQ JSON bodies
//! - `mockito` registers ESI and RedisQ endpoints on the mock server
//! - `universe` inserts static data rows (systems, regions, types, jumps)

pub mod factory;
pub mod mockito;
pub mod universe;
