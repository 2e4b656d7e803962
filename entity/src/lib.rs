//! Database entities.
//!
//! `zkb_killmail` and `actor_name` are owned by killwatch and created by the
//! migration crate. The `sde_*` entities map onto the read-only EVE Static Data
//! Export tables and are never migrated or written outside of tests.

pub mod prelude;

pub mod actor_name;
pub mod sde_jump;
pub mod sde_region;
pub mod sde_solar_system;
pub mod sde_type;
pub mod zkb_killmail;
