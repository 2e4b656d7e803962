pub mod actor_name;
pub mod killmail;
pub mod universe;
