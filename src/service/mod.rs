pub mod names;
pub mod retry;
pub mod route;
