// Re-exports so callers can "use crate::config::*".
pub mod database;
pub mod logging;
pub mod types;

pub use database::*;
pub use logging::*;
pub use types::*;
