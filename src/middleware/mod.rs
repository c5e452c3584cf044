//! Request middleware shared by the API routes.

pub mod session;

pub use session::require_session;
