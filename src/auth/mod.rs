pub mod base;
pub mod cookies;
pub mod plain_provider;
pub mod session_auth;
pub mod supabase_jwt_provider;
pub mod supabase_provider;

// Re-export so we can do "use crate::auth::*;"
pub use base::*;
pub use session_auth::SessionAuth;
