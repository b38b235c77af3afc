//! HTTP middleware for admin.
//!
//! - `session` - `PostgreSQL`-backed session layer
//! - `auth` - Extractors for the signed-in admin and permission checks

pub mod auth;
pub mod session;

pub use auth::{RequireAdminAuth, authorize, clear_current_admin, set_current_admin};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
