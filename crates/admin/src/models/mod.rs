//! Domain models for the admin API.

pub mod admin_account;
pub mod content_library;
pub mod entity;
pub mod session;

pub use admin_account::{AdminAccount, AdminAccountInput, AdminAccountUpdate};
pub use content_library::{ContentObject, ContentObjectInput};
pub use entity::{EntityDocument, EntityFilter, EntityRecord};
pub use session::{CurrentAdmin, keys as session_keys};
pub use vacance_core::{AccountStatus, AdminRole};
