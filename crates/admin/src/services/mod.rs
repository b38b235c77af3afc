//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Email + password authentication (Argon2id)
//! - `csv_export` - CSV rendering for list exports
//! - `library_resolver` - Concurrent content library lookups with the 0/1/many rule
//! - `media` - Image URL validation, upload checks and storage

pub mod auth;
pub mod csv_export;
pub mod library_resolver;
pub mod media;

pub use auth::{AdminAuthError, AdminAuthService};
pub use csv_export::{CsvRow, export_filename};
pub use library_resolver::{LibraryDescriptor, LibrarySource, ResolvedSlot, resolve_target};
pub use media::{ImageGallery, ImageInput, MediaError, MediaStore};
