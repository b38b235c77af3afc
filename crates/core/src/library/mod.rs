//! Content library model.
//!
//! A content library object is a reusable block of long-form text about one country
//! or city. Detail pages reference it by id instead of copying it, so an edit in the
//! library shows up everywhere at once.
//!
//! `(content type, target id)` is the lookup key, but nothing makes it unique: a
//! lookup may find zero, one or many objects. [`LibraryResolution`] spells out the
//! three outcomes so callers cannot confuse "many" with "none".

pub mod content_type;
pub mod resolution;

pub use content_type::{ContentType, TargetKind};
pub use resolution::{
    LibraryCandidate, LibraryLink, LibraryResolution, LinkError, LinkStatus, ResolutionState,
};
