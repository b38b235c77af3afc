//! Resolving `(content type, target id)` lookups to a linked library object.

use serde::{Deserialize, Serialize};

use crate::types::ContentObjectId;

/// A library object offered for linking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryCandidate {
    pub id: ContentObjectId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
}

/// The outcome of one lookup, by match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LibraryResolution {
    /// No object matches; the page shows a "no master data" warning.
    Unlinked,
    /// Exactly one match, linked without asking.
    AutoLinked { candidate: LibraryCandidate },
    /// Several matches; the admin must pick one.
    Ambiguous { candidates: Vec<LibraryCandidate> },
}

impl LibraryResolution {
    /// Classify a match list. Never picks among several matches.
    #[must_use]
    pub fn from_matches(mut matches: Vec<LibraryCandidate>) -> Self {
        match matches.len() {
            0 => Self::Unlinked,
            1 => match matches.pop() {
                Some(candidate) => Self::AutoLinked { candidate },
                None => Self::Unlinked,
            },
            _ => Self::Ambiguous {
                candidates: matches,
            },
        }
    }

    /// The id linked without user interaction, if any.
    #[must_use]
    pub const fn auto_linked_id(&self) -> Option<&ContentObjectId> {
        match self {
            Self::AutoLinked { candidate } => Some(&candidate.id),
            Self::Unlinked | Self::Ambiguous { .. } => None,
        }
    }

    /// Every object the admin may link to.
    #[must_use]
    pub fn candidates(&self) -> &[LibraryCandidate] {
        match self {
            Self::Unlinked => &[],
            Self::AutoLinked { candidate } => std::slice::from_ref(candidate),
            Self::Ambiguous { candidates } => candidates,
        }
    }
}

/// Whether a lookup ran at all.
///
/// Without a target id nothing is queried and the linker stays idle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "result", rename_all = "snake_case")]
pub enum ResolutionState<T> {
    Idle,
    Resolved(T),
}

impl<T> ResolutionState<T> {
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// What the linker shows for one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    /// No master data exists for the pair. Saving is still allowed.
    Missing,
    /// Linked automatically to the single match.
    AutoLinked,
    /// Several matches and none chosen yet.
    SelectionRequired,
    /// Linked by an explicit choice.
    Selected,
    /// Matches exist but the admin removed the link.
    Unlinked,
}

/// Errors from [`LibraryLink::select`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    #[error("content object {0} is not a candidate for this slot")]
    NotACandidate(ContentObjectId),
}

/// One reference slot on a detail page (e.g. the country story of a country).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryLink {
    resolution: LibraryResolution,
    linked: Option<ContentObjectId>,
    manual: bool,
}

impl LibraryLink {
    /// Start from a fresh resolution, auto-linking a single match.
    #[must_use]
    pub fn new(resolution: LibraryResolution) -> Self {
        let linked = resolution.auto_linked_id().cloned();
        Self {
            resolution,
            linked,
            manual: false,
        }
    }

    /// Discard the current link and apply a new resolution (e.g. the target changed).
    pub fn reset(&mut self, resolution: LibraryResolution) {
        *self = Self::new(resolution);
    }

    /// Link to a specific candidate.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::NotACandidate`] if `id` was not offered by the resolution.
    pub fn select(&mut self, id: &ContentObjectId) -> Result<(), LinkError> {
        if !self.resolution.candidates().iter().any(|c| &c.id == id) {
            return Err(LinkError::NotACandidate(id.clone()));
        }
        self.linked = Some(id.clone());
        self.manual = true;
        Ok(())
    }

    /// Remove the link. The library object itself is untouched.
    pub fn unlink(&mut self) {
        self.linked = None;
        self.manual = true;
    }

    #[must_use]
    pub const fn linked_id(&self) -> Option<&ContentObjectId> {
        self.linked.as_ref()
    }

    #[must_use]
    pub const fn resolution(&self) -> &LibraryResolution {
        &self.resolution
    }

    #[must_use]
    pub const fn status(&self) -> LinkStatus {
        match (&self.resolution, &self.linked, self.manual) {
            (LibraryResolution::Unlinked, _, _) => LinkStatus::Missing,
            (_, Some(_), true) => LinkStatus::Selected,
            (LibraryResolution::AutoLinked { .. }, Some(_), false) => LinkStatus::AutoLinked,
            (LibraryResolution::Ambiguous { .. }, _, false) => LinkStatus::SelectionRequired,
            (_, None, _) => LinkStatus::Unlinked,
        }
    }
}
