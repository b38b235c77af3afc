//! Content library resolution for detail pages.
//!
//! A detail page names a target (a country or city) and the content types it wants
//! to show. Every type is looked up on its own, concurrently, and classified by match
//! count. One failing lookup does not affect the others.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::future::Future;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use vacance_core::library::{
    ContentType, LibraryCandidate, LibraryLink, LibraryResolution, LinkStatus, ResolutionState,
};
use vacance_core::{ContentObjectId, DocumentId};

use crate::db::{ContentLibraryRepository, RepositoryError};

/// Where library candidates come from.
pub trait LibrarySource: Sync {
    type Error: Display + Send;

    /// All objects of `content_type` describing `target_id`, in a stable order.
    fn find_matches(
        &self,
        content_type: ContentType,
        target_id: &DocumentId,
    ) -> impl Future<Output = Result<Vec<LibraryCandidate>, Self::Error>> + Send;
}

impl LibrarySource for ContentLibraryRepository<'_> {
    type Error = RepositoryError;

    async fn find_matches(
        &self,
        content_type: ContentType,
        target_id: &DocumentId,
    ) -> Result<Vec<LibraryCandidate>, RepositoryError> {
        let objects = self.find_by_type_and_target(content_type, target_id).await?;
        Ok(objects.iter().map(|o| o.candidate()).collect())
    }
}

/// One slot a detail page wants filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryDescriptor {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(default)]
    pub label: Option<String>,
    /// Presentation hint (icon/colour) echoed back to the client.
    #[serde(default)]
    pub theme: Option<String>,
}

impl LibraryDescriptor {
    #[must_use]
    pub const fn new(content_type: ContentType) -> Self {
        Self {
            content_type,
            label: None,
            theme: None,
        }
    }
}

/// Outcome of one slot's lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SlotOutcome {
    Resolved { link: LibraryLink, status: LinkStatus },
    Failed { error: String },
}

/// A descriptor together with its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSlot {
    #[serde(flatten)]
    pub descriptor: LibraryDescriptor,
    #[serde(flatten)]
    pub outcome: SlotOutcome,
}

impl ResolvedSlot {
    /// The link, when the lookup succeeded.
    #[must_use]
    pub const fn link(&self) -> Option<&LibraryLink> {
        match &self.outcome {
            SlotOutcome::Resolved { link, .. } => Some(link),
            SlotOutcome::Failed { .. } => None,
        }
    }
}

/// Resolve every descriptor for `target_id`.
///
/// Without a target nothing is queried and the result is [`ResolutionState::Idle`].
/// `existing` carries links saved earlier; a saved id that is still among the
/// candidates is kept as an explicit selection, anything else is dropped and the
/// 0/1/many rule decides afresh.
pub async fn resolve_target<S: LibrarySource>(
    source: &S,
    target_id: Option<&DocumentId>,
    descriptors: &[LibraryDescriptor],
    existing: &BTreeMap<ContentType, ContentObjectId>,
) -> ResolutionState<Vec<ResolvedSlot>> {
    let Some(target_id) = target_id.filter(|id| !id.as_str().trim().is_empty()) else {
        return ResolutionState::Idle;
    };

    let lookups = descriptors.iter().map(|descriptor| async move {
        let outcome = match source.find_matches(descriptor.content_type, target_id).await {
            Ok(matches) => {
                let mut link = LibraryLink::new(LibraryResolution::from_matches(matches));
                if let Some(saved) = existing.get(&descriptor.content_type)
                    && link.linked_id() != Some(saved)
                    && link.select(saved).is_err()
                {
                    tracing::debug!(
                        content_type = %descriptor.content_type,
                        saved_id = %saved,
                        "Saved library link is no longer a candidate"
                    );
                }
                let status = link.status();
                SlotOutcome::Resolved { link, status }
            }
            Err(e) => {
                tracing::warn!(
                    content_type = %descriptor.content_type,
                    target_id = %target_id,
                    error = %e,
                    "Library lookup failed"
                );
                SlotOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        ResolvedSlot {
            descriptor: descriptor.clone(),
            outcome,
        }
    });

    ResolutionState::Resolved(join_all(lookups).await)
}

/// The links to persist: one entry per slot with a linked object.
#[must_use]
pub fn linked_ids(slots: &[ResolvedSlot]) -> BTreeMap<ContentType, ContentObjectId> {
    slots
        .iter()
        .filter_map(|slot| {
            let id = slot.link()?.linked_id()?;
            Some((slot.descriptor.content_type, id.clone()))
        })
        .collect()
}
