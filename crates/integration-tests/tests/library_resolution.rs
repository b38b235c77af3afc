//! Content-library linking as a detail page goes through it: resolve, pick,
//! save, and resolve again after the library changed.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use vacance_admin::services::library_resolver::{SlotOutcome, linked_ids};
use vacance_admin::services::{LibraryDescriptor, LibrarySource, ResolvedSlot, resolve_target};
use vacance_core::library::{ContentType, LibraryCandidate, LinkStatus, ResolutionState};
use vacance_core::{ContentObjectId, DocumentId};

/// A library that can be edited between lookups.
#[derive(Default)]
struct Library {
    objects: Mutex<Vec<(ContentType, String, LibraryCandidate)>>,
    offline: Mutex<Vec<ContentType>>,
}

impl Library {
    fn add(&self, content_type: ContentType, target: &str, id: &str, title: &str) {
        self.objects.lock().unwrap().push((
            content_type,
            target.to_string(),
            LibraryCandidate {
                id: ContentObjectId::new(id),
                title: title.to_string(),
                tagline: None,
            },
        ));
    }

    fn remove(&self, id: &str) {
        self.objects
            .lock()
            .unwrap()
            .retain(|(_, _, candidate)| candidate.id.as_str() != id);
    }

    fn take_offline(&self, content_type: ContentType) {
        self.offline.lock().unwrap().push(content_type);
    }
}

impl LibrarySource for Library {
    type Error = String;

    async fn find_matches(
        &self,
        content_type: ContentType,
        target_id: &DocumentId,
    ) -> Result<Vec<LibraryCandidate>, String> {
        if self.offline.lock().unwrap().contains(&content_type) {
            return Err(format!("{content_type} lookup timed out"));
        }
        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|(ty, target, _)| *ty == content_type && target == target_id.as_str())
            .map(|(_, _, candidate)| candidate.clone())
            .collect())
    }
}

fn country_page() -> Vec<LibraryDescriptor> {
    vec![
        LibraryDescriptor::new(ContentType::CountryStory),
        LibraryDescriptor::new(ContentType::PracticalFinance),
        LibraryDescriptor::new(ContentType::PracticalEmergency),
        LibraryDescriptor::new(ContentType::PracticalTransport),
    ]
}

async fn resolve(
    library: &Library,
    target: &str,
    saved: &BTreeMap<ContentType, ContentObjectId>,
) -> Vec<ResolvedSlot> {
    let target = DocumentId::new(target);
    match resolve_target(library, Some(&target), &country_page(), saved).await {
        ResolutionState::Resolved(slots) => slots,
        ResolutionState::Idle => panic!("a target was given"),
    }
}

fn status_of(slots: &[ResolvedSlot], content_type: ContentType) -> Option<LinkStatus> {
    slots
        .iter()
        .find(|slot| slot.descriptor.content_type == content_type)
        .and_then(|slot| slot.link())
        .map(|link| link.status())
}

#[tokio::test]
async fn pick_save_and_reload_keeps_the_chosen_story() {
    let library = Library::default();
    library.add(ContentType::CountryStory, "JP", "story-a", "Spring in Kyoto");
    library.add(ContentType::CountryStory, "JP", "story-b", "Winter in Sapporo");
    library.add(ContentType::PracticalFinance, "JP", "yen", "Money in Japan");

    let mut slots = resolve(&library, "JP", &BTreeMap::new()).await;
    assert_eq!(
        status_of(&slots, ContentType::CountryStory),
        Some(LinkStatus::SelectionRequired)
    );
    assert_eq!(
        status_of(&slots, ContentType::PracticalFinance),
        Some(LinkStatus::AutoLinked)
    );
    assert_eq!(
        status_of(&slots, ContentType::PracticalEmergency),
        Some(LinkStatus::Missing)
    );

    // Nothing is picked among several matches until the editor chooses.
    assert!(!linked_ids(&slots).contains_key(&ContentType::CountryStory));

    let SlotOutcome::Resolved { link, .. } = &mut slots[0].outcome else {
        panic!("story lookup succeeded");
    };
    link.select(&ContentObjectId::new("story-b")).unwrap();

    let saved = linked_ids(&slots);
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[&ContentType::CountryStory].as_str(), "story-b");

    let reloaded = resolve(&library, "JP", &saved).await;
    assert_eq!(
        status_of(&reloaded, ContentType::CountryStory),
        Some(LinkStatus::Selected)
    );
    assert_eq!(linked_ids(&reloaded), saved);
}

#[tokio::test]
async fn deleted_selection_falls_back_to_the_match_count() {
    let library = Library::default();
    library.add(ContentType::CountryStory, "IT", "rome", "Rome");
    library.add(ContentType::CountryStory, "IT", "milan", "Milan");

    let saved = BTreeMap::from([(ContentType::CountryStory, ContentObjectId::new("milan"))]);
    library.remove("milan");

    let slots = resolve(&library, "IT", &saved).await;
    assert_eq!(
        status_of(&slots, ContentType::CountryStory),
        Some(LinkStatus::AutoLinked)
    );
    assert_eq!(linked_ids(&slots)[&ContentType::CountryStory].as_str(), "rome");
}

#[tokio::test]
async fn second_object_for_the_same_pair_stops_auto_linking() {
    let library = Library::default();
    library.add(ContentType::PracticalTransport, "KR", "ktx", "Riding the KTX");

    let before = resolve(&library, "KR", &BTreeMap::new()).await;
    assert_eq!(
        status_of(&before, ContentType::PracticalTransport),
        Some(LinkStatus::AutoLinked)
    );

    library.add(ContentType::PracticalTransport, "KR", "subway", "Seoul Metro");
    let after = resolve(&library, "KR", &BTreeMap::new()).await;
    assert_eq!(
        status_of(&after, ContentType::PracticalTransport),
        Some(LinkStatus::SelectionRequired)
    );
}

#[tokio::test]
async fn one_failing_lookup_leaves_the_others_resolved() {
    let library = Library::default();
    library.add(ContentType::CountryStory, "FR", "paris", "Paris");
    library.take_offline(ContentType::PracticalFinance);

    let slots = resolve(&library, "FR", &BTreeMap::new()).await;
    assert_eq!(slots.len(), 4);

    let failed: Vec<_> = slots
        .iter()
        .filter(|slot| matches!(slot.outcome, SlotOutcome::Failed { .. }))
        .map(|slot| slot.descriptor.content_type)
        .collect();
    assert_eq!(failed, [ContentType::PracticalFinance]);
    assert_eq!(
        status_of(&slots, ContentType::CountryStory),
        Some(LinkStatus::AutoLinked)
    );
}

#[tokio::test]
async fn slots_serialize_with_descriptor_and_outcome_side_by_side() {
    let library = Library::default();
    library.add(ContentType::CountryStory, "ES", "seville", "Seville");

    let slots = resolve(&library, "ES", &BTreeMap::new()).await;
    let json = serde_json::to_value(&slots[0]).unwrap();

    assert_eq!(json["type"], "country-story");
    assert_eq!(json["outcome"], "resolved");
    assert_eq!(json["status"], "auto_linked");
}
