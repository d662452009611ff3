//! The persisted home of the flashcard collection.
//!
//! Every mutation rewrites the whole collection into one storage slot. Load
//! and save are both fail-soft: a bad snapshot starts an empty collection and
//! a failed write leaves the in-memory change in place.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, error, info, warn};

use crate::ids::{new_term_id, GroupIdGen};
use crate::storage::DEFAULT_SLOT;
use crate::{FlashcardGroup, LoadError, NewGroup, Storage, StorageError, Term};

/// What happened when the store read its slot at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    Restored { groups: usize },
    Empty,
    Discarded { reason: String },
}

pub struct FlashcardStore<S: Storage> {
    storage: S,
    slot: String,
    groups: Vec<FlashcardGroup>,
    ids: GroupIdGen,
    load_status: LoadStatus,
    last_persist_error: Option<String>,
}

impl<S: Storage> FlashcardStore<S> {
    pub fn open(storage: S) -> Self {
        Self::open_slot(storage, DEFAULT_SLOT)
    }

    pub fn open_slot(storage: S, slot: impl Into<String>) -> Self {
        let slot = slot.into();
        let (groups, load_status) = match read_snapshot(&storage, &slot) {
            Ok(Some(groups)) => {
                debug!(slot = %slot, groups = groups.len(), "restored flashcards");
                let n = groups.len();
                (groups, LoadStatus::Restored { groups: n })
            }
            Ok(None) => {
                debug!(slot = %slot, "no saved flashcards");
                (Vec::new(), LoadStatus::Empty)
            }
            Err(e) => {
                warn!(slot = %slot, error = %e, "discarding saved flashcards");
                (
                    Vec::new(),
                    LoadStatus::Discarded {
                        reason: e.to_string(),
                    },
                )
            }
        };
        Self {
            ids: GroupIdGen::seeded_from(&groups),
            storage,
            slot,
            groups,
            load_status,
            last_persist_error: None,
        }
    }

    /// Appends a new group and persists the collection.
    pub fn create(&mut self, group: NewGroup) -> &FlashcardGroup {
        self.create_at(group, Utc::now())
    }

    pub fn create_at(&mut self, group: NewGroup, now: DateTime<Utc>) -> &FlashcardGroup {
        let (title, description, image, terms) = group.into_parts();
        let terms = terms
            .into_iter()
            .map(|t| {
                let (term, definition, image) = t.into_parts();
                Term {
                    id: new_term_id(),
                    term,
                    definition,
                    image,
                }
            })
            .collect::<Vec<_>>();
        let mut id = self.ids.next_at(now);
        // Foreign ids in a restored snapshot can be numeric and ahead of us.
        while self.groups.iter().any(|g| g.id == id) {
            id = self.ids.next_at(now);
        }
        let group = FlashcardGroup {
            id,
            title,
            description,
            image,
            terms,
            created_at: now,
        };
        info!(id = %group.id, terms = group.terms.len(), "created flashcard group");
        self.groups.push(group);
        self.persist();
        &self.groups[self.groups.len() - 1]
    }

    /// Removes the group with `id`, if any, then persists. Returns whether a
    /// group was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.groups.len();
        self.groups.retain(|g| g.id != id);
        let removed = self.groups.len() != before;
        if removed {
            info!(id, "deleted flashcard group");
        } else {
            debug!(id, "delete of unknown flashcard group");
        }
        self.persist();
        removed
    }

    pub fn groups(&self) -> &[FlashcardGroup] {
        &self.groups
    }

    pub fn get(&self, id: &str) -> Option<&FlashcardGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    /// The most recent write failure, cleared by the next successful write.
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    fn persist(&mut self) {
        match write_snapshot(&self.storage, &self.slot, &self.groups) {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                error!(slot = %self.slot, error = %e, "could not save flashcards");
                self.last_persist_error = Some(e.to_string());
            }
        }
    }
}

/// Reads and checks the snapshot in `slot`. `Ok(None)` means the slot is empty.
pub fn read_snapshot<S: Storage + ?Sized>(
    storage: &S,
    slot: &str,
) -> Result<Option<Vec<FlashcardGroup>>, LoadError> {
    let Some(raw) = storage.get(slot)? else {
        return Ok(None);
    };
    let groups: Vec<FlashcardGroup> = serde_json::from_str(&raw)?;
    check_collection(&groups)?;
    Ok(Some(groups))
}

pub fn write_snapshot<S: Storage + ?Sized>(
    storage: &S,
    slot: &str,
    groups: &[FlashcardGroup],
) -> Result<(), StorageError> {
    let json = serde_json::to_string(groups)
        .map_err(|e| StorageError::Unavailable(format!("serialize: {e}")))?;
    storage.set(slot, &json)
}

/// Structural checks a parsed snapshot must pass before it is trusted.
///
/// Text fields only have to be non-empty here. Whitespace-only text was
/// accepted by older writers and is kept; the trimmed rule applies to new
/// input in `GroupDraft::validate`.
pub fn check_collection(groups: &[FlashcardGroup]) -> Result<(), LoadError> {
    let mut seen = HashSet::new();
    for g in groups {
        if !seen.insert(g.id.as_str()) {
            return Err(LoadError::Invalid(format!("duplicate group id {}", g.id)));
        }
        if g.title.is_empty() || g.description.is_empty() {
            return Err(LoadError::Invalid(format!("group {} has an empty title or description", g.id)));
        }
        if g.terms.is_empty() {
            return Err(LoadError::Invalid(format!("group {} has no terms", g.id)));
        }
        let mut term_ids = HashSet::new();
        for t in &g.terms {
            if !term_ids.insert(t.id.as_str()) {
                return Err(LoadError::Invalid(format!("group {} repeats term id {}", g.id, t.id)));
            }
            if t.term.is_empty() || t.definition.is_empty() {
                return Err(LoadError::Invalid(format!("group {} has an empty term or definition", g.id)));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GroupDraft, MemoryStorage};

    fn draft(title: &str) -> NewGroup {
        GroupDraft::new(title, "desc")
            .with_term("a", "b")
            .with_term("c", "d")
            .validate()
            .unwrap()
    }

    #[test]
    fn opens_empty_when_slot_missing() {
        let store = FlashcardStore::open(MemoryStorage::new());
        assert!(store.is_empty());
        assert_eq!(store.load_status(), &LoadStatus::Empty);
    }

    #[test]
    fn create_assigns_term_ids_and_timestamp() {
        let mut store = FlashcardStore::open(MemoryStorage::new());
        let now = Utc::now();
        let g = store.create_at(draft("one"), now).clone();
        assert_eq!(g.created_at, now);
        assert_eq!(g.id, now.timestamp_millis().to_string());
        assert_eq!(g.terms.len(), 2);
        assert_ne!(g.terms[0].id, g.terms[1].id);
        assert_eq!(store.get(&g.id), Some(&g));
    }

    #[test]
    fn create_skips_ids_taken_by_restored_groups() {
        let storage = MemoryStorage::new();
        let now = Utc::now();
        let mut first = FlashcardStore::open(storage.clone());
        first.create_at(draft("one"), now);
        drop(first);

        let mut second = FlashcardStore::open(storage);
        let id = second.create_at(draft("two"), now).id.clone();
        assert_eq!(id, (now.timestamp_millis() + 1).to_string());
    }

    #[test]
    fn writes_whole_collection_on_every_mutation() {
        let storage = MemoryStorage::new();
        let mut store = FlashcardStore::open(storage.clone());
        let id = store.create(draft("one")).id.clone();
        store.create(draft("two"));
        let saved = read_snapshot(&storage, DEFAULT_SLOT).unwrap().unwrap();
        assert_eq!(saved, store.groups());

        assert!(store.delete(&id));
        let saved = read_snapshot(&storage, DEFAULT_SLOT).unwrap().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].title, "two");
    }

    #[test]
    fn custom_slot_is_isolated() {
        let storage = MemoryStorage::new();
        let mut a = FlashcardStore::open_slot(storage.clone(), "decks-a");
        a.create(draft("one"));
        let b = FlashcardStore::open_slot(storage, "decks-b");
        assert!(b.is_empty());
        assert_eq!(a.slot(), "decks-a");
    }

    #[test]
    fn check_rejects_empty_terms() {
        let mut store = FlashcardStore::open(MemoryStorage::new());
        let mut g = store.create(draft("one")).clone();
        g.terms.clear();
        assert!(matches!(check_collection(&[g]), Err(LoadError::Invalid(_))));
    }

    #[test]
    fn check_rejects_duplicate_ids() {
        let mut store = FlashcardStore::open(MemoryStorage::new());
        let g = store.create(draft("one")).clone();
        assert!(matches!(
            check_collection(&[g.clone(), g]),
            Err(LoadError::Invalid(_))
        ));
    }
}
