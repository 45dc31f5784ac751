use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use save_core::{SaveRecord, SlotName, SlotSummary};

use super::codec;
use super::error::{CandidateError, LoadError, RepositoryError, WriteError};
use super::traits::{Loaded, SlotRepository};

#[derive(Clone, Debug, Default)]
struct StoredSlot {
    primary: Option<Vec<u8>>,
    backup: Option<Vec<u8>>,
}

/// In-memory implementation of SlotRepository.
///
/// Stores the same encoded bytes the file repository would write, so
/// validation, backup rotation and migration behave identically.
#[derive(Debug, Default)]
pub struct InMemorySlotRepo {
    slots: RwLock<BTreeMap<SlotName, StoredSlot>>,
}

impl InMemorySlotRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the primary bytes of `slot` without validation.
    pub fn put_raw(&self, slot: &SlotName, bytes: impl Into<Vec<u8>>) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        slots.entry(slot.clone()).or_default().primary = Some(bytes.into());
    }

    pub fn raw_primary(&self, slot: &SlotName) -> Option<Vec<u8>> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.get(slot).and_then(|stored| stored.primary.clone())
    }

    pub fn raw_backup(&self, slot: &SlotName) -> Option<Vec<u8>> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.get(slot).and_then(|stored| stored.backup.clone())
    }
}

fn candidate(bytes: Option<&Vec<u8>>) -> Result<codec::Decoded, CandidateError> {
    bytes.map_or(Err(CandidateError::Missing), |b| codec::decode(b))
}

impl SlotRepository for InMemorySlotRepo {
    fn save(&self, slot: &SlotName, record: &SaveRecord) -> Result<(), WriteError> {
        let bytes = codec::encode(record)?;
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let stored = slots.entry(slot.clone()).or_default();
        if let Some(previous) = stored.primary.replace(bytes) {
            stored.backup = Some(previous);
        }
        Ok(())
    }

    fn load(&self, slot: &SlotName) -> Result<Loaded, LoadError> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        let Some(stored) = slots.get(slot).filter(|s| s.primary.is_some()) else {
            return Err(LoadError::NotFound { slot: slot.clone() });
        };
        codec::load_with_fallback(slot, candidate(stored.primary.as_ref()), || {
            candidate(stored.backup.as_ref())
        })
    }

    fn list(&self) -> Vec<SlotSummary> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots
            .iter()
            .filter_map(|(slot, stored)| {
                let bytes = stored.primary.as_deref()?;
                Some(match codec::peek(bytes) {
                    Some((name, level)) => SlotSummary::healthy(slot.clone(), name, level),
                    None => SlotSummary::corrupted(slot.clone()),
                })
            })
            .collect()
    }

    fn delete(&self, slot: &SlotName) -> Result<bool, RepositoryError> {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.remove(slot).is_some())
    }

    fn exists(&self, slot: &SlotName) -> bool {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.get(slot).is_some_and(|stored| stored.primary.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::LoadSource;

    #[test]
    fn second_save_rotates_backup() {
        let repo = InMemorySlotRepo::new();
        let slot = SlotName::default();
        repo.save(&slot, &SaveRecord::new_character("One").unwrap()).unwrap();
        assert_eq!(repo.raw_backup(&slot), None);

        repo.save(&slot, &SaveRecord::new_character("Two").unwrap()).unwrap();

        let backup = repo.raw_backup(&slot).unwrap();
        assert!(String::from_utf8(backup).unwrap().contains("One"));
    }

    #[test]
    fn corrupted_primary_recovers_from_backup() {
        let repo = InMemorySlotRepo::new();
        let slot = SlotName::default();
        repo.save(&slot, &SaveRecord::new_character("One").unwrap()).unwrap();
        repo.save(&slot, &SaveRecord::new_character("Two").unwrap()).unwrap();
        repo.put_raw(&slot, "{broken");

        let loaded = repo.load(&slot).unwrap();
        assert_eq!(loaded.source, LoadSource::Backup);
        assert_eq!(loaded.record.name, "One");
    }

    #[test]
    fn lists_in_slot_order() {
        let repo = InMemorySlotRepo::new();
        for name in ["b", "a", "c"] {
            repo.save(&SlotName::sanitize(name), &SaveRecord::new_character(name).unwrap())
                .unwrap();
        }
        let names: Vec<String> = repo.list().into_iter().map(|s| s.slot.to_string()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }
}
