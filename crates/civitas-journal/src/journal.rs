//! The journal: an append-only log of successful registry transitions.
//!
//! # Design
//!
//! - **Append-only**: entries are never modified or deleted.
//! - **Dense**: entry sequences run `1..=N` in insertion order.
//! - **Success only**: rejected calls never reach the journal.

use civitas_types::{Principal, RecordRef};

use crate::entry::{EntryBuilder, JournalEntry};
use crate::JournalError;

/// In-memory journal of every successful registry call.
#[derive(Debug, Default)]
pub struct Journal {
    /// All entries, in insertion order.
    entries: Vec<JournalEntry>,
}

impl Journal {
    /// Create a new empty journal.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Return the number of entries in the journal.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether the journal has no entries.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the sequence the next appended entry will receive.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::SequenceOverflow`] if no further entry can
    /// be appended.
    pub fn next_sequence(&self) -> Result<u64, JournalError> {
        self.last()
            .map_or(Some(1), |entry| entry.sequence.checked_add(1))
            .ok_or(JournalError::SequenceOverflow)
    }

    /// Build an entry at the next sequence position and append it.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`] if the entry fails validation or the
    /// sequence counter would overflow. Nothing is appended on error.
    pub fn record(&mut self, builder: EntryBuilder) -> Result<&JournalEntry, JournalError> {
        let sequence = self.next_sequence()?;
        let entry = builder.build(sequence)?;
        self.entries.push(entry);

        // Return a reference to the entry we just pushed.
        self.entries.last().ok_or(JournalError::InternalError(
            "failed to retrieve entry after append",
        ))
    }

    /// Return the most recent entry.
    pub fn last(&self) -> Option<&JournalEntry> {
        self.entries.last()
    }

    /// Return all entries, in insertion order.
    pub fn all_entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Return every entry about `record`, in insertion order.
    pub fn entries_for(&self, record: RecordRef) -> Vec<&JournalEntry> {
        self.entries.iter().filter(|e| e.record == record).collect()
    }

    /// Return every entry caused by `actor`, in insertion order.
    pub fn entries_by(&self, actor: &Principal) -> Vec<&JournalEntry> {
        self.entries.iter().filter(|e| e.actor == *actor).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use civitas_types::{CivilizationId, Grant, TechnologyId};

    use super::*;
    use crate::JournalChange;

    fn created(id: u64, actor: &str) -> EntryBuilder {
        EntryBuilder::new(JournalChange::CivilizationCreated {
            name: format!("civ-{id}"),
        })
        .record(RecordRef::Civilization(CivilizationId(id)))
        .actor(Principal::from(actor))
    }

    #[test]
    fn new_journal_is_empty() {
        let journal = Journal::new();
        assert!(journal.is_empty());
        assert_eq!(journal.len(), 0);
        assert!(journal.last().is_none());
        assert_eq!(journal.next_sequence().unwrap(), 1);
    }

    #[test]
    fn sequences_are_dense_from_one() {
        let mut journal = Journal::new();
        for id in 1..=4 {
            journal.record(created(id, "user1")).unwrap();
        }
        let sequences: Vec<u64> = journal.all_entries().iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4]);
    }

    #[test]
    fn invalid_entry_is_not_appended() {
        let mut journal = Journal::new();
        journal.record(created(1, "user1")).unwrap();
        let bad = EntryBuilder::new(JournalChange::TechnologyAdvanced {
            previous: 1,
            current: 2,
        })
        .actor(Principal::from("creator"));
        assert!(journal.record(bad).is_err());
        assert_eq!(journal.len(), 1);

        // The failed append does not burn a sequence number.
        let next = journal.record(created(2, "user1")).unwrap();
        assert_eq!(next.sequence, 2);
    }

    #[test]
    fn filters_by_record_and_actor() {
        let mut journal = Journal::new();
        journal.record(created(1, "user1")).unwrap();
        journal
            .record(
                EntryBuilder::new(JournalChange::StatusUpdated {
                    previous: "active".to_owned(),
                    current: "declining".to_owned(),
                    grant: Grant::Privileged,
                })
                .record(RecordRef::Civilization(CivilizationId(1)))
                .actor(Principal::from("CONTRACT_OWNER")),
            )
            .unwrap();
        journal
            .record(
                EntryBuilder::new(JournalChange::TechnologyDiscovered {
                    civilization_id: CivilizationId(1),
                    discovery_block: 0,
                })
                .record(RecordRef::Technology(TechnologyId(1)))
                .actor(Principal::from("user1")),
            )
            .unwrap();

        assert_eq!(
            journal
                .entries_for(RecordRef::Civilization(CivilizationId(1)))
                .len(),
            2
        );
        assert_eq!(journal.entries_by(&Principal::from("user1")).len(), 2);
        assert_eq!(journal.entries_by(&Principal::from("CONTRACT_OWNER")).len(), 1);
    }
}
