//! Journal entries and the builder that validates them.
//!
//! Every entry names the record it is about and the principal that caused
//! it. The builder checks that the change belongs to the registry the
//! record lives in before producing an entry, so a technology change can
//! never be filed against a civilization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use civitas_types::{CivilizationId, Grant, JournalEntryId, Principal, RecordRef, RegistryKind};

use crate::JournalError;

// ---------------------------------------------------------------------------
// Change payloads
// ---------------------------------------------------------------------------

/// What a successful registry call changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JournalChange {
    /// A civilization was created.
    CivilizationCreated {
        /// Name given at creation.
        name: String,
    },
    /// A civilization's status was overwritten.
    StatusUpdated {
        /// Status before the call.
        previous: String,
        /// Status after the call.
        current: String,
        /// Whether the creator or the privileged principal made the change.
        grant: Grant,
    },
    /// A civilization's parameters were replaced.
    ParametersUpdated {
        /// Parameters before the call.
        previous: Vec<i64>,
        /// Parameters after the call.
        current: Vec<i64>,
    },
    /// A technology was discovered.
    TechnologyDiscovered {
        /// The civilization the technology is attributed to.
        civilization_id: CivilizationId,
        /// Marker recorded on the technology.
        discovery_block: u64,
    },
    /// A technology's level was raised.
    TechnologyAdvanced {
        /// Level before the call.
        previous: u32,
        /// Level after the call.
        current: u32,
    },
}

impl JournalChange {
    /// Return the registry this kind of change applies to.
    pub const fn kind(&self) -> RegistryKind {
        match self {
            Self::CivilizationCreated { .. }
            | Self::StatusUpdated { .. }
            | Self::ParametersUpdated { .. } => RegistryKind::Civilization,
            Self::TechnologyDiscovered { .. } | Self::TechnologyAdvanced { .. } => {
                RegistryKind::Technology
            }
        }
    }

    /// Return a short stable label for the change.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CivilizationCreated { .. } => "civilization_created",
            Self::StatusUpdated { .. } => "status_updated",
            Self::ParametersUpdated { .. } => "parameters_updated",
            Self::TechnologyDiscovered { .. } => "technology_discovered",
            Self::TechnologyAdvanced { .. } => "technology_advanced",
        }
    }
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// One immutable journal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique entry id.
    pub id: JournalEntryId,
    /// Position in the journal, dense from 1.
    pub sequence: u64,
    /// The record the change applies to.
    pub record: RecordRef,
    /// The principal whose call produced the change.
    pub actor: Principal,
    /// What changed.
    pub change: JournalChange,
    /// Wall-clock time the entry was built.
    pub recorded_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for validated [`JournalEntry`] values.
///
/// # Examples
///
/// ```
/// use civitas_journal::{EntryBuilder, JournalChange};
/// use civitas_types::{CivilizationId, Principal, RecordRef};
///
/// let entry = EntryBuilder::new(JournalChange::CivilizationCreated { name: "Zorgons".to_owned() })
///     .record(RecordRef::Civilization(CivilizationId(1)))
///     .actor(Principal::from("user1"))
///     .build(1);
///
/// assert!(entry.is_ok());
/// ```
#[derive(Debug)]
pub struct EntryBuilder {
    change: JournalChange,
    record: Option<RecordRef>,
    actor: Option<Principal>,
}

impl EntryBuilder {
    /// Start building an entry for `change`.
    pub const fn new(change: JournalChange) -> Self {
        Self {
            change,
            record: None,
            actor: None,
        }
    }

    /// Set the record the change applies to.
    #[must_use]
    pub const fn record(mut self, record: RecordRef) -> Self {
        self.record = Some(record);
        self
    }

    /// Set the principal that caused the change.
    #[must_use]
    pub fn actor(mut self, actor: Principal) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Validate inputs and produce an entry at position `sequence`.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::MissingField`] if the record or actor is not
    /// set, and [`JournalError::RecordMismatch`] if the change belongs to a
    /// different registry than the record.
    pub fn build(self, sequence: u64) -> Result<JournalEntry, JournalError> {
        let record = self.record.ok_or(JournalError::MissingField("record"))?;
        let actor = self.actor.ok_or(JournalError::MissingField("actor"))?;

        if self.change.kind() != record.kind() {
            return Err(JournalError::RecordMismatch {
                change: self.change.label(),
                record,
            });
        }

        Ok(JournalEntry {
            id: JournalEntryId::new(),
            sequence,
            record,
            actor,
            change: self.change,
            recorded_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use civitas_types::TechnologyId;

    use super::*;

    #[test]
    fn builder_requires_record_and_actor() {
        let change = JournalChange::TechnologyAdvanced {
            previous: 1,
            current: 2,
        };
        let missing_record = EntryBuilder::new(change.clone())
            .actor(Principal::from("creator"))
            .build(1);
        assert!(matches!(missing_record, Err(JournalError::MissingField("record"))));

        let missing_actor = EntryBuilder::new(change)
            .record(RecordRef::Technology(TechnologyId(1)))
            .build(1);
        assert!(matches!(missing_actor, Err(JournalError::MissingField("actor"))));
    }

    #[test]
    fn builder_rejects_change_filed_against_other_registry() {
        let result = EntryBuilder::new(JournalChange::TechnologyAdvanced {
            previous: 1,
            current: 2,
        })
        .record(RecordRef::Civilization(CivilizationId(1)))
        .actor(Principal::from("creator"))
        .build(1);
        assert!(matches!(
            result,
            Err(JournalError::RecordMismatch {
                change: "technology_advanced",
                ..
            })
        ));
    }

    #[test]
    fn change_serializes_with_type_tag() {
        let change = JournalChange::StatusUpdated {
            previous: "active".to_owned(),
            current: "declining".to_owned(),
            grant: Grant::Privileged,
        };
        let json = serde_json::to_value(&change).ok();
        let tag = json
            .as_ref()
            .and_then(|v| v.get("type"))
            .and_then(serde_json::Value::as_str);
        assert_eq!(tag, Some("status_updated"));
    }
}
