//! Error types for the `civitas-registry` crate.
//!
//! The gated operations only ever fail with [`RegistryError::NotFound`] or
//! [`RegistryError::Unauthorized`], in that order of precedence. The
//! remaining variants guard checked arithmetic and snapshot restoration.

use civitas_types::{CivilizationId, Operation, Principal, RecordRef, RegistryKind, TechnologyId};

/// Errors that can occur during registry operations.
///
/// Every error aborts the operation before any field is written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The id does not resolve to a stored record.
    #[error("{record} not found")]
    NotFound {
        /// The record that was looked up.
        record: RecordRef,
    },

    /// The caller may not perform the operation on this record.
    #[error("{caller} is not authorized to {operation} {record}")]
    Unauthorized {
        /// The rejected caller.
        caller: Principal,
        /// The attempted operation.
        operation: Operation,
        /// The record the operation targeted.
        record: RecordRef,
    },

    /// The id sequence cannot produce another identifier.
    #[error("{kind} id space exhausted")]
    IdSpaceExhausted {
        /// The registry whose sequence overflowed.
        kind: RegistryKind,
    },

    /// Advancing the technology would overflow its level.
    #[error("technology #{id} is already at the maximum level")]
    LevelOverflow {
        /// The technology that could not be advanced.
        id: TechnologyId,
    },

    /// A snapshot did not describe a dense `1..=N` id range.
    #[error("corrupt {kind} snapshot: {reason}")]
    CorruptSnapshot {
        /// The registry the snapshot was meant for.
        kind: RegistryKind,
        /// What is wrong with the snapshot.
        reason: String,
    },

    /// A technology referenced a civilization that does not exist.
    ///
    /// Only produced when referential validation is switched on.
    #[error("technology references unknown civilization #{id}")]
    UnknownCivilization {
        /// The missing civilization.
        id: CivilizationId,
    },
}

impl RegistryError {
    /// Return whether this is a [`RegistryError::NotFound`].
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Return whether this is a [`RegistryError::Unauthorized`].
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}
