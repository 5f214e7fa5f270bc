//! Append-only journal of successful registry transitions.
//!
//! The registries hold current state only. The journal keeps the history:
//! one entry per successful create or mutation, in the order the calls were
//! applied, each naming the record, the acting principal and the change.
//!
//! - [`journal`] -- The [`Journal`] struct: append-only log with queries.
//! - [`entry`] -- [`JournalEntry`], [`JournalChange`] and the validating
//!   [`EntryBuilder`].

pub mod entry;
pub mod journal;

// Re-export primary types at crate root.
pub use entry::{EntryBuilder, JournalChange, JournalEntry};
pub use journal::Journal;

use civitas_types::RecordRef;

/// Errors that can occur when recording journal entries.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// A required field was not set on the builder.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The change belongs to a different registry than the record.
    #[error("{change} cannot be recorded against {record}")]
    RecordMismatch {
        /// Label of the change being recorded.
        change: &'static str,
        /// The record it was filed against.
        record: RecordRef,
    },

    /// The entry sequence counter would overflow.
    #[error("journal sequence overflow")]
    SequenceOverflow,

    /// An internal error that should not occur in normal operation.
    #[error("internal journal error: {0}")]
    InternalError(&'static str),
}
