//! Type-safe identifier wrappers.
//!
//! Registry records carry dense sequential integer ids: the first record in
//! a registry is `1`, the next `2`, and so on. Civilizations and technologies
//! draw from independent sequences, so each gets its own newtype to keep the
//! two from being mixed at compile time.
//!
//! Journal entries are not part of a registry sequence and use UUID v7
//! (time-ordered) identifiers instead.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// An identifier drawn from a dense sequence starting at [`FIRST`].
///
/// [`FIRST`]: SequentialId::FIRST
pub trait SequentialId: Copy + Ord + core::fmt::Debug + core::fmt::Display {
    /// The first identifier a sequence hands out.
    const FIRST: Self;

    /// Return the raw sequence value.
    fn value(self) -> u64;

    /// Wrap a raw sequence value.
    fn from_value(value: u64) -> Self;
}

/// Generates a newtype wrapper around a sequential `u64` with standard derives.
macro_rules! define_sequential_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
        )]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub u64);

        impl $name {
            /// Return the inner sequence value.
            pub const fn into_inner(self) -> u64 {
                self.0
            }
        }

        impl SequentialId for $name {
            const FIRST: Self = Self(1);

            fn value(self) -> u64 {
                self.0
            }

            fn from_value(value: u64) -> Self {
                Self(value)
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_sequential_id! {
    /// Identifier of a civilization in the civilization registry.
    CivilizationId
}

define_sequential_id! {
    /// Identifier of a technology in the technology registry.
    TechnologyId
}

/// Unique identifier for a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct JournalEntryId(pub Uuid);

impl JournalEntryId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for JournalEntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for JournalEntryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequences_start_at_one() {
        assert_eq!(CivilizationId::FIRST.value(), 1);
        assert_eq!(TechnologyId::FIRST.value(), 1);
    }

    #[test]
    fn sequential_id_serializes_as_bare_number() {
        let json = serde_json::to_string(&CivilizationId(7)).ok();
        assert_eq!(json.as_deref(), Some("7"));
        let restored: Result<TechnologyId, _> = serde_json::from_str("12");
        assert_eq!(restored.ok(), Some(TechnologyId(12)));
    }

    #[test]
    fn id_display_matches_inner_value() {
        assert_eq!(CivilizationId(42).to_string(), "42");
        let entry = JournalEntryId::new();
        assert_eq!(entry.to_string(), entry.into_inner().to_string());
    }

    #[test]
    fn journal_ids_are_unique() {
        assert_ne!(JournalEntryId::new(), JournalEntryId::new());
    }
}
