//! Enumeration types shared by the registries and the journal.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{CivilizationId, TechnologyId};

// ---------------------------------------------------------------------------
// Registry kinds and record references
// ---------------------------------------------------------------------------

/// Which registry a record or sequence belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum RegistryKind {
    /// The civilization registry.
    Civilization,
    /// The technology registry.
    Technology,
}

impl core::fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Civilization => f.write_str("civilization"),
            Self::Technology => f.write_str("technology"),
        }
    }
}

/// A reference to a single record in either registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum RecordRef {
    /// A civilization record.
    Civilization(CivilizationId),
    /// A technology record.
    Technology(TechnologyId),
}

impl RecordRef {
    /// Return the registry the referenced record lives in.
    pub const fn kind(self) -> RegistryKind {
        match self {
            Self::Civilization(_) => RegistryKind::Civilization,
            Self::Technology(_) => RegistryKind::Technology,
        }
    }
}

impl core::fmt::Display for RecordRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Civilization(id) => write!(f, "civilization #{id}"),
            Self::Technology(id) => write!(f, "technology #{id}"),
        }
    }
}

impl From<CivilizationId> for RecordRef {
    fn from(id: CivilizationId) -> Self {
        Self::Civilization(id)
    }
}

impl From<TechnologyId> for RecordRef {
    fn from(id: TechnologyId) -> Self {
        Self::Technology(id)
    }
}

// ---------------------------------------------------------------------------
// Gated operations
// ---------------------------------------------------------------------------

/// A mutation that is subject to an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Operation {
    /// Overwrite a civilization's status tag.
    UpdateStatus,
    /// Replace a civilization's parameter vector.
    UpdateParameters,
    /// Raise a technology's level by one.
    AdvanceTechnology,
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UpdateStatus => f.write_str("update-status"),
            Self::UpdateParameters => f.write_str("update-parameters"),
            Self::AdvanceTechnology => f.write_str("advance-technology"),
        }
    }
}

/// The identity that satisfied an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Grant {
    /// The caller created the record.
    Creator,
    /// The caller is the configured privileged principal.
    Privileged,
    /// The caller holds the fixed role the operation is gated on.
    Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_ref_reports_its_registry() {
        assert_eq!(
            RecordRef::from(CivilizationId(3)).kind(),
            RegistryKind::Civilization
        );
        assert_eq!(RecordRef::from(TechnologyId(3)).kind(), RegistryKind::Technology);
    }

    #[test]
    fn record_ref_display_names_registry_and_id() {
        assert_eq!(RecordRef::Technology(TechnologyId(9)).to_string(), "technology #9");
    }
}
