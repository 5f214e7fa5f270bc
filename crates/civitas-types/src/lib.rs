//! Shared type definitions for the Civitas registries.
//!
//! This crate is the single source of truth for the records, identifiers
//! and principals used across the Civitas workspace. Types defined here flow
//! downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Sequential record identifiers and UUID v7 journal ids
//! - [`principal`] -- The opaque caller identity used for authorization
//! - [`enums`] -- Registry kinds, record references, gated operations, grants
//! - [`structs`] -- Civilization and technology records and their defaults

pub mod enums;
pub mod ids;
pub mod principal;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Grant, Operation, RecordRef, RegistryKind};
pub use ids::{CivilizationId, JournalEntryId, SequentialId, TechnologyId};
pub use principal::Principal;
pub use structs::{
    Civilization, INITIAL_DISCOVERY_LEVEL, INITIAL_POPULATION, INITIAL_RESOURCES,
    INITIAL_TECHNOLOGY_LEVEL, Technology, status,
};

#[cfg(test)]
mod tests {
    #[test]
    fn export_bindings() {
        // ts-rs writes the files under `bindings/` relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::CivilizationId::export_all();
        let _ = crate::ids::TechnologyId::export_all();
        let _ = crate::ids::JournalEntryId::export_all();
        let _ = crate::principal::Principal::export_all();

        // Enums
        let _ = crate::enums::RegistryKind::export_all();
        let _ = crate::enums::RecordRef::export_all();
        let _ = crate::enums::Operation::export_all();
        let _ = crate::enums::Grant::export_all();

        // Structs
        let _ = crate::structs::Civilization::export_all();
        let _ = crate::structs::Technology::export_all();
    }
}
