//! Authorization-gated record registries for civilizations and technologies.
//!
//! Both registries follow the same pattern: allocate the next dense id,
//! store a record, and allow specific field mutations only to specific
//! principals. Every call is one indivisible transition: it either fully
//! applies or returns an error having changed nothing.
//!
//! # Modules
//!
//! - [`access`] -- [`AccessPolicy`] and the per-operation [`AccessRule`]s.
//! - [`sequence`] -- [`IdSequence`], the dense identity allocator.
//! - [`civilization`] -- [`CivilizationRegistry`]: create, status, parameters.
//! - [`technology`] -- [`TechnologyRegistry`]: discover, advance.
//! - [`error`] -- [`RegistryError`].
//!
//! # Usage
//!
//! ```
//! use civitas_registry::{CivilizationRegistry, TechnologyRegistry};
//! use civitas_types::{CivilizationId, Principal};
//!
//! let mut civs = CivilizationRegistry::default();
//! let id = civs.create("Zorgons", "Spacefarers", vec![1, 2, 3], Principal::from("user1"));
//! assert_eq!(id.ok(), Some(CivilizationId(1)));
//!
//! let owner = Principal::from("CONTRACT_OWNER");
//! assert!(civs.update_status(CivilizationId(1), "declining", &owner).is_ok());
//! assert!(civs.update_parameters(CivilizationId(1), vec![0], &owner).is_err());
//!
//! let mut techs = TechnologyRegistry::default();
//! let tech = techs.discover(CivilizationId(2), "Fusion Power", "", Principal::from("user2"), 0);
//! assert!(tech.is_ok());
//! ```

pub mod access;
pub mod civilization;
pub mod error;
pub mod sequence;
pub mod technology;

// Re-export primary types at crate root.
pub use access::{AccessPolicy, AccessRule, DEFAULT_ADVANCE_ROLE, DEFAULT_PRIVILEGED_PRINCIPAL};
pub use civilization::{CivilizationRegistry, CivilizationSnapshot};
pub use error::RegistryError;
pub use sequence::IdSequence;
pub use technology::{TechnologyRegistry, TechnologySnapshot};

use civitas_types::Grant;

/// The before and after values of a field changed by a gated mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<T> {
    /// Value before the mutation.
    pub previous: T,
    /// Value after the mutation.
    pub current: T,
    /// The identity that authorized the change.
    pub grant: Grant,
}
