//! Error type for the `civitas-core` facade.
//!
//! [`CivitasError`] wraps the errors of every subsystem the facade drives so
//! callers can propagate any of them with `?`.

use civitas_journal::JournalError;
use civitas_registry::RegistryError;

use crate::clock::ClockError;

/// Top-level error for facade operations.
#[derive(Debug, thiserror::Error)]
pub enum CivitasError {
    /// A registry rejected the call.
    #[error("registry error: {source}")]
    Registry {
        /// The underlying registry error.
        #[from]
        source: RegistryError,
    },

    /// The journal could not record the transition.
    #[error("journal error: {source}")]
    Journal {
        /// The underlying journal error.
        #[from]
        source: JournalError,
    },

    /// The discovery clock failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

impl CivitasError {
    /// Return the registry error, if this is one.
    pub const fn registry(&self) -> Option<&RegistryError> {
        match self {
            Self::Registry { source } => Some(source),
            Self::Journal { .. } | Self::Clock { .. } => None,
        }
    }

    /// Return whether the call failed because the id did not resolve.
    pub fn is_not_found(&self) -> bool {
        self.registry().is_some_and(RegistryError::is_not_found)
    }

    /// Return whether the call failed because the caller lacked access.
    pub fn is_unauthorized(&self) -> bool {
        self.registry().is_some_and(RegistryError::is_unauthorized)
    }
}
