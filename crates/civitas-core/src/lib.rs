//! Configuration, discovery clocks and the registry facade for Civitas.
//!
//! This crate wires the civilization and technology registries, the
//! transition journal and a discovery clock into one owner of all state.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from YAML into typed structs.
//! - [`clock`] -- [`DiscoveryClock`] with block-height and wall-clock sources.
//! - [`civitas`] -- The [`Civitas`] facade: the single mutation entry point.
//! - [`shared`] -- [`SharedCivitas`], serialized access for async callers.
//! - [`error`] -- [`CivitasError`].
//!
//! [`DiscoveryClock`]: clock::DiscoveryClock
//! [`Civitas`]: civitas::Civitas
//! [`SharedCivitas`]: shared::SharedCivitas
//! [`CivitasError`]: error::CivitasError

pub mod civitas;
pub mod clock;
pub mod config;
pub mod error;
pub mod shared;

// Re-export primary types at crate root.
pub use civitas::{Civitas, CivitasSnapshot};
pub use clock::{BlockClock, ClockError, DiscoveryClock, WallClock};
pub use config::{CivitasConfig, ConfigError};
pub use error::CivitasError;
pub use shared::SharedCivitas;
