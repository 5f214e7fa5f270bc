//! The Civitas facade: both registries, the journal and the discovery clock.
//!
//! [`Civitas`] is the single mutation entry point. Each public operation is
//! one indivisible transition:
//!
//! 1. Confirm the journal can take another entry.
//! 2. Apply the registry call. On rejection, log a warning and return.
//! 3. Append exactly one journal entry and log the transition.
//!
//! Because every operation takes `&mut self`, no two transitions can
//! interleave. [`SharedCivitas`](crate::shared::SharedCivitas) extends the
//! same guarantee to concurrent async callers.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use civitas_journal::{EntryBuilder, Journal, JournalChange};
use civitas_registry::{
    CivilizationRegistry, CivilizationSnapshot, RegistryError, TechnologyRegistry,
    TechnologySnapshot, Transition,
};
use civitas_types::{
    Civilization, CivilizationId, Principal, RecordRef, Technology, TechnologyId,
};

use crate::clock::{self, BlockClock, DiscoveryClock};
use crate::config::{CivitasConfig, ClockSource};
use crate::error::CivitasError;

/// Serializable image of both registries.
///
/// The journal is history, not state, and is not part of a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CivitasSnapshot {
    /// Civilization records in id order.
    pub civilizations: CivilizationSnapshot,
    /// Technology records in id order.
    pub technologies: TechnologySnapshot,
}

/// Owner of all registry state.
#[derive(Debug)]
pub struct Civitas {
    civilizations: CivilizationRegistry,
    technologies: TechnologyRegistry,
    journal: Journal,
    clock: Box<dyn DiscoveryClock>,
    validate_civilization_refs: bool,
}

impl Civitas {
    /// Create empty registries configured by `config`.
    pub fn new(config: &CivitasConfig) -> Self {
        Self::with_clock(config, clock::from_config(&config.clock))
    }

    /// Create empty registries that take discovery markers from `clock`.
    pub fn with_clock(config: &CivitasConfig, clock: Box<dyn DiscoveryClock>) -> Self {
        let policy = config.access.policy();
        info!(
            privileged_principal = %policy.privileged(),
            advance_role = %policy.advance_role(),
            validate_civilization_refs = config.registry.validate_civilization_refs,
            "civitas registries initialized"
        );
        Self {
            civilizations: CivilizationRegistry::new(policy.clone()),
            technologies: TechnologyRegistry::new(policy),
            journal: Journal::new(),
            clock,
            validate_civilization_refs: config.registry.validate_civilization_refs,
        }
    }

    /// Rebuild registries from a snapshot.
    ///
    /// The journal starts empty. A block clock resumes at the later of the
    /// configured start height and the newest stored discovery marker, so
    /// markers keep increasing across the restore.
    ///
    /// # Errors
    ///
    /// Returns [`CivitasError::Registry`] if either registry snapshot is
    /// corrupt.
    pub fn restore(
        config: &CivitasConfig,
        snapshot: CivitasSnapshot,
    ) -> Result<Self, CivitasError> {
        let policy = config.access.policy();
        let civilizations = CivilizationRegistry::restore(policy.clone(), snapshot.civilizations)?;
        let technologies = TechnologyRegistry::restore(policy, snapshot.technologies)?;

        let clock: Box<dyn DiscoveryClock> = match config.clock.source {
            ClockSource::Block => {
                let height = technologies
                    .latest_discovery_block()
                    .map_or(config.clock.start_block, |latest| {
                        latest.max(config.clock.start_block)
                    });
                Box::new(BlockClock::starting_at(height))
            }
            ClockSource::Wall => clock::from_config(&config.clock),
        };

        info!(
            civilizations = civilizations.len(),
            technologies = technologies.len(),
            "civitas registries restored"
        );
        Ok(Self {
            civilizations,
            technologies,
            journal: Journal::new(),
            clock,
            validate_civilization_refs: config.registry.validate_civilization_refs,
        })
    }

    /// Capture both registries.
    pub fn snapshot(&self) -> CivitasSnapshot {
        CivitasSnapshot {
            civilizations: self.civilizations.snapshot(),
            technologies: self.technologies.snapshot(),
        }
    }

    // -----------------------------------------------------------------------
    // Civilizations
    // -----------------------------------------------------------------------

    /// Create a civilization and return its id.
    ///
    /// # Errors
    ///
    /// Only fails if an id or journal sequence space is exhausted.
    pub fn create_civilization(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Vec<i64>,
        creator: Principal,
    ) -> Result<CivilizationId, CivitasError> {
        self.journal.next_sequence()?;
        let name = name.into();
        let id = self
            .civilizations
            .create(name.clone(), description, parameters, creator.clone())?;
        info!(civilization_id = %id, creator = %creator, name, "civilization created");
        self.journal.record(
            EntryBuilder::new(JournalChange::CivilizationCreated { name })
                .record(RecordRef::Civilization(id))
                .actor(creator),
        )?;
        Ok(id)
    }

    /// Overwrite a civilization's status.
    ///
    /// # Errors
    ///
    /// Returns a registry `NotFound` or `Unauthorized` error; see
    /// [`CivilizationRegistry::update_status`].
    pub fn update_civilization_status(
        &mut self,
        id: CivilizationId,
        new_status: impl Into<String>,
        updater: &Principal,
    ) -> Result<Transition<String>, CivitasError> {
        self.journal.next_sequence()?;
        let change = self
            .civilizations
            .update_status(id, new_status, updater)
            .map_err(rejected)?;
        info!(
            civilization_id = %id,
            updater = %updater,
            previous = change.previous,
            current = change.current,
            grant = ?change.grant,
            "civilization status updated"
        );
        self.journal.record(
            EntryBuilder::new(JournalChange::StatusUpdated {
                previous: change.previous.clone(),
                current: change.current.clone(),
                grant: change.grant,
            })
            .record(RecordRef::Civilization(id))
            .actor(updater.clone()),
        )?;
        Ok(change)
    }

    /// Replace a civilization's parameters.
    ///
    /// # Errors
    ///
    /// Returns a registry `NotFound` or `Unauthorized` error; see
    /// [`CivilizationRegistry::update_parameters`].
    pub fn update_civilization_parameters(
        &mut self,
        id: CivilizationId,
        new_parameters: Vec<i64>,
        updater: &Principal,
    ) -> Result<Transition<Vec<i64>>, CivitasError> {
        self.journal.next_sequence()?;
        let change = self
            .civilizations
            .update_parameters(id, new_parameters, updater)
            .map_err(rejected)?;
        info!(
            civilization_id = %id,
            updater = %updater,
            parameter_count = change.current.len(),
            "civilization parameters updated"
        );
        self.journal.record(
            EntryBuilder::new(JournalChange::ParametersUpdated {
                previous: change.previous.clone(),
                current: change.current.clone(),
            })
            .record(RecordRef::Civilization(id))
            .actor(updater.clone()),
        )?;
        Ok(change)
    }

    // -----------------------------------------------------------------------
    // Technologies
    // -----------------------------------------------------------------------

    /// Record a technology discovery at the clock's current marker.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownCivilization`] when referential
    /// validation is enabled and `civilization_id` does not exist. Otherwise
    /// only fails if an id or journal sequence space is exhausted.
    pub fn discover_technology(
        &mut self,
        civilization_id: CivilizationId,
        name: impl Into<String>,
        description: impl Into<String>,
        creator: Principal,
    ) -> Result<TechnologyId, CivitasError> {
        self.journal.next_sequence()?;
        if self.validate_civilization_refs && !self.civilizations.contains(civilization_id) {
            return Err(rejected(RegistryError::UnknownCivilization {
                id: civilization_id,
            }));
        }
        let marker = self.clock.marker();
        let id = self.technologies.discover(
            civilization_id,
            name,
            description,
            creator.clone(),
            marker,
        )?;
        let discovery_block = self
            .technologies
            .get(id)
            .map_or(marker, |tech| tech.discovery_block);
        info!(
            technology_id = %id,
            civilization_id = %civilization_id,
            creator = %creator,
            discovery_block,
            "technology discovered"
        );
        self.journal.record(
            EntryBuilder::new(JournalChange::TechnologyDiscovered {
                civilization_id,
                discovery_block,
            })
            .record(RecordRef::Technology(id))
            .actor(creator),
        )?;
        Ok(id)
    }

    /// Raise a technology's level by one.
    ///
    /// # Errors
    ///
    /// Returns a registry `NotFound` or `Unauthorized` error; see
    /// [`TechnologyRegistry::advance`].
    pub fn advance_technology(
        &mut self,
        id: TechnologyId,
        updater: &Principal,
    ) -> Result<Transition<u32>, CivitasError> {
        self.journal.next_sequence()?;
        let change = self.technologies.advance(id, updater).map_err(rejected)?;
        info!(
            technology_id = %id,
            updater = %updater,
            level = change.current,
            "technology advanced"
        );
        self.journal.record(
            EntryBuilder::new(JournalChange::TechnologyAdvanced {
                previous: change.previous,
                current: change.current,
            })
            .record(RecordRef::Technology(id))
            .actor(updater.clone()),
        )?;
        Ok(change)
    }

    /// Move the discovery clock to the next block.
    ///
    /// # Errors
    ///
    /// Returns [`CivitasError::Clock`] if the clock cannot be advanced.
    pub fn advance_block(&mut self) -> Result<u64, CivitasError> {
        Ok(self.clock.advance()?)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Look up a civilization by id.
    pub fn civilization(&self, id: CivilizationId) -> Option<&Civilization> {
        self.civilizations.get(id)
    }

    /// Look up a technology by id.
    pub fn technology(&self, id: TechnologyId) -> Option<&Technology> {
        self.technologies.get(id)
    }

    /// Return the civilization registry.
    pub const fn civilizations(&self) -> &CivilizationRegistry {
        &self.civilizations
    }

    /// Return the technology registry.
    pub const fn technologies(&self) -> &TechnologyRegistry {
        &self.technologies
    }

    /// Return the journal of successful transitions.
    pub const fn journal(&self) -> &Journal {
        &self.journal
    }
}

impl Default for Civitas {
    fn default() -> Self {
        Self::new(&CivitasConfig::default())
    }
}

/// Log a rejected call and wrap the error.
fn rejected(err: RegistryError) -> CivitasError {
    warn!(error = %err, "registry call rejected");
    CivitasError::from(err)
}
