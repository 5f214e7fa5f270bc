//! The technology registry.
//!
//! Discovery is open to anyone and always succeeds. The only mutation is
//! [`TechnologyRegistry::advance`], which raises a technology's level by
//! exactly one.
//!
//! Advancement is gated on a fixed role identity (the policy's
//! `advance_role`, `"creator"` by default) rather than on the principal
//! that reported the discovery. The stored `creator` field is kept for
//! reference and queries but plays no part in authorization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use civitas_types::{
    CivilizationId, Operation, Principal, RecordRef, RegistryKind, Technology, TechnologyId,
};

use crate::access::{AccessPolicy, AccessRule};
use crate::sequence::{IdSequence, dense_len};
use crate::{RegistryError, Transition};

/// Serializable image of a [`TechnologyRegistry`], records in id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnologySnapshot {
    /// Every stored technology, ordered by id.
    pub records: Vec<Technology>,
}

/// Store of technology records keyed by sequential id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnologyRegistry {
    records: BTreeMap<TechnologyId, Technology>,
    sequence: IdSequence<TechnologyId>,
    policy: AccessPolicy,
}

impl TechnologyRegistry {
    /// Create an empty registry governed by `policy`.
    pub const fn new(policy: AccessPolicy) -> Self {
        Self {
            records: BTreeMap::new(),
            sequence: IdSequence::new(RegistryKind::Technology),
            policy,
        }
    }

    /// Rebuild a registry from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CorruptSnapshot`] if the ids are not exactly
    /// `1..=N`, or if discovery markers decrease in id order.
    pub fn restore(
        policy: AccessPolicy,
        snapshot: TechnologySnapshot,
    ) -> Result<Self, RegistryError> {
        let issued = dense_len(
            RegistryKind::Technology,
            snapshot.records.iter().map(|tech| tech.id),
        )?;
        if let Some(pair) = snapshot
            .records
            .windows(2)
            .find(|pair| matches!(pair, [a, b] if b.discovery_block < a.discovery_block))
        {
            let ids: Vec<String> = pair.iter().map(|tech| tech.id.to_string()).collect();
            return Err(RegistryError::CorruptSnapshot {
                kind: RegistryKind::Technology,
                reason: format!("discovery markers decrease between ids {}", ids.join(" and ")),
            });
        }
        let records = snapshot
            .records
            .into_iter()
            .map(|tech| (tech.id, tech))
            .collect();
        Ok(Self {
            records,
            sequence: IdSequence::resume(RegistryKind::Technology, issued),
            policy,
        })
    }

    /// Capture every record in id order.
    pub fn snapshot(&self) -> TechnologySnapshot {
        TechnologySnapshot {
            records: self.records.values().cloned().collect(),
        }
    }

    /// Return the policy this registry authorizes against.
    pub const fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Return the discovery marker of the most recent technology, if any.
    pub fn latest_discovery_block(&self) -> Option<u64> {
        self.records.values().next_back().map(|tech| tech.discovery_block)
    }

    /// Store a newly discovered technology at level 1 and return its id.
    ///
    /// `civilization_id` is recorded as given; it is not checked against any
    /// civilization registry. `discovery_block` should come from a
    /// non-decreasing clock; values lower than the latest stored marker are
    /// raised to it so the registry stays ordered.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IdSpaceExhausted`] once `u64::MAX` records
    /// exist. Nothing else can fail.
    pub fn discover(
        &mut self,
        civilization_id: CivilizationId,
        name: impl Into<String>,
        description: impl Into<String>,
        creator: Principal,
        discovery_block: u64,
    ) -> Result<TechnologyId, RegistryError> {
        let id = self.sequence.allocate()?;
        let block = self
            .latest_discovery_block()
            .map_or(discovery_block, |latest| latest.max(discovery_block));
        let technology = Technology::discovered(
            id,
            civilization_id,
            creator,
            name.into(),
            description.into(),
            block,
        );
        debug!(
            technology_id = %id,
            civilization_id = %civilization_id,
            discovery_block = block,
            name = technology.name,
            "technology discovered"
        );
        self.records.insert(id, technology);
        Ok(id)
    }

    /// Raise a technology's level by exactly one.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if `id` is unknown, then
    /// [`RegistryError::Unauthorized`] if `updater` is not the configured
    /// advance role, then [`RegistryError::LevelOverflow`] if the level is
    /// already `u32::MAX`.
    pub fn advance(
        &mut self,
        id: TechnologyId,
        updater: &Principal,
    ) -> Result<Transition<u32>, RegistryError> {
        let record = self.records.get_mut(&id).ok_or(RegistryError::NotFound {
            record: RecordRef::Technology(id),
        })?;
        let grant = self
            .policy
            .authorize(
                AccessRule::for_operation(Operation::AdvanceTechnology),
                &record.creator,
                updater,
            )
            .ok_or_else(|| RegistryError::Unauthorized {
                caller: updater.clone(),
                operation: Operation::AdvanceTechnology,
                record: RecordRef::Technology(id),
            })?;
        let previous = record.level;
        let current = previous
            .checked_add(1)
            .ok_or(RegistryError::LevelOverflow { id })?;
        record.level = current;
        debug!(technology_id = %id, previous, current, "technology advanced");
        Ok(Transition {
            previous,
            current,
            grant,
        })
    }

    /// Look up a technology by id.
    pub fn get(&self, id: TechnologyId) -> Option<&Technology> {
        self.records.get(&id)
    }

    /// Return whether `id` resolves to a record.
    pub fn contains(&self, id: TechnologyId) -> bool {
        self.records.contains_key(&id)
    }

    /// Return the number of stored technologies.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Return whether no technology has been discovered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all technologies in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Technology> {
        self.records.values()
    }

    /// Return every technology attributed to `civilization_id`, in id order.
    pub fn for_civilization(
        &self,
        civilization_id: CivilizationId,
    ) -> impl Iterator<Item = &Technology> {
        self.records
            .values()
            .filter(move |tech| tech.civilization_id == civilization_id)
    }
}

impl Default for TechnologyRegistry {
    fn default() -> Self {
        Self::new(AccessPolicy::default())
    }
}
