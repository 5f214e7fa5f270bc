//! The civilization registry.
//!
//! Creation is open to anyone and always succeeds. Two fields are mutable
//! afterwards, each behind its own rule:
//!
//! - `status` may be rewritten by the creator or the privileged principal.
//! - `parameters` may be replaced by the creator only. The privileged
//!   principal gets no special access here.
//!
//! Existence is always checked before authorization, and a rejected call
//! leaves the record untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use civitas_types::{
    Civilization, CivilizationId, Grant, Operation, Principal, RecordRef, RegistryKind,
};

use crate::access::{AccessPolicy, AccessRule};
use crate::sequence::{IdSequence, dense_len};
use crate::{RegistryError, Transition};

/// Serializable image of a [`CivilizationRegistry`], records in id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CivilizationSnapshot {
    /// Every stored civilization, ordered by id.
    pub records: Vec<Civilization>,
}

/// Store of civilization records keyed by sequential id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CivilizationRegistry {
    records: BTreeMap<CivilizationId, Civilization>,
    sequence: IdSequence<CivilizationId>,
    policy: AccessPolicy,
}

impl CivilizationRegistry {
    /// Create an empty registry governed by `policy`.
    pub const fn new(policy: AccessPolicy) -> Self {
        Self {
            records: BTreeMap::new(),
            sequence: IdSequence::new(RegistryKind::Civilization),
            policy,
        }
    }

    /// Rebuild a registry from a snapshot.
    ///
    /// The snapshot's ids must be exactly `1..=N` in order; the next
    /// creation then receives `N + 1`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CorruptSnapshot`] if the ids are not dense.
    pub fn restore(
        policy: AccessPolicy,
        snapshot: CivilizationSnapshot,
    ) -> Result<Self, RegistryError> {
        let issued = dense_len(
            RegistryKind::Civilization,
            snapshot.records.iter().map(|civ| civ.id),
        )?;
        let records = snapshot
            .records
            .into_iter()
            .map(|civ| (civ.id, civ))
            .collect();
        Ok(Self {
            records,
            sequence: IdSequence::resume(RegistryKind::Civilization, issued),
            policy,
        })
    }

    /// Capture every record in id order.
    pub fn snapshot(&self) -> CivilizationSnapshot {
        CivilizationSnapshot {
            records: self.records.values().cloned().collect(),
        }
    }

    /// Return the policy this registry authorizes against.
    pub const fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    /// Store a new civilization and return its id.
    ///
    /// The record starts with technology level 1, a population of
    /// 1,000,000, 1,000 resources and status `"active"`. No input is
    /// validated.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IdSpaceExhausted`] once `u64::MAX` records
    /// exist. Nothing else can fail.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Vec<i64>,
        creator: Principal,
    ) -> Result<CivilizationId, RegistryError> {
        let id = self.sequence.allocate()?;
        let civilization =
            Civilization::founded(id, creator, name.into(), description.into(), parameters);
        debug!(
            civilization_id = %id,
            creator = %civilization.creator,
            name = civilization.name,
            "civilization created"
        );
        self.records.insert(id, civilization);
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Gated mutations
    // -----------------------------------------------------------------------

    /// Overwrite a civilization's status.
    ///
    /// Allowed for the creator and for the privileged principal. Any string
    /// is accepted, including terminal-sounding ones like `"extinct"`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if `id` is unknown, then
    /// [`RegistryError::Unauthorized`] if `updater` is neither the creator
    /// nor the privileged principal.
    pub fn update_status(
        &mut self,
        id: CivilizationId,
        new_status: impl Into<String>,
        updater: &Principal,
    ) -> Result<Transition<String>, RegistryError> {
        let (record, grant) = self.authorized_mut(id, Operation::UpdateStatus, updater)?;
        let current = new_status.into();
        let previous = core::mem::replace(&mut record.status, current.clone());
        debug!(civilization_id = %id, previous, current, ?grant, "civilization status updated");
        Ok(Transition {
            previous,
            current,
            grant,
        })
    }

    /// Replace a civilization's parameter vector wholesale.
    ///
    /// Only the creator may do this.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if `id` is unknown, then
    /// [`RegistryError::Unauthorized`] if `updater` is not the creator.
    pub fn update_parameters(
        &mut self,
        id: CivilizationId,
        new_parameters: Vec<i64>,
        updater: &Principal,
    ) -> Result<Transition<Vec<i64>>, RegistryError> {
        let (record, grant) = self.authorized_mut(id, Operation::UpdateParameters, updater)?;
        let previous = core::mem::replace(&mut record.parameters, new_parameters.clone());
        debug!(
            civilization_id = %id,
            parameter_count = new_parameters.len(),
            "civilization parameters replaced"
        );
        Ok(Transition {
            previous,
            current: new_parameters,
            grant,
        })
    }

    /// Resolve `id` and check `updater` against the rule for `operation`.
    fn authorized_mut(
        &mut self,
        id: CivilizationId,
        operation: Operation,
        updater: &Principal,
    ) -> Result<(&mut Civilization, Grant), RegistryError> {
        let record = self.records.get_mut(&id).ok_or(RegistryError::NotFound {
            record: RecordRef::Civilization(id),
        })?;
        let grant = self
            .policy
            .authorize(AccessRule::for_operation(operation), &record.creator, updater)
            .ok_or_else(|| RegistryError::Unauthorized {
                caller: updater.clone(),
                operation,
                record: RecordRef::Civilization(id),
            })?;
        Ok((record, grant))
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Look up a civilization by id.
    pub fn get(&self, id: CivilizationId) -> Option<&Civilization> {
        self.records.get(&id)
    }

    /// Return whether `id` resolves to a record.
    pub fn contains(&self, id: CivilizationId) -> bool {
        self.records.contains_key(&id)
    }

    /// Return the number of stored civilizations.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Return whether no civilization has been created.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all civilizations in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Civilization> {
        self.records.values()
    }

    /// Return every civilization created by `creator`, in id order.
    pub fn created_by<'a>(
        &'a self,
        creator: &'a Principal,
    ) -> impl Iterator<Item = &'a Civilization> + 'a {
        self.records.values().filter(move |civ| civ.creator == *creator)
    }

    /// Return every civilization whose status equals `status`, in id order.
    pub fn with_status<'a>(
        &'a self,
        status: &'a str,
    ) -> impl Iterator<Item = &'a Civilization> + 'a {
        self.records.values().filter(move |civ| civ.status == status)
    }
}

impl Default for CivilizationRegistry {
    fn default() -> Self {
        Self::new(AccessPolicy::default())
    }
}
