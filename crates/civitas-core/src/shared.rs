//! Serialized access to one [`Civitas`] from many async tasks.
//!
//! [`SharedCivitas`] wraps the facade in [`Arc`] and a tokio [`Mutex`].
//! Every method holds the lock for exactly one transition, so concurrent
//! callers observe the same one-at-a-time semantics as a single caller.
//! Reads return owned clones so no guard escapes.

use std::sync::Arc;

use tokio::sync::Mutex;

use civitas_registry::Transition;
use civitas_types::{Civilization, CivilizationId, Principal, Technology, TechnologyId};

use crate::civitas::{Civitas, CivitasSnapshot};
use crate::error::CivitasError;

/// Cloneable handle to a shared [`Civitas`].
#[derive(Debug, Clone)]
pub struct SharedCivitas {
    inner: Arc<Mutex<Civitas>>,
}

impl SharedCivitas {
    /// Wrap a facade for shared use.
    pub fn new(civitas: Civitas) -> Self {
        Self {
            inner: Arc::new(Mutex::new(civitas)),
        }
    }

    /// Create a civilization. See [`Civitas::create_civilization`].
    ///
    /// # Errors
    ///
    /// Propagates the facade's error.
    pub async fn create_civilization(
        &self,
        name: String,
        description: String,
        parameters: Vec<i64>,
        creator: Principal,
    ) -> Result<CivilizationId, CivitasError> {
        self.inner
            .lock()
            .await
            .create_civilization(name, description, parameters, creator)
    }

    /// Overwrite a civilization's status. See
    /// [`Civitas::update_civilization_status`].
    ///
    /// # Errors
    ///
    /// Propagates the facade's error.
    pub async fn update_civilization_status(
        &self,
        id: CivilizationId,
        new_status: String,
        updater: Principal,
    ) -> Result<Transition<String>, CivitasError> {
        self.inner
            .lock()
            .await
            .update_civilization_status(id, new_status, &updater)
    }

    /// Replace a civilization's parameters. See
    /// [`Civitas::update_civilization_parameters`].
    ///
    /// # Errors
    ///
    /// Propagates the facade's error.
    pub async fn update_civilization_parameters(
        &self,
        id: CivilizationId,
        new_parameters: Vec<i64>,
        updater: Principal,
    ) -> Result<Transition<Vec<i64>>, CivitasError> {
        self.inner
            .lock()
            .await
            .update_civilization_parameters(id, new_parameters, &updater)
    }

    /// Record a technology discovery. See [`Civitas::discover_technology`].
    ///
    /// # Errors
    ///
    /// Propagates the facade's error.
    pub async fn discover_technology(
        &self,
        civilization_id: CivilizationId,
        name: String,
        description: String,
        creator: Principal,
    ) -> Result<TechnologyId, CivitasError> {
        self.inner
            .lock()
            .await
            .discover_technology(civilization_id, name, description, creator)
    }

    /// Raise a technology's level. See [`Civitas::advance_technology`].
    ///
    /// # Errors
    ///
    /// Propagates the facade's error.
    pub async fn advance_technology(
        &self,
        id: TechnologyId,
        updater: Principal,
    ) -> Result<Transition<u32>, CivitasError> {
        self.inner.lock().await.advance_technology(id, &updater)
    }

    /// Move the discovery clock to the next block.
    ///
    /// # Errors
    ///
    /// Propagates the facade's error.
    pub async fn advance_block(&self) -> Result<u64, CivitasError> {
        self.inner.lock().await.advance_block()
    }

    /// Return a copy of a civilization.
    pub async fn civilization(&self, id: CivilizationId) -> Option<Civilization> {
        self.inner.lock().await.civilization(id).cloned()
    }

    /// Return a copy of a technology.
    pub async fn technology(&self, id: TechnologyId) -> Option<Technology> {
        self.inner.lock().await.technology(id).cloned()
    }

    /// Capture both registries.
    pub async fn snapshot(&self) -> CivitasSnapshot {
        self.inner.lock().await.snapshot()
    }

    /// Run a read-only closure against the facade under the lock.
    pub async fn read<R>(&self, f: impl FnOnce(&Civitas) -> R) -> R {
        let guard = self.inner.lock().await;
        f(&guard)
    }
}
