//! Optimistic CRUD coordinator.
//!
//! Mutations are dispatched through [`RanchApi`] and reconciled into the
//! [`EntityStore`]:
//!
//! - **create** and field **update** are applied locally first; each records a
//!   [`Compensation`] that undoes the local change if the server rejects it;
//! - **location updates** are applied when the call resolves, in resolution
//!   order, subject to the [`OrderingPolicy`];
//! - **delete** asks for confirmation and only touches local state after the
//!   server confirms.
//!
//! Create, update and delete share one "submitting" flag per coordinator, so a
//! second trigger while one is in flight is rejected with
//! [`CoordinatorError::Busy`].

use crate::error::{CoordinatorError, CoordinatorResult};
use crate::geolocation::{Geolocator, PositionOptions};
use crate::store::EntityStore;
use crate::validation::validate_cattle;
use async_trait::async_trait;
use corral_client::RanchApi;
use corral_types::{
    CattleFields, EntityId, LocationSource, LocationUpdate, TrackedEntity, TrackingConfig,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Asks the user to confirm a destructive action.
#[async_trait]
pub trait Confirmation: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Answers every prompt the same way.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

#[async_trait]
impl Confirmation for AutoConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        debug!("Auto-answering {:?} with {}", prompt, self.0);
        self.0
    }
}

/// How overlapping location updates for one entity are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderingPolicy {
    /// Whichever call resolves last wins, even if it carries an older reading.
    #[default]
    LastResolvedWins,
    /// A resolving update older than the applied location is discarded.
    MonotonicTimestamp,
}

/// Undo record for an optimistic local change.
#[derive(Debug)]
enum Compensation {
    /// Drop a speculative insert.
    Remove(EntityId),
    /// Put back the prior values of the edited `data` keys and drop the keys
    /// in `absent`, which did not exist before the edit.
    Revert {
        id: EntityId,
        previous: Map<String, Value>,
        absent: Vec<String>,
    },
}

impl Compensation {
    /// Records the values `changes` is about to overwrite in `entity`.
    fn revert(entity: &TrackedEntity, changes: &Map<String, Value>) -> Self {
        let mut previous = Map::new();
        let mut absent = Vec::new();
        for key in changes.keys() {
            match entity.data.get(key) {
                Some(value) => {
                    previous.insert(key.clone(), value.clone());
                }
                None => absent.push(key.clone()),
            }
        }
        Compensation::Revert {
            id: entity.id.clone(),
            previous,
            absent,
        }
    }

    /// Undoes the change against the store's current state, so anything
    /// applied meanwhile (a confirmed location, say) survives.
    async fn apply(self, store: &EntityStore) {
        match self {
            Compensation::Remove(id) => {
                store.remove(&id).await;
                debug!("Rolled back optimistic insert {id}");
            }
            Compensation::Revert {
                id,
                previous,
                absent,
            } => {
                let Some(mut current) = store.get(&id).await else {
                    debug!("{id} is gone, nothing to revert");
                    return;
                };
                for key in &absent {
                    current.data.remove(key);
                }
                current.data.extend(previous);
                debug!("Reverted edited fields of {id} after failed update");
                store.upsert(current).await;
            }
        }
    }
}

/// Clears the submitting flag when the mutation ends, however it ends.
struct Submitting<'a>(&'a AtomicBool);

impl<'a> Submitting<'a> {
    fn begin(flag: &'a AtomicBool) -> CoordinatorResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| CoordinatorError::Busy)
    }
}

impl Drop for Submitting<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Applies mutations from one view.
pub struct Coordinator {
    api: RanchApi,
    store: EntityStore,
    confirmation: Arc<dyn Confirmation>,
    ordering: OrderingPolicy,
    submitting: AtomicBool,
}

impl Coordinator {
    pub fn new(api: RanchApi, store: EntityStore, confirmation: Arc<dyn Confirmation>) -> Self {
        Self {
            api,
            store,
            confirmation,
            ordering: OrderingPolicy::default(),
            submitting: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn with_ordering(mut self, ordering: OrderingPolicy) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn ordering(&self) -> OrderingPolicy {
        self.ordering
    }

    /// Returns true while a create, update or delete is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Reloads the entity list from the backend, replacing local state.
    pub async fn refresh(&self) -> CoordinatorResult<usize> {
        let entities = self.api.list_cattle().await?;
        let count = entities.len();
        self.store.replace_all(entities).await;
        info!("Refreshed {count} entities");
        Ok(count)
    }

    /// Creates an animal.
    ///
    /// Fails with `Validation` before any request when required fields are
    /// missing. The entity is inserted under a local id right away and swapped
    /// for the server's version on success; on failure the insert is undone.
    pub async fn create(&self, fields: CattleFields) -> CoordinatorResult<TrackedEntity> {
        let _submitting = Submitting::begin(&self.submitting)?;
        validate_cattle(&fields)?;

        let local_id = EntityId::local();
        self.store.upsert(fields.to_entity(local_id.clone())?).await;
        let compensation = Compensation::Remove(local_id.clone());

        match self.api.create_cattle(&fields).await {
            Ok(created) => {
                info!("Created {} as {}", created.label(), created.id);
                self.store.replace(&local_id, created.clone()).await;
                Ok(created)
            }
            Err(e) => {
                warn!("Create failed, rolling back {local_id}: {e}");
                compensation.apply(&self.store).await;
                Err(e.into())
            }
        }
    }

    /// Updates domain fields of an entity.
    ///
    /// The changes are merged locally at once. On success the server's version
    /// replaces them; on failure only the edited keys get their old values
    /// back. Either way the location held locally is kept, since location
    /// updates may resolve while this call is in flight.
    pub async fn update(
        &self,
        id: &EntityId,
        changes: Map<String, Value>,
    ) -> CoordinatorResult<TrackedEntity> {
        let _submitting = Submitting::begin(&self.submitting)?;
        let mut edited = self
            .store
            .get(id)
            .await
            .ok_or_else(|| CoordinatorError::NotFound(id.clone()))?;

        let compensation = Compensation::revert(&edited, &changes);
        edited.data.extend(changes.clone());
        self.store.upsert(edited).await;

        match self.api.update_cattle(id, &changes).await {
            Ok(mut updated) => {
                let Some(current) = self.store.get(id).await else {
                    warn!("{id} was removed while its update was in flight");
                    return Ok(updated);
                };
                updated.location = current.location;
                self.store.replace(id, updated.clone()).await;
                Ok(updated)
            }
            Err(e) => {
                warn!("Update of {id} failed: {e}");
                compensation.apply(&self.store).await;
                Err(e.into())
            }
        }
    }

    /// Replaces an entity's location.
    ///
    /// Nothing changes locally until the server accepts the update. The
    /// submitted location is then applied wholesale, replacing the previous
    /// one, unless the ordering policy discards it as stale.
    pub async fn update_location(
        &self,
        id: &EntityId,
        update: LocationUpdate,
    ) -> CoordinatorResult<TrackedEntity> {
        if !self.store.contains(id).await {
            return Err(CoordinatorError::NotFound(id.clone()));
        }

        let confirmed = self.api.update_location(id, &update).await?;

        // Re-read after the await: the entity may have moved on meanwhile.
        let Some(current) = self.store.get(id).await else {
            warn!("{id} was removed while its location update was in flight");
            return Err(CoordinatorError::NotFound(id.clone()));
        };

        if self.ordering == OrderingPolicy::MonotonicTimestamp {
            if let Some(applied) = &current.location {
                if applied.timestamp > update.location.timestamp {
                    warn!(
                        "Discarding location for {id} from {} (applied: {})",
                        update.location.timestamp, applied.timestamp
                    );
                    return Err(CoordinatorError::StaleUpdate(id.clone()));
                }
            }
        }

        let mut applied = current;
        applied.data.extend(confirmed.data);
        if confirmed.updated_at.is_some() {
            applied.updated_at = confirmed.updated_at;
        }
        applied.location = Some(update.location);
        debug!("Applied location for {id}");
        self.store.upsert(applied.clone()).await;
        Ok(applied)
    }

    /// Reads the current position and submits it as a GPS location update.
    pub async fn track_current_position(
        &self,
        id: &EntityId,
        geolocator: &Geolocator,
        options: PositionOptions,
        tracking: TrackingConfig,
    ) -> CoordinatorResult<TrackedEntity> {
        let position = geolocator.current_position(options).await?;
        let update = LocationUpdate::new(position.into_location(LocationSource::Gps))
            .with_tracking_config(tracking);
        self.update_location(id, update).await
    }

    /// Deletes an entity after the user confirms.
    ///
    /// Not optimistic: the entity leaves the store only after the server
    /// confirms, and a failure leaves local state untouched.
    pub async fn delete(&self, id: &EntityId) -> CoordinatorResult<()> {
        let _submitting = Submitting::begin(&self.submitting)?;
        let entity = self
            .store
            .get(id)
            .await
            .ok_or_else(|| CoordinatorError::NotFound(id.clone()))?;

        let prompt = format!("Delete {}? This cannot be undone.", entity.label());
        if !self.confirmation.confirm(&prompt).await {
            debug!("Delete of {id} cancelled");
            return Err(CoordinatorError::ConfirmationAborted);
        }

        self.api.delete_cattle(id).await?;
        self.store.remove(id).await;
        info!("Deleted {id}");
        Ok(())
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("ordering", &self.ordering)
            .field("submitting", &self.is_submitting())
            .finish_non_exhaustive()
    }
}
