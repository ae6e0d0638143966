//! The upstream entity list shared by the coordinator and the map views.

use corral_types::{EntityId, TrackedEntity};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::debug;

/// Ordered, shared list of tracked entities.
///
/// Every mutation bumps a revision counter published on a watch channel, so
/// views re-derive their projections whenever the list changes. Clones share
/// the same list.
#[derive(Debug, Clone)]
pub struct EntityStore {
    entities: Arc<RwLock<Vec<TrackedEntity>>>,
    revision: Arc<watch::Sender<u64>>,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self::with_entities(Vec::new())
    }

    pub fn with_entities(entities: Vec<TrackedEntity>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            entities: Arc::new(RwLock::new(entities)),
            revision: Arc::new(revision),
        }
    }

    /// Receiver that observes every revision bump.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    fn bump(&self) {
        self.revision.send_modify(|r| *r += 1);
    }

    /// Copy of the current list, in order.
    pub async fn snapshot(&self) -> Vec<TrackedEntity> {
        self.entities.read().await.clone()
    }

    pub async fn get(&self, id: &EntityId) -> Option<TrackedEntity> {
        self.entities.read().await.iter().find(|e| &e.id == id).cloned()
    }

    pub async fn contains(&self, id: &EntityId) -> bool {
        self.entities.read().await.iter().any(|e| &e.id == id)
    }

    pub async fn len(&self) -> usize {
        self.entities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entities.read().await.is_empty()
    }

    /// Replaces the entity with the same id in place, or appends it.
    pub async fn upsert(&self, entity: TrackedEntity) {
        {
            let mut entities = self.entities.write().await;
            match entities.iter_mut().find(|e| e.id == entity.id) {
                Some(slot) => *slot = entity,
                None => entities.push(entity),
            }
        }
        self.bump();
    }

    /// Swaps the entity stored under `id` for `entity` (which may carry a
    /// different id), keeping its position. Appends if `id` is gone.
    pub async fn replace(&self, id: &EntityId, entity: TrackedEntity) {
        {
            let mut entities = self.entities.write().await;
            entities.retain(|e| e.id == *id || e.id != entity.id);
            match entities.iter_mut().find(|e| &e.id == id) {
                Some(slot) => *slot = entity,
                None => entities.push(entity),
            }
        }
        debug!("Replaced entity {id}");
        self.bump();
    }

    /// Removes and returns the entity with `id`.
    pub async fn remove(&self, id: &EntityId) -> Option<TrackedEntity> {
        let removed = {
            let mut entities = self.entities.write().await;
            let index = entities.iter().position(|e| &e.id == id)?;
            entities.remove(index)
        };
        self.bump();
        Some(removed)
    }

    /// Replaces the whole list.
    pub async fn replace_all(&self, entities: Vec<TrackedEntity>) {
        *self.entities.write().await = entities;
        self.bump();
    }
}
