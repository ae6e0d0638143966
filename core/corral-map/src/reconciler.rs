//! Keeps a map surface in step with the entity store.
//!
//! Every pass recomputes the pin set, removes every drawn marker and draws
//! one marker per pin. The view recentres only when exactly one pin exists.

use crate::config::MapConfig;
use crate::error::MapResult;
use crate::factory::SurfaceFactory;
use crate::palette::age_color;
use crate::pin::LocationPin;
use crate::selection::Selection;
use crate::surface::{Backend, ClickHandler, MapSurface, MarkerHandle, MarkerSpec};
use chrono::{DateTime, Utc};
use corral_sync::EntityStore;
use corral_types::{CattleLocation, TrackedEntity};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// What one reconciliation pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderReport {
    pub pins: usize,
    pub markers_removed: usize,
    pub markers_added: usize,
    pub recentered: bool,
    pub backend: Backend,
}

pub struct Reconciler {
    surface: Box<dyn MapSurface>,
    config: MapConfig,
    /// Pin id to pin, in first-seen order.
    pins: IndexMap<String, LocationPin>,
    drawn: Vec<MarkerHandle>,
    selection: Selection,
}

impl Reconciler {
    /// Wraps an already mounted surface.
    pub fn new(surface: Box<dyn MapSurface>, config: MapConfig) -> Self {
        Self {
            surface,
            config,
            pins: IndexMap::new(),
            drawn: Vec::new(),
            selection: Selection::new(),
        }
    }

    /// Creates and mounts a surface through `factory`.
    pub async fn open(factory: &SurfaceFactory, config: MapConfig) -> Self {
        let surface = factory.create(&config).await;
        Self::new(surface, config)
    }

    pub fn backend(&self) -> Backend {
        self.surface.backend()
    }

    pub fn surface(&self) -> &dyn MapSurface {
        self.surface.as_ref()
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Current pins in insertion order.
    pub fn pins(&self) -> impl ExactSizeIterator<Item = &LocationPin> {
        self.pins.values()
    }

    pub fn pin(&self, pin_id: &str) -> Option<&LocationPin> {
        self.pins.get(pin_id)
    }

    /// Re-derives pins from `entities` and redraws.
    pub fn reconcile(
        &mut self,
        entities: &[TrackedEntity],
        now: DateTime<Utc>,
    ) -> MapResult<RenderReport> {
        self.apply(entities.iter().filter_map(LocationPin::from_entity), now)
    }

    /// Same as [`Reconciler::reconcile`] for rows of `/maps/cattle-locations`.
    pub fn reconcile_locations(
        &mut self,
        rows: &[CattleLocation],
        now: DateTime<Utc>,
    ) -> MapResult<RenderReport> {
        self.apply(rows.iter().filter_map(LocationPin::from_cattle_location), now)
    }

    /// One pass against the store's current contents.
    pub async fn sync_with(&mut self, store: &EntityStore) -> MapResult<RenderReport> {
        let entities = store.snapshot().await;
        self.reconcile(&entities, Utc::now())
    }

    /// Redraws after every store revision. Runs until the store is dropped
    /// or a pass fails.
    pub async fn follow(&mut self, store: &EntityStore) -> MapResult<()> {
        let mut revisions = store.subscribe();
        loop {
            revisions.borrow_and_update();
            self.sync_with(store).await?;
            if revisions.changed().await.is_err() {
                return Ok(());
            }
        }
    }

    fn apply(
        &mut self,
        fresh: impl Iterator<Item = LocationPin>,
        now: DateTime<Utc>,
    ) -> MapResult<RenderReport> {
        let mut incoming: IndexMap<String, LocationPin> = IndexMap::new();
        for pin in fresh {
            incoming.insert(pin.id.clone(), pin);
        }
        self.pins.retain(|id, _| incoming.contains_key(id));
        for (id, pin) in incoming {
            self.pins.insert(id, pin);
        }

        // Handles stay in `drawn` until their removal succeeds, so a failed
        // pass leaves them for the next one to clear.
        let mut markers_removed = 0;
        let mut failure = None;
        let surface = &mut self.surface;
        self.drawn.retain(|&handle| {
            if failure.is_some() {
                return true;
            }
            match surface.remove_marker(handle) {
                Ok(()) => {
                    markers_removed += 1;
                    false
                }
                Err(e) => {
                    failure = Some(e);
                    true
                }
            }
        });
        if let Some(e) = failure {
            return Err(e);
        }

        for pin in self.pins.values() {
            let marker = MarkerSpec {
                pin_id: pin.id.clone(),
                coordinate: pin.coordinate,
                color: age_color(pin.timestamp, now),
                popup: pin.detail(),
                on_click: select_on_click(&self.selection, pin),
            };
            let handle = self.surface.add_marker(marker)?;
            self.drawn.push(handle);
        }

        let recentered = match self.pins.first() {
            Some((_, only)) if self.pins.len() == 1 => {
                self.surface.set_view(only.coordinate, self.config.focus_zoom)?;
                true
            }
            _ => false,
        };

        self.selection.retain_from(&self.pins);

        let report = RenderReport {
            pins: self.pins.len(),
            markers_removed,
            markers_added: self.drawn.len(),
            recentered,
            backend: self.surface.backend(),
        };
        debug!(
            pins = report.pins,
            removed = report.markers_removed,
            recentered = report.recentered,
            backend = %report.backend,
            "Map redrawn"
        );
        Ok(report)
    }
}

fn select_on_click(selection: &Selection, pin: &LocationPin) -> ClickHandler {
    let selection = selection.clone();
    let pin = pin.clone();
    Arc::new(move || selection.select(pin.clone()))
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("backend", &self.surface.backend())
            .field("pins", &self.pins.len())
            .field("drawn", &self.drawn.len())
            .finish_non_exhaustive()
    }
}
