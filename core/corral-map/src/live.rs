//! Adapter over an external map engine.

use crate::config::MapConfig;
use crate::error::{MapError, MapResult};
use crate::surface::{
    Backend, ClickHandler, MapSurface, MarkerHandle, MarkerSpec, Placement, RenderedMarker,
};
use async_trait::async_trait;
use corral_types::Coordinate;
use indexmap::IndexMap;

/// Primitives a map engine must offer. Marker ids are engine-assigned.
pub trait MapEngine: Send {
    fn create_map(&mut self, container: &str, center: Coordinate, zoom: u8) -> MapResult<()>;

    fn add_tile_layer(&mut self, url: &str, attribution: &str) -> MapResult<()>;

    fn add_marker(
        &mut self,
        coordinate: Coordinate,
        color: &str,
        popup: &str,
        on_click: ClickHandler,
    ) -> MapResult<u64>;

    fn remove_marker(&mut self, id: u64) -> MapResult<()>;

    fn set_view(&mut self, center: Coordinate, zoom: u8) -> MapResult<()>;
}

/// Finds or loads a map engine.
#[async_trait]
pub trait EngineProvider: Send + Sync {
    /// Returns an engine that is already present, if any.
    fn detect(&self) -> Option<Box<dyn MapEngine>>;

    /// Loads the engine. Called at most once per view.
    async fn load(&self) -> MapResult<Box<dyn MapEngine>>;
}

struct LiveMarker {
    pin_id: String,
    coordinate: Coordinate,
    color: &'static str,
    popup: String,
    on_click: ClickHandler,
}

/// Draws through a [`MapEngine`] at real coordinates.
pub struct LiveSurface {
    engine: Box<dyn MapEngine>,
    markers: IndexMap<MarkerHandle, LiveMarker>,
    view: Option<(Coordinate, u8)>,
}

impl LiveSurface {
    pub fn new(engine: Box<dyn MapEngine>) -> Self {
        Self {
            engine,
            markers: IndexMap::new(),
            view: None,
        }
    }
}

impl std::fmt::Debug for LiveSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveSurface")
            .field("markers", &self.markers.len())
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

impl MapSurface for LiveSurface {
    fn backend(&self) -> Backend {
        Backend::Live
    }

    fn mount(&mut self, config: &MapConfig) -> MapResult<()> {
        self.engine
            .create_map(&config.container, config.center, config.zoom)?;
        self.view = Some((config.center, config.zoom));
        Ok(())
    }

    fn add_tile_layer(&mut self, url: &str, attribution: &str) -> MapResult<()> {
        self.engine.add_tile_layer(url, attribution)
    }

    fn set_view(&mut self, center: Coordinate, zoom: u8) -> MapResult<()> {
        self.engine.set_view(center, zoom)?;
        self.view = Some((center, zoom));
        Ok(())
    }

    fn add_marker(&mut self, marker: MarkerSpec) -> MapResult<MarkerHandle> {
        let id = self.engine.add_marker(
            marker.coordinate,
            marker.color,
            &marker.popup,
            marker.on_click.clone(),
        )?;
        let handle = MarkerHandle(id);
        self.markers.insert(
            handle,
            LiveMarker {
                pin_id: marker.pin_id,
                coordinate: marker.coordinate,
                color: marker.color,
                popup: marker.popup,
                on_click: marker.on_click,
            },
        );
        Ok(handle)
    }

    fn remove_marker(&mut self, handle: MarkerHandle) -> MapResult<()> {
        if !self.markers.contains_key(&handle) {
            return Err(MapError::UnknownMarker(handle.0));
        }
        self.engine.remove_marker(handle.0)?;
        self.markers.shift_remove(&handle);
        Ok(())
    }

    fn marker_count(&self) -> usize {
        self.markers.len()
    }

    fn markers(&self) -> Vec<RenderedMarker> {
        self.markers
            .iter()
            .map(|(handle, marker)| RenderedMarker {
                handle: *handle,
                pin_id: marker.pin_id.clone(),
                color: marker.color,
                placement: Placement::Geo {
                    lat: marker.coordinate.lat,
                    lng: marker.coordinate.lng,
                },
                popup: marker.popup.clone(),
            })
            .collect()
    }

    fn click(&self, handle: MarkerHandle) -> bool {
        match self.markers.get(&handle) {
            Some(marker) => {
                (marker.on_click)();
                true
            }
            None => false,
        }
    }

    fn view(&self) -> Option<(Coordinate, u8)> {
        self.view
    }
}
