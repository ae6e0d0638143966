//! The drawing seam between the reconciler and a concrete map.

use crate::config::MapConfig;
use crate::error::MapResult;
use corral_types::Coordinate;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Invoked when the user clicks a marker.
pub type ClickHandler = Arc<dyn Fn() + Send + Sync>;

/// Which surface is drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Live,
    Simulated,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Live => f.write_str("live"),
            Backend::Simulated => f.write_str("simulated"),
        }
    }
}

/// Opaque handle to a drawn marker, issued by the surface that drew it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MarkerHandle(pub u64);

/// What to draw for one pin.
#[derive(Clone)]
pub struct MarkerSpec {
    pub pin_id: String,
    pub coordinate: Coordinate,
    pub color: &'static str,
    pub popup: String,
    pub on_click: ClickHandler,
}

impl fmt::Debug for MarkerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerSpec")
            .field("pin_id", &self.pin_id)
            .field("coordinate", &self.coordinate)
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

/// Where a marker ended up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Placement {
    /// Drawn at its geographic coordinate.
    Geo { lat: f64, lng: f64 },
    /// Drawn in a grid cell, with the cell's pixel position.
    Grid { column: u32, row: u32, x: u32, y: u32 },
}

/// A drawn marker as the surface reports it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedMarker {
    pub handle: MarkerHandle,
    pub pin_id: String,
    pub color: &'static str,
    pub placement: Placement,
    pub popup: String,
}

/// A drawing surface: either a live map engine or the simulated grid.
pub trait MapSurface: Send {
    fn backend(&self) -> Backend;

    /// Creates the map in its container with the initial view.
    fn mount(&mut self, config: &MapConfig) -> MapResult<()>;

    fn add_tile_layer(&mut self, url: &str, attribution: &str) -> MapResult<()>;

    fn set_view(&mut self, center: Coordinate, zoom: u8) -> MapResult<()>;

    fn add_marker(&mut self, marker: MarkerSpec) -> MapResult<MarkerHandle>;

    fn remove_marker(&mut self, handle: MarkerHandle) -> MapResult<()>;

    fn marker_count(&self) -> usize;

    /// Drawn markers in the order they were added.
    fn markers(&self) -> Vec<RenderedMarker>;

    /// Simulates a click on `handle`. Returns false for unknown handles.
    fn click(&self, handle: MarkerHandle) -> bool;

    /// Current view, once one has been set.
    fn view(&self) -> Option<(Coordinate, u8)>;
}
