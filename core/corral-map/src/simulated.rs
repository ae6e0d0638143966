//! Grid layout used when no map engine is available.
//!
//! Markers are not placed by coordinate. The N-th marker added lands in
//! column `N mod 7`, row `N / 7` of an 800x600 canvas, with 100x80 cells
//! starting at (50, 40). Rows past the bottom edge keep the same pitch.

use crate::config::MapConfig;
use crate::error::{MapError, MapResult};
use crate::surface::{
    Backend, ClickHandler, MapSurface, MarkerHandle, MarkerSpec, Placement, RenderedMarker,
};
use corral_types::Coordinate;
use indexmap::IndexMap;

pub const CANVAS_WIDTH: u32 = 800;
pub const CELL_WIDTH: u32 = 100;
pub const CELL_HEIGHT: u32 = 80;
pub const ORIGIN_X: u32 = 50;
pub const ORIGIN_Y: u32 = 40;
/// Cells that fit between the left and right margins.
pub const GRID_COLUMNS: u32 = (CANVAS_WIDTH - 2 * ORIGIN_X) / CELL_WIDTH;

/// Cell and pixel position of the `slot`-th marker.
pub fn grid_placement(slot: usize) -> Placement {
    let slot = u32::try_from(slot).unwrap_or(u32::MAX);
    let column = slot % GRID_COLUMNS;
    let row = slot / GRID_COLUMNS;
    Placement::Grid {
        column,
        row,
        x: ORIGIN_X + column * CELL_WIDTH,
        y: ORIGIN_Y.saturating_add(row.saturating_mul(CELL_HEIGHT)),
    }
}

struct GridMarker {
    pin_id: String,
    color: &'static str,
    popup: String,
    on_click: ClickHandler,
}

/// In-memory surface that lays markers out on a fixed grid.
#[derive(Default)]
pub struct SimulatedSurface {
    container: Option<String>,
    tile_layer: Option<String>,
    view: Option<(Coordinate, u8)>,
    markers: IndexMap<MarkerHandle, GridMarker>,
    next_handle: u64,
}

impl SimulatedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn container(&self) -> Option<&str> {
        self.container.as_deref()
    }

    pub fn tile_layer(&self) -> Option<&str> {
        self.tile_layer.as_deref()
    }
}

impl std::fmt::Debug for SimulatedSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedSurface")
            .field("container", &self.container)
            .field("view", &self.view)
            .field("markers", &self.markers.len())
            .finish()
    }
}

impl MapSurface for SimulatedSurface {
    fn backend(&self) -> Backend {
        Backend::Simulated
    }

    fn mount(&mut self, config: &MapConfig) -> MapResult<()> {
        self.container = Some(config.container.clone());
        self.view = Some((config.center, config.zoom));
        Ok(())
    }

    fn add_tile_layer(&mut self, url: &str, _attribution: &str) -> MapResult<()> {
        self.tile_layer = Some(url.to_string());
        Ok(())
    }

    fn set_view(&mut self, center: Coordinate, zoom: u8) -> MapResult<()> {
        self.view = Some((center, zoom));
        Ok(())
    }

    fn add_marker(&mut self, marker: MarkerSpec) -> MapResult<MarkerHandle> {
        let handle = MarkerHandle(self.next_handle);
        self.next_handle += 1;
        self.markers.insert(
            handle,
            GridMarker {
                pin_id: marker.pin_id,
                color: marker.color,
                popup: marker.popup,
                on_click: marker.on_click,
            },
        );
        Ok(handle)
    }

    fn remove_marker(&mut self, handle: MarkerHandle) -> MapResult<()> {
        self.markers
            .shift_remove(&handle)
            .map(|_| ())
            .ok_or(MapError::UnknownMarker(handle.0))
    }

    fn marker_count(&self) -> usize {
        self.markers.len()
    }

    fn markers(&self) -> Vec<RenderedMarker> {
        self.markers
            .iter()
            .enumerate()
            .map(|(slot, (handle, marker))| RenderedMarker {
                handle: *handle,
                pin_id: marker.pin_id.clone(),
                color: marker.color,
                placement: grid_placement(slot),
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
