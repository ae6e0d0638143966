//! Map views for Corral.
//!
//! A [`Reconciler`] derives one [`LocationPin`] per located entity and
//! redraws them on a [`MapSurface`]. The surface is a [`LiveSurface`] when a
//! map engine can be found or loaded, and a [`SimulatedSurface`] grid
//! otherwise. Marker colour encodes the age of the reading.

mod config;
mod error;
pub mod factory;
pub mod live;
pub mod palette;
pub mod pin;
pub mod reconciler;
mod selection;
pub mod simulated;
pub mod surface;

pub use config::{MapConfig, DEFAULT_ATTRIBUTION, DEFAULT_TILE_URL};
pub use error::{MapError, MapResult};
pub use factory::SurfaceFactory;
pub use live::{EngineProvider, LiveSurface, MapEngine};
pub use palette::{age_color, AgeBucket};
pub use pin::{pin_id, pins_for, LocationPin};
pub use reconciler::{Reconciler, RenderReport};
pub use selection::Selection;
pub use simulated::{grid_placement, SimulatedSurface};
pub use surface::{
    Backend, ClickHandler, MapSurface, MarkerHandle, MarkerSpec, Placement, RenderedMarker,
};
