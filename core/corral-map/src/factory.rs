//! Picks the surface a map view draws on.

use crate::config::MapConfig;
use crate::live::{EngineProvider, LiveSurface};
use crate::simulated::SimulatedSurface;
use crate::surface::MapSurface;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Builds a mounted surface for one map view.
///
/// An engine that is already present is used directly. Otherwise a single
/// load is attempted; if that fails, or mounting fails, the view draws on
/// the simulated grid for the rest of its life.
#[derive(Clone, Default)]
pub struct SurfaceFactory {
    provider: Option<Arc<dyn EngineProvider>>,
}

impl SurfaceFactory {
    pub fn new(provider: Arc<dyn EngineProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// A factory with no engine: every view is simulated.
    pub fn simulated_only() -> Self {
        Self::default()
    }

    pub async fn create(&self, config: &MapConfig) -> Box<dyn MapSurface> {
        if let Some(provider) = &self.provider {
            let engine = match provider.detect() {
                Some(engine) => {
                    debug!("Map engine already present");
                    Ok(engine)
                }
                None => {
                    debug!("Loading map engine");
                    provider.load().await
                }
            };
            match engine {
                Ok(engine) => {
                    let mut live = LiveSurface::new(engine);
                    match mount(&mut live, config) {
                        Ok(()) => {
                            info!("Map view using live engine");
                            return Box::new(live);
                        }
                        Err(e) => warn!("Failed to mount map engine, using simulated map: {e}"),
                    }
                }
                Err(e) => warn!("Map engine unavailable, using simulated map: {e}"),
            }
        }

        let mut simulated = SimulatedSurface::new();
        if let Err(e) = mount(&mut simulated, config) {
            warn!("Failed to mount simulated map: {e}");
        }
        Box::new(simulated)
    }
}

impl std::fmt::Debug for SurfaceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceFactory")
            .field("has_provider", &self.provider.is_some())
            .finish()
    }
}

fn mount(surface: &mut dyn MapSurface, config: &MapConfig) -> crate::MapResult<()> {
    surface.mount(config)?;
    surface.add_tile_layer(&config.tile_url, &config.attribution)
}
