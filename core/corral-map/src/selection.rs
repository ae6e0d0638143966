use crate::pin::LocationPin;
use std::sync::Arc;
use tokio::sync::watch;

/// The pin the user last clicked, shared between markers and views.
#[derive(Debug, Clone)]
pub struct Selection {
    selected: Arc<watch::Sender<Option<LocationPin>>>,
}

impl Default for Selection {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            selected: Arc::new(tx),
        }
    }
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&self, pin: LocationPin) {
        self.selected.send_replace(Some(pin));
    }

    pub fn clear(&self) {
        self.selected.send_if_modified(|current| current.take().is_some());
    }

    pub fn current(&self) -> Option<LocationPin> {
        self.selected.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<LocationPin>> {
        self.selected.subscribe()
    }

    /// Follows a redraw: drops a selection whose pin is gone and picks up
    /// fresh data for one that survived.
    pub(crate) fn retain_from(&self, pins: &indexmap::IndexMap<String, LocationPin>) {
        self.selected.send_if_modified(|current| {
            let Some(id) = current.as_ref().map(|pin| pin.id.clone()) else {
                return false;
            };
            match pins.get(&id) {
                Some(fresh) if current.as_ref() == Some(fresh) => false,
                Some(fresh) => {
                    *current = Some(fresh.clone());
                    true
                }
                None => {
                    *current = None;
                    true
                }
            }
        });
    }
}
