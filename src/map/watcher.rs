use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::debug;

use crate::config::MapSettings;
use crate::listings::models::Listing;
use crate::map::bounds::{BoundsFilter, Viewport};
use crate::map::debounce::Debouncer;

/// What the page shows after the map settles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapUpdate {
    pub visible: Vec<Listing>,
    /// Size of the full set, before bounds filtering.
    pub total: usize,
    pub viewport: Viewport,
    /// False when zoomed out far enough that everything is shown.
    pub filtering: bool,
}

impl MapUpdate {
    pub fn compute(filter: &BoundsFilter, listings: &[Listing], viewport: Viewport) -> Self {
        let visible: Vec<Listing> = filter.apply(listings, &viewport).into_iter().cloned().collect();
        Self {
            visible,
            total: listings.len(),
            viewport,
            filtering: filter.is_active(&viewport),
        }
    }
}

type Shared = Arc<Mutex<Arc<Vec<Listing>>>>;

/// Feeds debounced viewport changes through the bounds filter and hands the
/// result to `sink`.
pub struct ViewportWatcher {
    listings: Shared,
    debouncer: Debouncer<Viewport>,
}

impl ViewportWatcher {
    /// Must be called inside a tokio runtime.
    pub fn new<F>(filter: BoundsFilter, delay: Duration, sink: F) -> Self
    where
        F: Fn(MapUpdate) + Send + Sync + 'static,
    {
        let listings: Shared = Arc::new(Mutex::new(Arc::new(Vec::new())));

        let current = listings.clone();
        let debouncer = Debouncer::new(delay, move |viewport: Viewport| {
            let snapshot = current.lock().unwrap_or_else(PoisonError::into_inner).clone();
            let update = MapUpdate::compute(&filter, &snapshot, viewport);
            debug!(
                visible = update.visible.len(),
                total = update.total,
                zoom = viewport.zoom,
                filtering = update.filtering,
                "Viewport settled"
            );
            sink(update);
        });

        Self {
            listings,
            debouncer,
        }
    }

    pub fn from_settings<F>(settings: &MapSettings, sink: F) -> Self
    where
        F: Fn(MapUpdate) + Send + Sync + 'static,
    {
        Self::new(
            BoundsFilter::from_settings(settings),
            Duration::from_millis(settings.debounce_ms),
            sink,
        )
    }

    /// Replaces the full set, e.g. after the search criteria change.
    /// Pending viewport events are evaluated against the new set.
    pub fn set_listings(&self, listings: Vec<Listing>) {
        *self.listings.lock().unwrap_or_else(PoisonError::into_inner) = Arc::new(listings);
    }

    pub fn viewport_changed(&self, viewport: Viewport) {
        self.debouncer.trigger(viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::bounds::Bounds;
    use serde_json::json;

    fn at(mls: &str, lat: f64, lng: f64) -> Listing {
        serde_json::from_value(json!({ "mlsNumber": mls, "lat": lat, "lng": lng })).unwrap()
    }

    fn viewport(north: f64, zoom: f64) -> Viewport {
        Viewport {
            bounds: Bounds { north, south: 43.10, east: -80.20, west: -80.35 },
            zoom,
        }
    }

    fn recording_watcher() -> (ViewportWatcher, Arc<Mutex<Vec<MapUpdate>>>) {
        let updates = Arc::new(Mutex::new(Vec::new()));
        let sink = updates.clone();
        let watcher = ViewportWatcher::from_settings(&MapSettings::default(), move |u| {
            sink.lock().unwrap().push(u)
        });
        (watcher, updates)
    }

    #[tokio::test(start_paused = true)]
    async fn pan_burst_yields_single_update_for_last_viewport() {
        let (watcher, updates) = recording_watcher();
        watcher.set_listings(vec![at("A", 43.12, -80.3), at("B", 43.18, -80.25)]);

        watcher.viewport_changed(viewport(43.20, 12.0));
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        watcher.viewport_changed(viewport(43.15, 12.0));
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;

        let updates = updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        let update = &updates[0];
        assert_eq!(update.total, 2);
        assert!(update.filtering);
        assert_eq!(update.visible.len(), 1);
        assert_eq!(update.visible[0].mls_number, "A");
    }

    #[tokio::test(start_paused = true)]
    async fn pending_event_sees_replaced_listings() {
        let (watcher, updates) = recording_watcher();
        watcher.set_listings(vec![at("OLD", 43.12, -80.3)]);

        watcher.viewport_changed(viewport(43.20, 8.0));
        watcher.set_listings(vec![at("N1", 43.12, -80.3), at("N2", 43.9, -81.0)]);
        tokio::time::sleep(std::time::Duration::from_millis(400)).await;

        let updates = updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert!(!updates[0].filtering);
        assert_eq!(updates[0].visible.len(), 2);
    }
}
