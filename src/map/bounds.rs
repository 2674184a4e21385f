use serde::{Deserialize, Serialize};

use crate::config::MapSettings;
use crate::listings::models::{LatLng, Listing};

/// A lat/lng rectangle. `west > east` means the rectangle crosses the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Bounds {
    pub fn contains(&self, point: LatLng) -> bool {
        if point.lat < self.south || point.lat > self.north {
            return false;
        }
        if self.west <= self.east {
            point.lng >= self.west && point.lng <= self.east
        } else {
            point.lng >= self.west || point.lng <= self.east
        }
    }
}

/// What the map widget reports after a pan or zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub bounds: Bounds,
    pub zoom: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundsFilter {
    pub min_zoom: f64,
    /// Coordinates outside this area are treated as bad data.
    pub service_area: Option<Bounds>,
}

impl Default for BoundsFilter {
    fn default() -> Self {
        Self::from_settings(&MapSettings::default())
    }
}

impl BoundsFilter {
    pub fn from_settings(settings: &MapSettings) -> Self {
        Self {
            min_zoom: settings.min_zoom,
            service_area: settings.service_area,
        }
    }

    /// Zoomed out past `min_zoom` the viewport covers too much to be useful,
    /// so everything is shown.
    pub fn is_active(&self, viewport: &Viewport) -> bool {
        viewport.zoom >= self.min_zoom
    }

    pub fn is_visible(&self, listing: &Listing, viewport: &Viewport) -> bool {
        let Some(point) = listing.coordinates else {
            return false;
        };
        if let Some(area) = &self.service_area {
            if !area.contains(point) {
                return false;
            }
        }
        viewport.bounds.contains(point)
    }

    /// The listings to show for `viewport`, in input order.
    pub fn apply<'a>(&self, listings: &'a [Listing], viewport: &Viewport) -> Vec<&'a Listing> {
        if !self.is_active(viewport) {
            return listings.iter().collect();
        }
        listings
            .iter()
            .filter(|l| self.is_visible(l, viewport))
            .collect()
    }
}
