// Metric tile formatting and updates
use crate::application::surfaces::{Surfaces, TextSurface};
use crate::domain::snapshot::StatsSnapshot;
use std::sync::Arc;

/// Text shown on each metric tile for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileTexts {
    pub capacity: String,
    pub occupied: String,
    pub available: String,
    pub utilization: String,
}

impl TileTexts {
    pub fn from_snapshot(snapshot: &StatsSnapshot) -> Self {
        Self {
            capacity: snapshot.total.to_string(),
            occupied: snapshot.occupied.to_string(),
            available: snapshot.vacant.to_string(),
            utilization: format_utilization(snapshot.utilization),
        }
    }
}

pub fn format_utilization(percent: f64) -> String {
    format!("{:.1}%", percent)
}

/// Write tile text to whichever tiles the page has.
pub fn render_tiles(surfaces: &Surfaces, snapshot: &StatsSnapshot) {
    let texts = TileTexts::from_snapshot(snapshot);
    set(&surfaces.capacity, &texts.capacity);
    set(&surfaces.occupied, &texts.occupied);
    set(&surfaces.available, &texts.available);
    set(&surfaces.utilization, &texts.utilization);
}

fn set(tile: &Option<Arc<dyn TextSurface>>, text: &str) {
    if let Some(tile) = tile {
        tile.set_text(text);
    }
}
