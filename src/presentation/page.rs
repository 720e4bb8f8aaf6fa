// In-process page model backing every render surface
use crate::application::surfaces::{
    ChartSurface, Notice, NoticeSurface, SelectorSurface, SettingsFormSurface, SlotRow, Surfaces,
    TableSurface, TextSurface, VideoSurface,
};
use crate::domain::settings::SettingsForm;
use crate::domain::time_series::Series;
use crate::infrastructure::config::SurfaceSettings;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

const NOTICE_HISTORY: usize = 10;
const EMPTY_TILE: &str = "--";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileView {
    pub capacity: String,
    pub occupied: String,
    pub available: String,
    pub utilization: String,
}

impl Default for TileView {
    fn default() -> Self {
        Self {
            capacity: EMPTY_TILE.to_string(),
            occupied: EMPTY_TILE.to_string(),
            available: EMPTY_TILE.to_string(),
            utilization: EMPTY_TILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartView {
    #[serde(flatten)]
    pub series: Series,
    pub redraws: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageState {
    pub tiles: TileView,
    pub chart: ChartView,
    pub slot_log: Vec<SlotRow>,
    pub source_selector: String,
    pub video_address: String,
    pub settings: SettingsForm,
    pub notices: VecDeque<Notice>,
}

/// Partial edit of the settings form, as sent by the console.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormUpdate {
    pub sensitivity: Option<u8>,
    pub dark_mode: Option<bool>,
    pub notifications: Option<bool>,
    pub source_priority: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum TileKind {
    Capacity,
    Occupied,
    Available,
    Utilization,
}

#[derive(Clone)]
pub struct Page {
    state: Arc<Mutex<PageState>>,
}

impl Page {
    pub fn new(video_address: impl Into<String>) -> Self {
        let state = PageState {
            tiles: TileView::default(),
            chart: ChartView::default(),
            slot_log: Vec::new(),
            source_selector: String::new(),
            video_address: video_address.into(),
            settings: SettingsForm::default(),
            notices: VecDeque::with_capacity(NOTICE_HISTORY),
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn state(&self) -> PageState {
        self.with(|state| state.clone())
    }

    /// Hand out handles for the surfaces this layout exposes.
    pub fn surfaces(&self, layout: &SurfaceSettings) -> Surfaces {
        let tile = |kind| -> Option<Arc<dyn TextSurface>> {
            layout.tiles.then(|| {
                Arc::new(Tile {
                    page: self.clone(),
                    kind,
                }) as Arc<dyn TextSurface>
            })
        };
        let page = Arc::new(self.clone());

        Surfaces {
            capacity: tile(TileKind::Capacity),
            occupied: tile(TileKind::Occupied),
            available: tile(TileKind::Available),
            utilization: tile(TileKind::Utilization),
            chart: layout.chart.then(|| page.clone() as Arc<dyn ChartSurface>),
            slot_log: layout.slot_log.then(|| page.clone() as Arc<dyn TableSurface>),
            source_selector: layout
                .source_selector
                .then(|| page.clone() as Arc<dyn SelectorSurface>),
            video: layout.video.then(|| page.clone() as Arc<dyn VideoSurface>),
            settings_form: layout
                .settings_form
                .then(|| page.clone() as Arc<dyn SettingsFormSurface>),
            notices: layout.notices.then(|| page.clone() as Arc<dyn NoticeSurface>),
        }
    }

    pub fn update_form(&self, update: FormUpdate) -> SettingsForm {
        self.with(|state| {
            let form = &mut state.settings;
            if let Some(sensitivity) = update.sensitivity {
                form.sensitivity = sensitivity;
            }
            if let Some(dark_mode) = update.dark_mode {
                form.dark_mode = dark_mode;
            }
            if let Some(notifications) = update.notifications {
                form.notifications = notifications;
            }
            if let Some(priority) = update.source_priority {
                form.source_priority = priority;
            }
            form.clone()
        })
    }

    /// Flip the dark-mode toggle, returning the new value.
    pub fn toggle_dark_mode(&self) -> bool {
        self.with(|state| {
            state.settings.dark_mode = !state.settings.dark_mode;
            state.settings.dark_mode
        })
    }

    fn with<R>(&self, f: impl FnOnce(&mut PageState) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

struct Tile {
    page: Page,
    kind: TileKind,
}

impl TextSurface for Tile {
    fn set_text(&self, text: &str) {
        self.page.with(|state| {
            let slot = match self.kind {
                TileKind::Capacity => &mut state.tiles.capacity,
                TileKind::Occupied => &mut state.tiles.occupied,
                TileKind::Available => &mut state.tiles.available,
                TileKind::Utilization => &mut state.tiles.utilization,
            };
            text.clone_into(slot);
        });
    }
}

impl ChartSurface for Page {
    fn replace_series(&self, series: &Series) {
        self.with(|state| state.chart.series = series.clone());
    }

    fn redraw(&self) {
        self.with(|state| state.chart.redraws += 1);
    }
}

impl TableSurface for Page {
    fn replace_rows(&self, rows: Vec<SlotRow>) {
        self.with(|state| state.slot_log = rows);
    }
}

impl SelectorSurface for Page {
    fn value(&self) -> String {
        self.with(|state| state.source_selector.clone())
    }

    fn set_value(&self, value: &str) {
        self.with(|state| value.clone_into(&mut state.source_selector));
    }
}

impl VideoSurface for Page {
    fn address(&self) -> String {
        self.with(|state| state.video_address.clone())
    }

    fn set_address(&self, address: &str) {
        self.with(|state| address.clone_into(&mut state.video_address));
    }
}

impl SettingsFormSurface for Page {
    fn read(&self) -> SettingsForm {
        self.with(|state| state.settings.clone())
    }
}

impl NoticeSurface for Page {
    fn push(&self, notice: Notice) {
        self.with(|state| {
            if state.notices.len() == NOTICE_HISTORY {
                state.notices.pop_front();
            }
            state.notices.push_back(notice);
        });
    }
}
