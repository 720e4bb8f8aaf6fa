// Render surfaces the dashboard writes to, and the startup capability descriptor
use crate::domain::settings::SettingsForm;
use crate::domain::time_series::Series;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SlotStatus {
    Occupied,
    Vacant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotRow {
    pub label: String,
    pub status: SlotStatus,
    pub duration: String,
}

pub trait TextSurface: Send + Sync {
    fn set_text(&self, text: &str);
}

pub trait ChartSurface: Send + Sync {
    fn replace_series(&self, series: &Series);
    fn redraw(&self);
}

pub trait TableSurface: Send + Sync {
    fn replace_rows(&self, rows: Vec<SlotRow>);
}

pub trait SelectorSurface: Send + Sync {
    fn value(&self) -> String;
    fn set_value(&self, value: &str);
}

pub trait VideoSurface: Send + Sync {
    fn address(&self) -> String;
    fn set_address(&self, address: &str);
}

pub trait SettingsFormSurface: Send + Sync {
    fn read(&self) -> SettingsForm;
}

pub trait NoticeSurface: Send + Sync {
    fn push(&self, notice: Notice);
}

/// Which surfaces this page exposes. Collected once at startup.
#[derive(Clone, Default)]
pub struct Surfaces {
    pub capacity: Option<Arc<dyn TextSurface>>,
    pub occupied: Option<Arc<dyn TextSurface>>,
    pub available: Option<Arc<dyn TextSurface>>,
    pub utilization: Option<Arc<dyn TextSurface>>,
    pub chart: Option<Arc<dyn ChartSurface>>,
    pub slot_log: Option<Arc<dyn TableSurface>>,
    pub source_selector: Option<Arc<dyn SelectorSurface>>,
    pub video: Option<Arc<dyn VideoSurface>>,
    pub settings_form: Option<Arc<dyn SettingsFormSurface>>,
    pub notices: Option<Arc<dyn NoticeSurface>>,
}

impl Surfaces {
    pub fn has_tiles(&self) -> bool {
        self.capacity.is_some()
            || self.occupied.is_some()
            || self.available.is_some()
            || self.utilization.is_some()
    }

    /// True when a poll would have anything to update.
    pub fn has_poll_targets(&self) -> bool {
        self.has_tiles()
            || self.chart.is_some()
            || self.slot_log.is_some()
            || self.source_selector.is_some()
    }

    /// Show a notice to the operator when the page has a notice area.
    pub fn notify(&self, notice: Notice) {
        if let Some(notices) = &self.notices {
            notices.push(notice);
        }
    }
}
