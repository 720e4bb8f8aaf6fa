// Detection settings domain models
use serde::{Deserialize, Serialize};

pub const SENSITIVITY_MIN: u8 = 10;
pub const SENSITIVITY_MAX: u8 = 90;

/// Settings form as the operator last left it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsForm {
    /// Slider position on the 10–90 scale.
    pub sensitivity: u8,
    pub dark_mode: bool,
    pub notifications: bool,
    pub source_priority: String,
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self {
            sensitivity: 50,
            dark_mode: false,
            notifications: true,
            source_priority: "auto".to_string(),
        }
    }
}

/// Body of `POST /save_settings`. Built on save and dropped after sending.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPayload {
    pub sensitivity: f64,
    pub dark_mode: bool,
    pub notifications: bool,
    pub source_priority: String,
}

impl SettingsPayload {
    pub fn from_form(form: &SettingsForm) -> Self {
        let slider = form.sensitivity.clamp(SENSITIVITY_MIN, SENSITIVITY_MAX);
        Self {
            sensitivity: f64::from(slider) / 100.0,
            dark_mode: form.dark_mode,
            notifications: form.notifications,
            source_priority: form.source_priority.clone(),
        }
    }
}
