// Settings persister - Saves the detection settings form
use crate::application::parking_backend::{CommandError, ParkingBackend};
use crate::application::surfaces::{Notice, NoticeLevel, Surfaces};
use crate::domain::settings::SettingsPayload;
use std::sync::Arc;

const SUCCESS: &str = "success";

#[derive(Clone)]
pub struct SettingsPersister {
    backend: Arc<dyn ParkingBackend>,
    surfaces: Surfaces,
}

impl SettingsPersister {
    pub fn new(backend: Arc<dyn ParkingBackend>, surfaces: Surfaces) -> Self {
        Self { backend, surfaces }
    }

    /// Read the form, send it, and tell the operator how it went.
    pub async fn save(&self) -> Result<SettingsPayload, CommandError> {
        let Some(form) = &self.surfaces.settings_form else {
            let e = CommandError::MissingSurface {
                command: "save_settings",
                surface: "settings form",
            };
            tracing::error!("Error saving settings: {}", e);
            self.surfaces
                .notify(Notice::new(NoticeLevel::Error, e.to_string()));
            return Err(e);
        };
        let payload = SettingsPayload::from_form(&form.read());

        let result = match self.backend.save_settings(&payload).await {
            Ok(status) if status == SUCCESS => Ok(payload),
            Ok(status) => Err(CommandError::Rejected {
                command: "save_settings",
                status,
            }),
            Err(e) => Err(e),
        };

        match &result {
            Ok(_) => {
                tracing::info!("Settings saved");
                self.surfaces
                    .notify(Notice::new(NoticeLevel::Info, "Settings saved"));
            }
            Err(e) => {
                tracing::error!("Error saving settings: {}", e);
                self.surfaces.notify(Notice::new(
                    NoticeLevel::Error,
                    format!("Settings were not saved: {}", e),
                ));
            }
        }

        result
    }
}
