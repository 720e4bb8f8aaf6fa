// Source switcher - Operator-requested video source changes
use crate::application::parking_backend::{CommandError, ParkingBackend};
use crate::application::surfaces::{Notice, NoticeLevel, Surfaces};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchOutcome {
    pub requested: String,
    pub confirmed: String,
    /// The backend picked a different source than the one requested.
    pub overridden: bool,
}

#[derive(Clone)]
pub struct SourceSwitcher {
    backend: Arc<dyn ParkingBackend>,
    surfaces: Surfaces,
    video_address: String,
}

impl SourceSwitcher {
    pub fn new(backend: Arc<dyn ParkingBackend>, surfaces: Surfaces, video_address: String) -> Self {
        Self {
            backend,
            surfaces,
            video_address,
        }
    }

    pub async fn switch(&self, requested: &str) -> Result<SwitchOutcome, CommandError> {
        let confirmed = match self.backend.switch_source(requested).await {
            Ok(confirmed) => confirmed,
            Err(e) => {
                tracing::error!("Error switching source to {}: {}", requested, e);
                self.surfaces.notify(Notice::new(
                    NoticeLevel::Error,
                    format!("Could not switch to {}: {}", requested, e),
                ));
                return Err(e);
            }
        };

        let overridden = confirmed != requested;
        if overridden {
            tracing::warn!("Backend kept source {} instead of requested {}", confirmed, requested);
            self.surfaces.notify(Notice::new(
                NoticeLevel::Warning,
                format!(
                    "Source {} is unavailable, the backend is using {} instead",
                    requested, confirmed
                ),
            ));
        } else {
            tracing::info!("Switched source to {}", confirmed);
        }

        self.reload_video();

        Ok(SwitchOutcome {
            requested: requested.to_string(),
            confirmed,
            overridden,
        })
    }

    fn reload_video(&self) {
        if let Some(video) = &self.surfaces.video {
            let busted = cache_busted(&self.video_address, chrono::Utc::now().timestamp_millis());
            // Same millisecond as the last reload would leave the address unchanged.
            let busted = if busted == video.address() {
                format!("{}1", busted)
            } else {
                busted
            };
            video.set_address(&busted);
        }
    }
}

pub fn cache_busted(address: &str, stamp: i64) -> String {
    format!("{}?v={}", address, stamp)
}
