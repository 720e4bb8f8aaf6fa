// HTTP/JSON client for the parking monitor backend
use crate::application::parking_backend::{CommandError, FetchError, ParkingBackend};
use crate::domain::settings::SettingsPayload;
use crate::domain::snapshot::StatsSnapshot;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const SWITCH_SOURCE: &str = "switch_source";
const SAVE_SETTINGS: &str = "save_settings";

#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct SwitchSourceRequest<'a> {
    source: &'a str,
}

#[derive(Debug, Deserialize)]
struct SwitchSourceResponse {
    source: String,
}

#[derive(Debug, Deserialize)]
struct SaveSettingsResponse {
    status: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post_command<B, R>(&self, command: &'static str, body: &B) -> Result<R, CommandError>
    where
        B: Serialize + Sync,
        R: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(command))
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| CommandError::Transport {
                command,
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(CommandError::Status {
                command,
                status: response.status().as_u16(),
            });
        }

        response.json::<R>().await.map_err(|e| CommandError::Decode {
            command,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl ParkingBackend for HttpBackend {
    async fn fetch_stats(&self) -> Result<StatsSnapshot, FetchError> {
        let response = self
            .client
            .get(self.url("stats"))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        serde_json::from_slice::<StatsSnapshot>(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }

    async fn switch_source(&self, source: &str) -> Result<String, CommandError> {
        tracing::debug!("Requesting source switch to {}", source);
        let response: SwitchSourceResponse = self
            .post_command(SWITCH_SOURCE, &SwitchSourceRequest { source })
            .await?;
        Ok(response.source)
    }

    async fn save_settings(&self, payload: &SettingsPayload) -> Result<String, CommandError> {
        let response: SaveSettingsResponse = self.post_command(SAVE_SETTINGS, payload).await?;
        Ok(response.status)
    }
}
