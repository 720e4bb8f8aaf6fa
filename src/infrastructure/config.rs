use serde::Deserialize;
use std::time::Duration;

const CONFIG_FILE: &str = "config/dashboard";
const ENV_PREFIX: &str = "PARKING_DASHBOARD";

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub backend: BackendSettings,
    pub poll: PollSettings,
    pub console: ConsoleSettings,
    pub surfaces: SurfaceSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub video_path: String,
}

impl BackendSettings {
    /// Address of the video element before any cache-busting.
    pub fn video_address(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.video_path)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollSettings {
    pub interval_ms: u64,
    pub timeout_ms: u64,
    pub max_in_flight: usize,
}

impl PollSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            timeout_ms: 5000,
            max_in_flight: 1,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConsoleSettings {
    pub bind: String,
}

/// Surfaces present on the page. Anything switched off is never touched.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SurfaceSettings {
    pub tiles: bool,
    pub chart: bool,
    pub slot_log: bool,
    pub source_selector: bool,
    pub video: bool,
    pub settings_form: bool,
    pub notices: bool,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            tiles: true,
            chart: true,
            slot_log: true,
            source_selector: true,
            video: true,
            settings_form: true,
            notices: true,
        }
    }
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    builder
        .set_default("backend.base_url", "http://127.0.0.1:8000")?
        .set_default("backend.video_path", "/video_feed")?
        .set_default("poll.interval_ms", 1000)?
        .set_default("poll.timeout_ms", 5000)?
        .set_default("poll.max_in_flight", 1)?
        .set_default("console.bind", "127.0.0.1:8090")?
        .set_default("surfaces.tiles", true)?
        .set_default("surfaces.chart", true)?
        .set_default("surfaces.slot_log", true)?
        .set_default("surfaces.source_selector", true)?
        .set_default("surfaces.video", true)?
        .set_default("surfaces.settings_form", true)?
        .set_default("surfaces.notices", true)
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = with_defaults(config::Config::builder())?
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: DashboardConfig = settings.try_deserialize()?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &DashboardConfig) -> anyhow::Result<()> {
    anyhow::ensure!(
        config.poll.max_in_flight > 0,
        "poll.max_in_flight must be at least 1"
    );
    anyhow::ensure!(config.poll.interval_ms > 0, "poll.interval_ms must be positive");
    anyhow::ensure!(config.poll.timeout_ms > 0, "poll.timeout_ms must be positive");
    Ok(())
}
