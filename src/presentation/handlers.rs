// Operator console request handlers
use crate::application::dashboard_controller::ControllerStatus;
use crate::application::parking_backend::CommandError;
use crate::domain::settings::SettingsForm;
use crate::domain::snapshot::StatsSnapshot;
use crate::presentation::app_state::AppState;
use crate::presentation::page::{FormUpdate, PageState};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct SwitchSourceBody {
    pub source: String,
}

#[derive(Serialize)]
pub struct PageResponse {
    #[serde(flatten)]
    pub page: PageState,
    pub controller: ControllerStatus,
    pub last_snapshot: Option<StatsSnapshot>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Everything the page currently shows
pub async fn get_page(State(state): State<Arc<AppState>>) -> Json<PageResponse> {
    Json(PageResponse {
        page: state.page.state(),
        controller: state.controller.status(),
        last_snapshot: state.controller.snapshot(),
    })
}

/// Operator picked a source in the selector
pub async fn switch_source(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SwitchSourceBody>,
) -> Response {
    if let Some(selector) = &state.surfaces.source_selector {
        selector.set_value(&body.source);
    }

    match state.source_switcher.switch(&body.source).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => command_failed(e),
    }
}

/// Operator edited the settings form
pub async fn update_form(
    State(state): State<Arc<AppState>>,
    Json(update): Json<FormUpdate>,
) -> Json<SettingsForm> {
    Json(state.page.update_form(update))
}

/// Operator flipped the dark-mode toggle
pub async fn toggle_dark_mode(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let dark_mode = state.page.toggle_dark_mode();
    tracing::info!("Dark mode {}", if dark_mode { "on" } else { "off" });
    Json(json!({ "dark_mode": dark_mode }))
}

/// Operator pressed save on the settings form
pub async fn save_settings(State(state): State<Arc<AppState>>) -> Response {
    match state.settings_persister.save().await {
        Ok(payload) => Json(json!({ "status": "success", "saved": payload })).into_response(),
        Err(e) => command_failed(e),
    }
}

fn command_failed(error: CommandError) -> Response {
    let status = match error {
        CommandError::MissingSurface { .. } => StatusCode::CONFLICT,
        _ => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(json!({ "error": error.to_string() })),
    )
        .into_response()
}
