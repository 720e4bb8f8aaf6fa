// Main entry point - Dependency injection, poll loop and console setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_controller::DashboardController;
use crate::application::parking_backend::ParkingBackend;
use crate::application::settings_persister::SettingsPersister;
use crate::application::source_switcher::SourceSwitcher;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_backend::HttpBackend;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_page, health_check, save_settings, switch_source, toggle_dark_mode, update_form,
};
use crate::presentation::page::Page;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Backend client (infrastructure layer)
    let backend: Arc<dyn ParkingBackend> = Arc::new(HttpBackend::new(&config.backend.base_url)?);

    // Page surfaces, decided once for the configured layout
    let video_address = config.backend.video_address();
    let page = Page::new(video_address.clone());
    let surfaces = page.surfaces(&config.surfaces);

    // Services (application layer)
    let controller = Arc::new(DashboardController::new(
        backend.clone(),
        surfaces.clone(),
        &config.poll,
    ));
    let source_switcher = SourceSwitcher::new(backend.clone(), surfaces.clone(), video_address);
    let settings_persister = SettingsPersister::new(backend, surfaces.clone());

    tokio::spawn(controller.clone().run());

    let state = Arc::new(AppState {
        page,
        surfaces,
        controller,
        source_switcher,
        settings_persister,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/page", get(get_page))
        .route("/form", put(update_form))
        .route("/actions/switch-source", post(switch_source))
        .route("/actions/dark-mode", post(toggle_dark_mode))
        .route("/actions/save-settings", post(save_settings))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start console
    let addr: SocketAddr = config.console.bind.parse()?;
    tracing::info!(
        "Starting parking dashboard console on {} (backend {})",
        addr,
        config.backend.base_url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
