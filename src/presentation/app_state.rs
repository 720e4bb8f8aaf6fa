// Application state for console handlers
use crate::application::dashboard_controller::DashboardController;
use crate::application::settings_persister::SettingsPersister;
use crate::application::source_switcher::SourceSwitcher;
use crate::application::surfaces::Surfaces;
use crate::presentation::page::Page;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub page: Page,
    pub surfaces: Surfaces,
    pub controller: Arc<DashboardController>,
    pub source_switcher: SourceSwitcher,
    pub settings_persister: SettingsPersister,
}
