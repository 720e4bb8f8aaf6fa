// Presentation layer - Render surfaces, renderers and the operator console
pub mod app_state;
pub mod chart_renderer;
pub mod handlers;
pub mod page;
pub mod slot_log_renderer;
pub mod tiles;
