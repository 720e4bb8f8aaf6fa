// Application layer - Poll orchestration and operator commands
pub mod dashboard_controller;
pub mod parking_backend;
pub mod settings_persister;
pub mod source_switcher;
pub mod surfaces;
