pub mod dropdowns;
pub mod queue_panel;
pub mod router;
pub mod settings;
pub mod splash;
