pub mod browser_view;
pub mod components;
pub mod panel_app;

pub use panel_app::MotorPanel;
