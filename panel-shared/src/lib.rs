//! Shared rotator panel code.
//!
//! Wire types, the HTTP client and the panel controller. Everything here
//! builds for both wasm32 (the Yew frontend) and native targets (tests and
//! tooling).

pub mod config;
pub mod controller;
pub mod motor;
pub mod motor_client;
pub mod panel;
mod transport;
pub mod validation;

pub use config::PanelConfig;
pub use controller::{MotorApi, PanelController, PanelView, NETWORK_ERROR_TEXT};
pub use motor::{
    LogEntry, MessageResponse, MotorStatus, MoveCommand, MoveDirection, StatusResponse,
};
pub use motor_client::{MotorError, MotorServerClient};
pub use panel::{ControlId, LogsView, MessageKind, Notice, PanelState};
pub use validation::ValidationError;
