//! HTTP client for interacting with the rotator motor API.
//!
//! This module provides a unified client that works in both native Rust
//! and WASM (frontend) environments. All API interactions are consolidated
//! here for consistent error handling and type safety.

use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use crate::config::{PanelConfig, DEFAULT_REQUEST_TIMEOUT};
use crate::motor::{
    DoStepsRequest, EmptyRequest, GotoAngleRequest, LogEntry, LogsResponse, MessageResponse,
    MotorStatus, MoveCommand, MoveDirection, SetDirectionRequest, StatusResponse,
    StepPeriodRequest,
};
use crate::transport::{Body, Method, Transport};

/// Error type for rotator server operations.
#[derive(Debug, thiserror::Error)]
pub enum MotorError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(String),
    /// Failed to parse response
    #[error("Parse error: {0}")]
    Parse(String),
    /// Connection failed
    #[error("Connection error: {0}")]
    Connection(String),
    /// Request timed out
    #[error("Timeout")]
    Timeout,
    /// Server returned an error status
    #[error("Server error (status {status}): {message}")]
    ServerError { status: u16, message: String },
}

impl MotorError {
    /// Human-readable detail supplied by the server, if it sent any.
    pub fn server_detail(&self) -> Option<&str> {
        match self {
            MotorError::ServerError { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }

    /// True when no HTTP response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            MotorError::Http(_) | MotorError::Connection(_) | MotorError::Timeout
        )
    }
}

#[cfg(target_arch = "wasm32")]
impl From<gloo_net::Error> for MotorError {
    fn from(err: gloo_net::Error) -> Self {
        MotorError::Http(err.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<reqwest::Error> for MotorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MotorError::Timeout
        } else if err.is_connect() {
            MotorError::Connection(err.to_string())
        } else {
            MotorError::Http(err.to_string())
        }
    }
}

/// Best-effort detail text from an error response body.
///
/// A JSON body yields its string `detail` or `message` field, or nothing
/// when neither is a string (e.g. a validation error list). A body that is
/// not JSON is returned as trimmed text (possibly empty).
pub fn error_detail(body: &str) -> String {
    let body = body.trim();
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => ["detail", "message"]
            .into_iter()
            .find_map(|field| value.get(field).and_then(serde_json::Value::as_str))
            .unwrap_or_default()
            .to_string(),
        Err(_) => body.to_string(),
    }
}

/// Client for interacting with the rotator HTTP API.
///
/// Works in both native Rust and WASM environments.
#[derive(Debug, Clone)]
pub struct MotorServerClient {
    base_url: String,
    transport: Transport,
}

impl MotorServerClient {
    /// Create a new client pointing to the given base URL.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the rotator server (e.g., "http://localhost:8000")
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client with an explicit request timeout (native only).
    pub fn with_timeout(base_url: &str, request_timeout: Duration) -> Self {
        // Remove trailing slash if present
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            transport: Transport::new(request_timeout),
        }
    }

    /// Create a client from panel configuration.
    pub fn from_config(config: &PanelConfig) -> Self {
        Self::with_timeout(&config.api_base, config.request_timeout)
    }

    /// Get the base URL this client is configured for.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute (or same-origin) URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // === Internal HTTP helpers ===

    async fn request(&self, method: Method, path: &str, body: Body) -> Result<String, MotorError> {
        let url = self.url(path);
        let response = self.transport.send(method, &url, body).await?;

        if !response.ok() {
            return Err(MotorError::ServerError {
                status: response.status,
                message: error_detail(&response.body),
            });
        }

        Ok(response.body)
    }

    fn decode<T: DeserializeOwned>(body: &str) -> Result<T, MotorError> {
        serde_json::from_str(body).map_err(|e| MotorError::Parse(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, MotorError> {
        let body = self.request(Method::Get, path, Body::Empty).await?;
        Self::decode(&body)
    }

    async fn post_json_no_response<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<(), MotorError> {
        let json = serde_json::to_string(body).map_err(|e| MotorError::Parse(e.to_string()))?;
        self.request(Method::Post, path, Body::Json(json)).await?;
        Ok(())
    }

    async fn post_form<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, MotorError> {
        let form =
            serde_urlencoded::to_string(body).map_err(|e| MotorError::Parse(e.to_string()))?;
        let body = self.request(Method::Post, path, Body::Form(form)).await?;
        Self::decode(&body)
    }

    async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> Result<R, MotorError> {
        let body = self.request(Method::Post, path, Body::Empty).await?;
        Self::decode(&body)
    }

    // === Motion ===

    /// Start a relative move.
    ///
    /// # Arguments
    ///
    /// * `command` - Direction and distance; sent form-encoded
    ///
    /// # Returns
    ///
    /// The server's acknowledgement message.
    pub async fn move_motor(&self, command: &MoveCommand) -> Result<MessageResponse, MotorError> {
        self.post_form("/api/motor/move", command).await
    }

    /// Stop any movement in progress.
    pub async fn stop_motor(&self) -> Result<MessageResponse, MotorError> {
        self.post_empty("/api/motor/stop").await
    }

    /// Reset the position counter.
    pub async fn reset_position(&self) -> Result<MessageResponse, MotorError> {
        self.post_empty("/api/motor/reset").await
    }

    /// Move to an absolute angle in degrees.
    pub async fn goto_angle(&self, angle: f64) -> Result<(), MotorError> {
        self.post_json_no_response("/api/goto_angle", &GotoAngleRequest { angle })
            .await
    }

    /// Issue a raw step count; the sign selects the direction.
    pub async fn do_steps(&self, steps: i64) -> Result<(), MotorError> {
        self.post_json_no_response("/api/do_steps", &DoStepsRequest { steps })
            .await
    }

    // === Status and logs ===

    /// Get current motor status.
    ///
    /// # Returns
    ///
    /// Position, step count, and the moving/enabled flags.
    pub async fn get_status(&self) -> Result<MotorStatus, MotorError> {
        let response: StatusResponse = self.get("/api/status").await?;
        Ok(response.motor)
    }

    /// Get the most recent movement log entries.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of rows to return
    pub async fn get_logs(&self, limit: usize) -> Result<Vec<LogEntry>, MotorError> {
        let response: LogsResponse = self.get(&format!("/api/logs?limit={limit}")).await?;
        Ok(response.logs)
    }

    // === Stepper configuration ===

    /// Declare the step count that corresponds to zero degrees.
    ///
    /// The body is a bare JSON integer.
    pub async fn set_zero_position(&self, zero: i64) -> Result<(), MotorError> {
        self.post_json_no_response("/api/set_zero_position", &zero)
            .await
    }

    /// Set the stepper direction pin.
    pub async fn set_direction(&self, direction: MoveDirection) -> Result<(), MotorError> {
        self.post_json_no_response("/api/set_direction", &SetDirectionRequest { direction })
            .await
    }

    /// Set the delay between step pulses.
    pub async fn set_step_period(&self, period_ms: u32) -> Result<(), MotorError> {
        self.post_json_no_response("/api/set_step_period", &StepPeriodRequest { period_ms })
            .await
    }

    /// Power the stepper driver.
    pub async fn enable_stepper(&self) -> Result<(), MotorError> {
        self.post_json_no_response("/api/enable_stepper", &EmptyRequest {})
            .await
    }

    /// Release the stepper driver.
    pub async fn disable_stepper(&self) -> Result<(), MotorError> {
        self.post_json_no_response("/api/disable_stepper", &EmptyRequest {})
            .await
    }

    // === Host ===

    /// Power off the device host. The response body is ignored.
    pub async fn shutdown(&self) -> Result<(), MotorError> {
        self.request(Method::Post, "/api/shutdown", Body::Empty)
            .await?;
        Ok(())
    }
}
