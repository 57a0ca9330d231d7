//! Rotator motor wire types.
//!
//! These mirror the JSON (and form) bodies exchanged with the rotator's
//! HTTP API. The server is authoritative for all of them; the panel only
//! reads and displays what it gets back.

use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Display format for movement log timestamps.
const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Rotation direction of the stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    #[default]
    Plus,
    Minus,
}

impl MoveDirection {
    /// Lowercase wire value ("plus" / "minus").
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveDirection::Plus => "plus",
            MoveDirection::Minus => "minus",
        }
    }

    /// Sign shown on direction buttons.
    pub fn symbol(&self) -> char {
        match self {
            MoveDirection::Plus => '+',
            MoveDirection::Minus => '-',
        }
    }

    /// Parse a `<select>` / form value. Unknown values yield `None`.
    pub fn from_form_value(value: &str) -> Option<Self> {
        match value.trim() {
            "plus" => Some(MoveDirection::Plus),
            "minus" => Some(MoveDirection::Minus),
            _ => None,
        }
    }
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Motor status from the /api/status endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct MotorStatus {
    /// Current angular position in degrees
    pub degrees: f64,
    /// Current position in motor steps
    pub steps: i64,
    /// Whether a movement is in progress
    pub is_moving: bool,
    /// Whether the stepper driver is powered
    pub is_enabled: bool,
}

impl MotorStatus {
    /// Position formatted with one decimal, e.g. "90.0°".
    pub fn position_label(&self) -> String {
        format!("{:.1}°", self.degrees)
    }

    pub fn motion_label(&self) -> &'static str {
        if self.is_moving {
            "Moving"
        } else {
            "Stopped"
        }
    }

    pub fn enabled_label(&self) -> &'static str {
        if self.is_enabled {
            "Yes"
        } else {
            "No"
        }
    }
}

/// Envelope returned by GET /api/status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub motor: MotorStatus,
}

/// Relative move request, sent form-encoded to /api/motor/move.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MoveCommand {
    pub direction: MoveDirection,
    /// Move distance in degrees, within (0, 360]
    pub degrees: f64,
}

/// Acknowledgement body of the move/stop/reset endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

/// Request body for /api/goto_angle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GotoAngleRequest {
    pub angle: f64,
}

/// Request body for /api/set_direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SetDirectionRequest {
    pub direction: MoveDirection,
}

/// Request body for /api/set_step_period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StepPeriodRequest {
    /// Delay between step pulses in milliseconds (>= 1)
    pub period_ms: u32,
}

/// Request body for /api/do_steps.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DoStepsRequest {
    /// Signed step count; the sign selects the direction
    pub steps: i64,
}

/// Empty JSON object (`{}`) sent to the stepper enable/disable endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct EmptyRequest {}

/// Positional form of a movement log row as the server sends it.
type LogRow = (String, f64, i64, String, String);

/// One row of the movement log.
///
/// On the wire this is a five element array
/// `[direction, degrees, steps, created_at, username]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "LogRow", into = "LogRow")]
pub struct LogEntry {
    pub direction: String,
    pub degrees: f64,
    pub steps: i64,
    /// Server-assigned creation timestamp (ISO 8601)
    pub created_at: String,
    pub username: String,
}

impl From<LogRow> for LogEntry {
    fn from((direction, degrees, steps, created_at, username): LogRow) -> Self {
        Self {
            direction,
            degrees,
            steps,
            created_at,
            username,
        }
    }
}

impl From<LogEntry> for LogRow {
    fn from(entry: LogEntry) -> Self {
        (
            entry.direction,
            entry.degrees,
            entry.steps,
            entry.created_at,
            entry.username,
        )
    }
}

impl LogEntry {
    /// Headline of a log row, e.g. "goto angle - 45°".
    pub fn summary(&self) -> String {
        format!("{} - {}°", self.direction.replace('_', " "), self.degrees)
    }

    /// Detail line of a log row, e.g. "25 steps by alice".
    pub fn details(&self) -> String {
        format!("{} steps by {}", self.steps, self.username)
    }

    /// Creation time as "YYYY-MM-DD HH:MM:SS".
    ///
    /// Accepts RFC 3339 and offset-less ISO timestamps; anything else is
    /// returned verbatim.
    pub fn created_at_label(&self) -> String {
        if let Ok(time) = DateTime::parse_from_rfc3339(&self.created_at) {
            return time.format(LOG_TIME_FORMAT).to_string();
        }
        if let Ok(time) = NaiveDateTime::parse_from_str(&self.created_at, "%Y-%m-%dT%H:%M:%S%.f") {
            return time.format(LOG_TIME_FORMAT).to_string();
        }
        self.created_at.clone()
    }
}

/// Envelope returned by GET /api/logs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogsResponse {
    pub logs: Vec<LogEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_response_parses() {
        let json = r#"{"motor": {"degrees": 12.25, "steps": 68, "is_moving": true,
            "is_enabled": false}}"#;
        let response: StatusResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.motor,
            MotorStatus {
                degrees: 12.25,
                steps: 68,
                is_moving: true,
                is_enabled: false,
            }
        );
    }

    #[test]
    fn test_status_labels() {
        let status = MotorStatus {
            degrees: 89.96,
            steps: 500,
            is_moving: false,
            is_enabled: true,
        };
        assert_eq!(status.position_label(), "90.0°");
        assert_eq!(status.motion_label(), "Stopped");
        assert_eq!(status.enabled_label(), "Yes");
    }

    #[test]
    fn test_direction_wire_format() {
        let body = SetDirectionRequest {
            direction: MoveDirection::Minus,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"direction":"minus"}"#
        );
        assert_eq!(
            MoveDirection::from_form_value("plus"),
            Some(MoveDirection::Plus)
        );
        assert_eq!(MoveDirection::from_form_value("up"), None);
    }

    #[test]
    fn test_empty_request_is_empty_object() {
        assert_eq!(serde_json::to_string(&EmptyRequest {}).unwrap(), "{}");
    }

    #[test]
    fn test_log_entry_from_positional_row() {
        let json = r#"{"logs": [["goto_angle", 45.0, 25, "2024-03-01T12:30:45+00:00", "alice"]]}"#;
        let response: LogsResponse = serde_json::from_str(json).unwrap();
        let entry = &response.logs[0];

        assert_eq!(entry.direction, "goto_angle");
        assert_eq!(entry.username, "alice");
        assert_eq!(entry.summary(), "goto angle - 45°");
        assert_eq!(entry.details(), "25 steps by alice");
        assert_eq!(entry.created_at_label(), "2024-03-01 12:30:45");
    }

    #[test]
    fn test_log_timestamp_fallbacks() {
        let mut entry = LogEntry {
            direction: "plus".to_string(),
            degrees: 10.5,
            steps: 6,
            created_at: "2024-03-01T08:00:01.250".to_string(),
            username: "bob".to_string(),
        };
        assert_eq!(entry.created_at_label(), "2024-03-01 08:00:01");

        entry.created_at = "yesterday".to_string();
        assert_eq!(entry.created_at_label(), "yesterday");
    }
}
