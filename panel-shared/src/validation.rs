//! Client-side validation of panel inputs.
//!
//! Every numeric field is checked here before a request is built, so an
//! invalid value never reaches the network. Inputs arrive as the raw text of
//! the form field.

use crate::motor::MoveCommand;
use crate::MoveDirection;

/// Upper bound of a relative move, in degrees.
pub const MAX_MOVE_DEGREES: f64 = 360.0;

/// Lower bound of the goto-angle slider, in degrees.
pub const GOTO_ANGLE_MIN: f64 = -75.0;

/// Upper bound of the goto-angle slider, in degrees.
pub const GOTO_ANGLE_MAX: f64 = 75.0;

/// Smallest accepted step period, in milliseconds.
pub const MIN_STEP_PERIOD_MS: u32 = 1;

/// Input rejected before any request was sent.
///
/// The display text is the message shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a valid angle between 0 and 360 degrees")]
    MoveDegrees,
    #[error("Please enter a valid number for zero position.")]
    ZeroPosition,
    #[error("Please select a valid angle.")]
    GotoAngle,
    #[error("Please enter a valid step period.")]
    StepPeriod,
    #[error("Please enter a valid number of steps.")]
    StepCount,
}

/// Check a relative move distance: finite and within (0, 360].
pub fn validate_move_degrees(degrees: f64) -> Result<f64, ValidationError> {
    if degrees.is_finite() && degrees > 0.0 && degrees <= MAX_MOVE_DEGREES {
        Ok(degrees)
    } else {
        Err(ValidationError::MoveDegrees)
    }
}

/// Parse the move form into a command.
pub fn parse_move_command(
    direction: MoveDirection,
    degrees: &str,
) -> Result<MoveCommand, ValidationError> {
    let degrees = degrees
        .trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::MoveDegrees)?;
    Ok(MoveCommand {
        direction,
        degrees: validate_move_degrees(degrees)?,
    })
}

/// Parse the zero-position field (any integer step offset).
pub fn parse_zero_position(input: &str) -> Result<i64, ValidationError> {
    input
        .trim()
        .parse()
        .map_err(|_| ValidationError::ZeroPosition)
}

/// Parse the goto-angle slider value, bounded to the slider range.
pub fn parse_goto_angle(input: &str) -> Result<f64, ValidationError> {
    let angle = input
        .trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::GotoAngle)?;
    if angle.is_finite() && (GOTO_ANGLE_MIN..=GOTO_ANGLE_MAX).contains(&angle) {
        Ok(angle)
    } else {
        Err(ValidationError::GotoAngle)
    }
}

/// Parse the step period field; must be a whole number of at least 1 ms.
pub fn parse_step_period(input: &str) -> Result<u32, ValidationError> {
    match input.trim().parse::<u32>() {
        Ok(period) if period >= MIN_STEP_PERIOD_MS => Ok(period),
        _ => Err(ValidationError::StepPeriod),
    }
}

/// Parse the step count field; negative counts step backwards.
pub fn parse_step_count(input: &str) -> Result<i64, ValidationError> {
    input
        .trim()
        .parse()
        .map_err(|_| ValidationError::StepCount)
}
