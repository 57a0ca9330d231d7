//! Panel UI state.
//!
//! `PanelState` is everything the view renders: the last status the server
//! reported, which controls have a command in flight, the notification
//! slot and the movement log. It has no I/O; the controller drives it.

use std::collections::HashSet;

use crate::motor::{LogEntry, MotorStatus};

/// Placeholder shown before the first status arrives.
pub const NO_VALUE: &str = "--";

/// Text rendered for an empty movement log.
pub const EMPTY_LOGS_TEXT: &str = "No movements recorded yet";

/// Text rendered when the movement log could not be fetched.
pub const FAILED_LOGS_TEXT: &str = "Failed to load logs";

/// Every control that can trigger a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    Move,
    Stop,
    Reset,
    SetZero,
    GotoAngle,
    DirectionPlus,
    DirectionMinus,
    StepPeriod,
    DoSteps,
    EnableStepper,
    DisableStepper,
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageKind {
    #[default]
    Success,
    Error,
}

impl MessageKind {
    /// CSS class of the banner.
    pub fn css_class(&self) -> &'static str {
        match self {
            MessageKind::Success => "success",
            MessageKind::Error => "error",
        }
    }
}

/// The notification currently shown.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// Monotonic id; expiry timers carry it so a stale timer cannot clear
    /// a newer message.
    pub id: u64,
    pub text: String,
    pub kind: MessageKind,
}

/// State of the movement log section.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LogsView {
    #[default]
    Loading,
    Loaded(Vec<LogEntry>),
    Failed,
}

#[derive(Debug, Default)]
pub struct PanelState {
    status: Option<MotorStatus>,
    is_moving: bool,
    pending: HashSet<ControlId>,
    message: Option<Notice>,
    next_message_id: u64,
    logs: LogsView,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    // === Status ===

    /// Last status the server reported, if any.
    pub fn status(&self) -> Option<&MotorStatus> {
        self.status.as_ref()
    }

    /// Overwrite the displayed status. Last writer wins; nothing is merged.
    pub fn apply_status(&mut self, status: MotorStatus) {
        self.is_moving = status.is_moving;
        self.status = Some(status);
    }

    /// Locally tracked motion flag. Set optimistically by move/stop and
    /// replaced by every status update.
    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    pub fn set_moving(&mut self, moving: bool) {
        self.is_moving = moving;
    }

    pub fn position_label(&self) -> String {
        self.status
            .map(|s| s.position_label())
            .unwrap_or_else(|| NO_VALUE.to_string())
    }

    pub fn steps_label(&self) -> String {
        self.status
            .map(|s| s.steps.to_string())
            .unwrap_or_else(|| NO_VALUE.to_string())
    }

    pub fn motion_label(&self) -> &'static str {
        self.status.map_or(NO_VALUE, |s| s.motion_label())
    }

    pub fn enabled_label(&self) -> &'static str {
        self.status.map_or(NO_VALUE, |s| s.enabled_label())
    }

    // === Controls ===

    /// Mark a control pending. Returns false if it already was, in which
    /// case the caller must not issue the command.
    pub fn try_begin(&mut self, control: ControlId) -> bool {
        self.pending.insert(control)
    }

    /// Release a pending control.
    pub fn finish(&mut self, control: ControlId) {
        self.pending.remove(&control);
    }

    pub fn is_pending(&self, control: ControlId) -> bool {
        self.pending.contains(&control)
    }

    /// Whether the control should render disabled.
    ///
    /// A control is disabled while its own command is in flight. Move is
    /// also disabled while the motor moves, and stop while it does not.
    pub fn is_disabled(&self, control: ControlId) -> bool {
        self.is_pending(control) || self.disabled_by_status(control)
    }

    fn disabled_by_status(&self, control: ControlId) -> bool {
        let moving = self.status.is_some_and(|s| s.is_moving);
        match control {
            ControlId::Move => moving,
            ControlId::Stop => !moving,
            _ => false,
        }
    }

    // === Notifications ===

    /// Replace the notification slot. Returns the id to expire it with.
    pub fn show_message(&mut self, text: impl Into<String>, kind: MessageKind) -> u64 {
        self.next_message_id += 1;
        let id = self.next_message_id;
        self.message = Some(Notice {
            id,
            text: text.into(),
            kind,
        });
        id
    }

    /// Clear the notification if it is still the one with `id`.
    pub fn expire_message(&mut self, id: u64) -> bool {
        if self.message.as_ref().is_some_and(|m| m.id == id) {
            self.message = None;
            true
        } else {
            false
        }
    }

    pub fn message(&self) -> Option<&Notice> {
        self.message.as_ref()
    }

    // === Logs ===

    pub fn logs(&self) -> &LogsView {
        &self.logs
    }

    pub fn set_logs(&mut self, logs: LogsView) {
        self.logs = logs;
    }
}
