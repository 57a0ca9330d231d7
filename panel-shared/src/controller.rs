//! Panel controller.
//!
//! `PanelController` owns the panel state and turns operator intents into
//! rotator API calls. It is constructed explicitly with an API
//! implementation and a view, and handed to whatever renders the panel.
//!
//! All handlers are async and run on a single-threaded executor. State is
//! never borrowed across an `.await`, so a status poll and a command may be
//! in flight at the same time; whichever finishes last wins the display.

use std::cell::{Cell, Ref, RefCell};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use futures_util::future::{AbortHandle, Abortable};
use futures_util::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::config::PanelConfig;
use crate::motor::{LogEntry, MessageResponse, MotorStatus, MoveCommand, MoveDirection};
use crate::motor_client::{MotorError, MotorServerClient};
use crate::panel::{ControlId, LogsView, MessageKind, PanelState};
use crate::validation::{self, ValidationError};

/// Shown for any request that never got an HTTP response.
pub const NETWORK_ERROR_TEXT: &str = "Network error. Please try again.";

/// Confirmation prompt guarding the shutdown command.
pub const SHUTDOWN_PROMPT: &str = "Are you sure you want to shut down the device?";

/// Remote operations the panel issues against the rotator.
///
/// `MotorServerClient` is the real implementation; tests substitute an
/// in-memory one.
#[allow(async_fn_in_trait)]
pub trait MotorApi {
    async fn move_motor(&self, command: &MoveCommand) -> Result<MessageResponse, MotorError>;
    async fn stop_motor(&self) -> Result<MessageResponse, MotorError>;
    async fn reset_position(&self) -> Result<MessageResponse, MotorError>;
    async fn get_status(&self) -> Result<MotorStatus, MotorError>;
    async fn get_logs(&self, limit: usize) -> Result<Vec<LogEntry>, MotorError>;
    async fn set_zero_position(&self, zero: i64) -> Result<(), MotorError>;
    async fn goto_angle(&self, angle: f64) -> Result<(), MotorError>;
    async fn set_direction(&self, direction: MoveDirection) -> Result<(), MotorError>;
    async fn set_step_period(&self, period_ms: u32) -> Result<(), MotorError>;
    async fn do_steps(&self, steps: i64) -> Result<(), MotorError>;
    async fn enable_stepper(&self) -> Result<(), MotorError>;
    async fn disable_stepper(&self) -> Result<(), MotorError>;
    async fn shutdown(&self) -> Result<(), MotorError>;
}

impl MotorApi for MotorServerClient {
    async fn move_motor(&self, command: &MoveCommand) -> Result<MessageResponse, MotorError> {
        MotorServerClient::move_motor(self, command).await
    }

    async fn stop_motor(&self) -> Result<MessageResponse, MotorError> {
        MotorServerClient::stop_motor(self).await
    }

    async fn reset_position(&self) -> Result<MessageResponse, MotorError> {
        MotorServerClient::reset_position(self).await
    }

    async fn get_status(&self) -> Result<MotorStatus, MotorError> {
        MotorServerClient::get_status(self).await
    }

    async fn get_logs(&self, limit: usize) -> Result<Vec<LogEntry>, MotorError> {
        MotorServerClient::get_logs(self, limit).await
    }

    async fn set_zero_position(&self, zero: i64) -> Result<(), MotorError> {
        MotorServerClient::set_zero_position(self, zero).await
    }

    async fn goto_angle(&self, angle: f64) -> Result<(), MotorError> {
        MotorServerClient::goto_angle(self, angle).await
    }

    async fn set_direction(&self, direction: MoveDirection) -> Result<(), MotorError> {
        MotorServerClient::set_direction(self, direction).await
    }

    async fn set_step_period(&self, period_ms: u32) -> Result<(), MotorError> {
        MotorServerClient::set_step_period(self, period_ms).await
    }

    async fn do_steps(&self, steps: i64) -> Result<(), MotorError> {
        MotorServerClient::do_steps(self, steps).await
    }

    async fn enable_stepper(&self) -> Result<(), MotorError> {
        MotorServerClient::enable_stepper(self).await
    }

    async fn disable_stepper(&self) -> Result<(), MotorError> {
        MotorServerClient::disable_stepper(self).await
    }

    async fn shutdown(&self) -> Result<(), MotorError> {
        MotorServerClient::shutdown(self).await
    }
}

/// The rendering side of the panel.
pub trait PanelView {
    /// Panel state changed and should be re-rendered.
    fn refresh(&self);

    /// A notification was shown; call `PanelController::expire_message`
    /// with `message_id` after `ttl`.
    fn schedule_expiry(&self, message_id: u64, ttl: Duration);

    /// Ask the operator to confirm a destructive action.
    fn confirm(&self, prompt: &str) -> bool;

    /// Diagnostic output, only called when debug logging is enabled.
    fn debug(&self, _message: &str) {}
}

struct Inner<A, V> {
    api: A,
    view: V,
    config: PanelConfig,
    state: RefCell<PanelState>,
    poll_handle: RefCell<Option<AbortHandle>>,
    torn_down: Cell<bool>,
}

/// Owns the panel state, the command handlers and the polling task.
///
/// Cloning is cheap and yields a handle to the same controller, so clones
/// can be moved into spawned handler futures.
pub struct PanelController<A, V> {
    inner: Rc<Inner<A, V>>,
}

impl<A, V> Clone for PanelController<A, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Holds a control pending until dropped.
struct PendingGuard<'a, A: MotorApi, V: PanelView> {
    controller: &'a PanelController<A, V>,
    control: ControlId,
}

impl<A: MotorApi, V: PanelView> Drop for PendingGuard<'_, A, V> {
    fn drop(&mut self) {
        let control = self.control;
        self.controller.update(|state| state.finish(control));
    }
}

impl<A: MotorApi, V: PanelView> PanelController<A, V> {
    pub fn new(api: A, view: V, config: PanelConfig) -> Self {
        Self {
            inner: Rc::new(Inner {
                api,
                view,
                config,
                state: RefCell::new(PanelState::new()),
                poll_handle: RefCell::new(None),
                torn_down: Cell::new(false),
            }),
        }
    }

    pub fn api(&self) -> &A {
        &self.inner.api
    }

    pub fn view(&self) -> &V {
        &self.inner.view
    }

    pub fn config(&self) -> &PanelConfig {
        &self.inner.config
    }

    /// Read access for rendering. Do not hold across an `.await`.
    pub fn state(&self) -> Ref<'_, PanelState> {
        self.inner.state.borrow()
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.torn_down.get()
    }

    /// Apply a state change and ask the view to re-render.
    ///
    /// After teardown nothing is written and `None` is returned.
    fn update<R>(&self, change: impl FnOnce(&mut PanelState) -> R) -> Option<R> {
        if self.is_torn_down() {
            return None;
        }
        let result = change(&mut self.inner.state.borrow_mut());
        self.inner.view.refresh();
        Some(result)
    }

    /// Enter the pending state for `control`, or `None` if it is already
    /// pending (or the panel is torn down).
    fn begin(&self, control: ControlId) -> Option<PendingGuard<'_, A, V>> {
        match self.update(|state| state.try_begin(control)) {
            Some(true) => Some(PendingGuard {
                controller: self,
                control,
            }),
            Some(false) => {
                debug!("{control:?} already pending, ignoring");
                None
            }
            None => {
                debug!("{control:?} ignored after teardown");
                None
            }
        }
    }

    fn debug_log(&self, message: &str) {
        debug!("{message}");
        if self.inner.config.debug {
            self.inner.view.debug(message);
        }
    }

    // === Notifications ===

    /// Show a transient notification, replacing any current one.
    pub fn show_message(&self, text: impl Into<String>, kind: MessageKind) {
        let text = text.into();
        if let Some(id) = self.update(|state| state.show_message(text, kind)) {
            self.inner
                .view
                .schedule_expiry(id, self.inner.config.message_ttl);
        }
    }

    /// Expiry callback for a notification scheduled by `show_message`.
    pub fn expire_message(&self, message_id: u64) {
        self.update(|state| state.expire_message(message_id));
    }

    fn reject(&self, err: ValidationError) {
        self.show_message(err.to_string(), MessageKind::Error);
    }

    /// Report a move/stop/reset outcome. Returns true on success.
    fn report_motion(&self, result: Result<MessageResponse, MotorError>, fallback: &str) -> bool {
        match result {
            Ok(response) => {
                self.show_message(response.message, MessageKind::Success);
                true
            }
            Err(err) => {
                warn!("{fallback}: {err}");
                let text = if err.is_transport() {
                    NETWORK_ERROR_TEXT
                } else {
                    err.server_detail().unwrap_or(fallback)
                };
                self.show_message(text, MessageKind::Error);
                false
            }
        }
    }

    /// Report a fire-and-report command outcome.
    fn report_setting(&self, result: Result<(), MotorError>, success: &str, failure: &str) {
        match result {
            Ok(()) => self.show_message(success, MessageKind::Success),
            Err(err) => {
                warn!("{failure} {err}");
                let text = if err.is_transport() {
                    NETWORK_ERROR_TEXT.to_string()
                } else {
                    match err.server_detail() {
                        Some(detail) => format!("{failure} {detail}"),
                        None => failure.to_string(),
                    }
                };
                self.show_message(text, MessageKind::Error);
            }
        }
    }

    // === Motion commands ===

    /// Start a relative move of `degrees` (raw field text) in `direction`.
    pub async fn move_motor(&self, direction: MoveDirection, degrees: &str) {
        let command = match validation::parse_move_command(direction, degrees) {
            Ok(command) => command,
            Err(err) => return self.reject(err),
        };
        let Some(pending) = self.begin(ControlId::Move) else {
            return;
        };

        let result = self.inner.api.move_motor(&command).await;
        drop(pending);

        if self.report_motion(result, "Failed to start motor movement") {
            self.update(|state| state.set_moving(true));
            self.poll_status().await;
        }
    }

    pub async fn stop_motor(&self) {
        let Some(pending) = self.begin(ControlId::Stop) else {
            return;
        };

        let result = self.inner.api.stop_motor().await;
        drop(pending);

        if self.report_motion(result, "Failed to stop motor") {
            self.update(|state| state.set_moving(false));
            self.poll_status().await;
        }
    }

    pub async fn reset_position(&self) {
        let Some(pending) = self.begin(ControlId::Reset) else {
            return;
        };

        let result = self.inner.api.reset_position().await;
        drop(pending);

        if self.report_motion(result, "Failed to reset position") {
            self.poll_status().await;
        }
    }

    // === Fire-and-report commands ===

    pub async fn set_zero_position(&self, zero: &str) {
        let zero = match validation::parse_zero_position(zero) {
            Ok(zero) => zero,
            Err(err) => return self.reject(err),
        };
        let Some(_pending) = self.begin(ControlId::SetZero) else {
            return;
        };
        let result = self.inner.api.set_zero_position(zero).await;
        self.report_setting(result, "Zero position set!", "Failed to set zero position.");
    }

    pub async fn goto_angle(&self, angle: &str) {
        let angle = match validation::parse_goto_angle(angle) {
            Ok(angle) => angle,
            Err(err) => return self.reject(err),
        };
        let Some(_pending) = self.begin(ControlId::GotoAngle) else {
            return;
        };
        let result = self.inner.api.goto_angle(angle).await;
        self.report_setting(result, "Moving to angle...", "Failed to move to angle.");
    }

    pub async fn set_direction(&self, direction: MoveDirection) {
        let control = match direction {
            MoveDirection::Plus => ControlId::DirectionPlus,
            MoveDirection::Minus => ControlId::DirectionMinus,
        };
        let Some(_pending) = self.begin(control) else {
            return;
        };
        let result = self.inner.api.set_direction(direction).await;
        let symbol = direction.symbol();
        self.report_setting(
            result,
            &format!("Direction set to {symbol}."),
            &format!("Failed to set direction {symbol}."),
        );
    }

    pub async fn set_step_period(&self, period_ms: &str) {
        let period_ms = match validation::parse_step_period(period_ms) {
            Ok(period) => period,
            Err(err) => return self.reject(err),
        };
        let Some(_pending) = self.begin(ControlId::StepPeriod) else {
            return;
        };
        let result = self.inner.api.set_step_period(period_ms).await;
        self.report_setting(
            result,
            &format!("Step period set to {period_ms} ms."),
            "Failed to set step period.",
        );
    }

    pub async fn do_steps(&self, steps: &str) {
        let steps = match validation::parse_step_count(steps) {
            Ok(steps) => steps,
            Err(err) => return self.reject(err),
        };
        let Some(_pending) = self.begin(ControlId::DoSteps) else {
            return;
        };
        let result = self.inner.api.do_steps(steps).await;
        self.report_setting(
            result,
            &format!("Stepping {steps} steps..."),
            "Failed to do steps.",
        );
    }

    pub async fn enable_stepper(&self) {
        let Some(_pending) = self.begin(ControlId::EnableStepper) else {
            return;
        };
        let result = self.inner.api.enable_stepper().await;
        self.report_setting(result, "Stepper enabled.", "Failed to enable stepper.");
    }

    pub async fn disable_stepper(&self) {
        let Some(_pending) = self.begin(ControlId::DisableStepper) else {
            return;
        };
        let result = self.inner.api.disable_stepper().await;
        self.report_setting(result, "Stepper disabled.", "Failed to disable stepper.");
    }

    /// Power off the device after the operator confirms.
    pub async fn shutdown(&self) {
        if self.is_torn_down() || !self.inner.view.confirm(SHUTDOWN_PROMPT) {
            return;
        }
        let Some(_pending) = self.begin(ControlId::Shutdown) else {
            return;
        };
        let result = self.inner.api.shutdown().await;
        self.report_setting(
            result,
            "Shutdown command sent. The device will power off.",
            "Failed to send shutdown command.",
        );
    }

    // === Status and logs ===

    /// Fetch status and overwrite the display. Failures are only logged;
    /// the next poll retries.
    pub async fn poll_status(&self) {
        if self.is_torn_down() {
            return;
        }
        match self.inner.api.get_status().await {
            Ok(status) => {
                self.update(|state| state.apply_status(status));
            }
            Err(err) => self.debug_log(&format!("Error updating status: {err}")),
        }
    }

    /// Fetch the most recent `limit` movement log rows.
    pub async fn load_logs(&self, limit: usize) {
        if self.is_torn_down() {
            return;
        }
        let logs = match self.inner.api.get_logs(limit).await {
            Ok(entries) => LogsView::Loaded(entries),
            Err(err) => {
                self.debug_log(&format!("Error loading logs: {err}"));
                LogsView::Failed
            }
        };
        self.update(|state| state.set_logs(logs));
    }

    // === Lifecycle ===

    /// Stop polling and detach from the view. Later writes are dropped.
    ///
    /// Safe to call more than once; only the first call has an effect.
    pub fn teardown(&self) {
        if self.inner.torn_down.replace(true) {
            return;
        }
        if let Some(handle) = self.inner.poll_handle.borrow_mut().take() {
            handle.abort();
        }
        debug!("panel controller torn down");
    }
}

impl<A, V> PanelController<A, V>
where
    A: MotorApi + 'static,
    V: PanelView + 'static,
{
    /// Build the polling task: one `poll_status` per tick of `ticks`.
    ///
    /// The caller spawns the returned future. The controller keeps its
    /// abort handle, replacing (and cancelling) any previous task;
    /// `teardown` cancels it.
    pub fn start_polling<S>(&self, ticks: S) -> impl Future<Output = ()> + 'static
    where
        S: Stream + 'static,
    {
        let (handle, registration) = AbortHandle::new_pair();
        if self.is_torn_down() {
            handle.abort();
        } else if let Some(previous) = self.inner.poll_handle.borrow_mut().replace(handle) {
            previous.abort();
        }

        let controller = self.clone();
        let polling = async move {
            let mut ticks = Box::pin(ticks);
            while ticks.next().await.is_some() {
                controller.poll_status().await;
            }
        };

        async move {
            if Abortable::new(polling, registration).await.is_err() {
                debug!("status polling cancelled");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::EMPTY_LOGS_TEXT;

    #[derive(Clone, Copy)]
    enum Failure {
        Transport,
        Server(u16, &'static str),
    }

    impl Failure {
        fn to_error(self) -> MotorError {
            match self {
                Failure::Transport => MotorError::Connection("connection refused".into()),
                Failure::Server(status, message) => MotorError::ServerError {
                    status,
                    message: message.to_string(),
                },
            }
        }
    }

    #[derive(Default)]
    struct FakeApi {
        calls: RefCell<Vec<String>>,
        status: Cell<Option<MotorStatus>>,
        logs: RefCell<Option<Vec<LogEntry>>>,
        failure: Cell<Option<Failure>>,
    }

    impl FakeApi {
        fn record(&self, call: String) {
            self.calls.borrow_mut().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn outcome(&self) -> Result<(), MotorError> {
            match self.failure.get() {
                Some(failure) => Err(failure.to_error()),
                None => Ok(()),
            }
        }

        fn message(&self, text: &str) -> Result<MessageResponse, MotorError> {
            self.outcome().map(|()| MessageResponse {
                message: text.to_string(),
            })
        }
    }

    impl MotorApi for FakeApi {
        async fn move_motor(&self, command: &MoveCommand) -> Result<MessageResponse, MotorError> {
            self.record(format!("move {} {}", command.direction, command.degrees));
            self.message("Moving")
        }

        async fn stop_motor(&self) -> Result<MessageResponse, MotorError> {
            self.record("stop".into());
            self.message("Stopped")
        }

        async fn reset_position(&self) -> Result<MessageResponse, MotorError> {
            self.record("reset".into());
            self.message("Position reset")
        }

        async fn get_status(&self) -> Result<MotorStatus, MotorError> {
            self.record("status".into());
            self.status
                .get()
                .ok_or_else(|| MotorError::Connection("offline".into()))
        }

        async fn get_logs(&self, limit: usize) -> Result<Vec<LogEntry>, MotorError> {
            self.record(format!("logs {limit}"));
            self.logs
                .borrow()
                .clone()
                .ok_or_else(|| MotorError::ServerError {
                    status: 500,
                    message: String::new(),
                })
        }

        async fn set_zero_position(&self, zero: i64) -> Result<(), MotorError> {
            self.record(format!("zero {zero}"));
            self.outcome()
        }

        async fn goto_angle(&self, angle: f64) -> Result<(), MotorError> {
            self.record(format!("goto {angle}"));
            self.outcome()
        }

        async fn set_direction(&self, direction: MoveDirection) -> Result<(), MotorError> {
            self.record(format!("direction {direction}"));
            self.outcome()
        }

        async fn set_step_period(&self, period_ms: u32) -> Result<(), MotorError> {
            self.record(format!("period {period_ms}"));
            self.outcome()
        }

        async fn do_steps(&self, steps: i64) -> Result<(), MotorError> {
            self.record(format!("steps {steps}"));
            self.outcome()
        }

        async fn enable_stepper(&self) -> Result<(), MotorError> {
            self.record("enable".into());
            self.outcome()
        }

        async fn disable_stepper(&self) -> Result<(), MotorError> {
            self.record("disable".into());
            self.outcome()
        }

        async fn shutdown(&self) -> Result<(), MotorError> {
            self.record("shutdown".into());
            self.outcome()
        }
    }

    #[derive(Default)]
    struct RecordingView {
        refreshes: Cell<usize>,
        expiries: RefCell<Vec<(u64, Duration)>>,
        confirm_answer: Cell<bool>,
        prompts: RefCell<Vec<String>>,
        debug_lines: RefCell<Vec<String>>,
    }

    impl PanelView for RecordingView {
        fn refresh(&self) {
            self.refreshes.set(self.refreshes.get() + 1);
        }

        fn schedule_expiry(&self, message_id: u64, ttl: Duration) {
            self.expiries.borrow_mut().push((message_id, ttl));
        }

        fn confirm(&self, prompt: &str) -> bool {
            self.prompts.borrow_mut().push(prompt.to_string());
            self.confirm_answer.get()
        }

        fn debug(&self, message: &str) {
            self.debug_lines.borrow_mut().push(message.to_string());
        }
    }

    type TestController = PanelController<FakeApi, RecordingView>;

    fn controller() -> TestController {
        PanelController::new(
            FakeApi::default(),
            RecordingView::default(),
            PanelConfig::default(),
        )
    }

    fn moving_status(is_moving: bool) -> MotorStatus {
        MotorStatus {
            degrees: 90.0,
            steps: 450,
            is_moving,
            is_enabled: true,
        }
    }

    fn message_text(controller: &TestController) -> Option<(String, MessageKind)> {
        controller
            .state()
            .message()
            .map(|m| (m.text.clone(), m.kind))
    }

    #[tokio::test]
    async fn test_move_success_refreshes_status() {
        let controller = controller();
        controller.api().status.set(Some(moving_status(true)));

        controller.move_motor(MoveDirection::Plus, "90").await;

        assert_eq!(controller.api().calls(), vec!["move plus 90", "status"]);
        assert_eq!(
            message_text(&controller),
            Some(("Moving".to_string(), MessageKind::Success))
        );
        let state = controller.state();
        assert!(state.is_moving());
        assert!(!state.is_pending(ControlId::Move));
        assert!(state.is_disabled(ControlId::Move));
        assert!(!state.is_disabled(ControlId::Stop));
    }

    #[tokio::test]
    async fn test_move_rejects_invalid_degrees_without_request() {
        let controller = controller();
        for degrees in ["0", "-5", "360.5", "abc", "", "NaN"] {
            controller.move_motor(MoveDirection::Minus, degrees).await;
        }

        assert!(controller.api().calls().is_empty());
        assert_eq!(
            message_text(&controller),
            Some((
                "Please enter a valid angle between 0 and 360 degrees".to_string(),
                MessageKind::Error
            ))
        );
    }

    #[tokio::test]
    async fn test_move_failure_messages() {
        let controller = controller();

        controller
            .api()
            .failure
            .set(Some(Failure::Server(409, "Motor is busy")));
        controller.move_motor(MoveDirection::Plus, "10").await;
        assert_eq!(message_text(&controller).unwrap().0, "Motor is busy");

        controller.api().failure.set(Some(Failure::Server(500, "")));
        controller.move_motor(MoveDirection::Plus, "10").await;
        assert_eq!(
            message_text(&controller).unwrap().0,
            "Failed to start motor movement"
        );

        controller.api().failure.set(Some(Failure::Transport));
        controller.move_motor(MoveDirection::Plus, "10").await;
        assert_eq!(message_text(&controller).unwrap().0, NETWORK_ERROR_TEXT);

        // No refresh after failures, and the control is released each time.
        assert!(!controller.api().calls().contains(&"status".to_string()));
        assert!(!controller.state().is_pending(ControlId::Move));
        assert!(!controller.state().is_moving());
    }

    #[tokio::test]
    async fn test_pending_control_blocks_double_submit() {
        let controller = controller();
        controller.update(|state| state.try_begin(ControlId::Stop));

        controller.stop_motor().await;
        assert!(controller.api().calls().is_empty());
        // The outer command still owns the pending flag.
        assert!(controller.state().is_pending(ControlId::Stop));
    }

    #[tokio::test]
    async fn test_stop_and_reset_release_controls() {
        let controller = controller();
        controller.api().status.set(Some(moving_status(false)));
        controller.update(|state| state.set_moving(true));

        controller.stop_motor().await;
        assert!(!controller.state().is_moving());
        assert!(!controller.state().is_pending(ControlId::Stop));

        controller.api().failure.set(Some(Failure::Transport));
        controller.reset_position().await;
        assert!(!controller.state().is_pending(ControlId::Reset));

        assert_eq!(controller.api().calls(), vec!["stop", "status", "reset"]);
    }

    #[tokio::test]
    async fn test_step_period_zero_rejected_locally() {
        let controller = controller();
        controller.set_step_period("0").await;

        assert!(controller.api().calls().is_empty());
        assert_eq!(
            message_text(&controller),
            Some((
                "Please enter a valid step period.".to_string(),
                MessageKind::Error
            ))
        );
    }

    #[tokio::test]
    async fn test_fire_and_report_commands() {
        let controller = controller();

        controller.set_zero_position("120").await;
        assert_eq!(message_text(&controller).unwrap().0, "Zero position set!");

        controller.goto_angle("-30").await;
        controller.set_direction(MoveDirection::Minus).await;
        controller.set_step_period("4").await;
        controller.do_steps("-200").await;
        controller.enable_stepper().await;
        controller.disable_stepper().await;

        assert_eq!(
            controller.api().calls(),
            vec![
                "zero 120",
                "goto -30",
                "direction minus",
                "period 4",
                "steps -200",
                "enable",
                "disable",
            ]
        );
        assert_eq!(message_text(&controller).unwrap().0, "Stepper disabled.");
    }

    #[tokio::test]
    async fn test_fire_and_report_failure_includes_detail() {
        let controller = controller();
        controller
            .api()
            .failure
            .set(Some(Failure::Server(422, "Angle out of range")));

        controller.goto_angle("10").await;
        assert_eq!(
            message_text(&controller),
            Some((
                "Failed to move to angle. Angle out of range".to_string(),
                MessageKind::Error
            ))
        );
        assert!(!controller.state().is_pending(ControlId::GotoAngle));

        controller.do_steps("ten").await;
        assert_eq!(controller.api().calls(), vec!["goto 10"]);
    }

    #[tokio::test]
    async fn test_shutdown_requires_confirmation() {
        let controller = controller();

        controller.shutdown().await;
        assert!(controller.api().calls().is_empty());
        assert_eq!(
            *controller.view().prompts.borrow(),
            vec![SHUTDOWN_PROMPT.to_string()]
        );

        controller.view().confirm_answer.set(true);
        controller.shutdown().await;
        assert_eq!(controller.api().calls(), vec!["shutdown"]);
        assert_eq!(
            message_text(&controller).unwrap().0,
            "Shutdown command sent. The device will power off."
        );
    }

    #[tokio::test]
    async fn test_poll_failure_keeps_last_status() {
        let controller = controller();
        controller.api().status.set(Some(moving_status(true)));
        controller.poll_status().await;

        controller.api().status.set(None);
        controller.poll_status().await;

        let state = controller.state();
        assert_eq!(state.status(), Some(&moving_status(true)));
        assert!(state.message().is_none());
        // Debug output is off by default.
        assert!(controller.view().debug_lines.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_poll_failure_logged_when_debug_enabled() {
        let config = PanelConfig {
            debug: true,
            ..PanelConfig::default()
        };
        let controller =
            PanelController::new(FakeApi::default(), RecordingView::default(), config);

        controller.poll_status().await;
        let lines = controller.view().debug_lines.borrow();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Error updating status"));
    }

    #[tokio::test]
    async fn test_load_logs_states() {
        let controller = controller();
        controller.load_logs(20).await;
        assert_eq!(controller.state().logs(), &LogsView::Failed);

        *controller.api().logs.borrow_mut() = Some(Vec::new());
        controller.load_logs(20).await;
        assert_eq!(controller.state().logs(), &LogsView::Loaded(Vec::new()));
        assert_eq!(EMPTY_LOGS_TEXT, "No movements recorded yet");
        assert_eq!(controller.api().calls(), vec!["logs 20", "logs 20"]);
    }

    #[tokio::test]
    async fn test_messages_schedule_expiry() {
        let controller = controller();
        controller.show_message("first", MessageKind::Success);
        controller.show_message("second", MessageKind::Error);

        let expiries = controller.view().expiries.borrow().clone();
        assert_eq!(expiries.len(), 2);
        assert!(expiries
            .iter()
            .all(|(_, ttl)| *ttl == Duration::from_millis(5000)));

        controller.expire_message(expiries[0].0);
        assert_eq!(message_text(&controller).unwrap().0, "second");
        controller.expire_message(expiries[1].0);
        assert!(controller.state().message().is_none());
    }

    #[tokio::test]
    async fn test_polling_runs_once_per_tick() {
        let controller = controller();
        controller.api().status.set(Some(moving_status(false)));

        controller
            .start_polling(futures_util::stream::iter(0..3))
            .await;

        assert_eq!(controller.api().calls(), vec!["status"; 3]);
    }

    #[tokio::test]
    async fn test_teardown_cancels_polling_and_detaches() {
        let controller = controller();
        let polling = controller.start_polling(futures_util::stream::pending::<()>());

        controller.teardown();
        controller.teardown();
        // Completes only because the task was aborted.
        polling.await;

        let refreshes = controller.view().refreshes.get();
        controller.move_motor(MoveDirection::Plus, "45").await;
        controller.stop_motor().await;
        controller.set_zero_position("5").await;
        controller.poll_status().await;
        controller.show_message("late", MessageKind::Success);

        assert!(controller.api().calls().is_empty());
        assert!(controller.state().message().is_none());
        assert!(!controller.state().is_pending(ControlId::Stop));
        assert!(!controller.state().is_pending(ControlId::SetZero));
        assert_eq!(controller.view().refreshes.get(), refreshes);
    }
}
