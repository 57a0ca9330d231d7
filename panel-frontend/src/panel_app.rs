use std::future::Future;

use gloo_timers::future::IntervalStream;
use panel_shared::validation::{GOTO_ANGLE_MAX, GOTO_ANGLE_MIN};
use panel_shared::{
    ControlId, MotorServerClient, MoveDirection, PanelConfig, PanelController, PanelState,
};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::browser_view::BrowserView;
use crate::components::{view_message, view_status, LogList};

type Controller = PanelController<MotorServerClient, BrowserView>;

#[derive(Properties, PartialEq)]
pub struct MotorPanelProps {
    pub config: PanelConfig,
}

/// Text fields of the panel forms, kept as typed.
struct PanelForm {
    direction: MoveDirection,
    degrees: String,
    zero: String,
    angle: String,
    step_period: String,
    steps: String,
}

impl Default for PanelForm {
    fn default() -> Self {
        Self {
            direction: MoveDirection::Plus,
            degrees: String::new(),
            zero: String::new(),
            angle: "0".to_string(),
            step_period: String::new(),
            steps: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Degrees,
    Zero,
    Angle,
    StepPeriod,
    Steps,
}

pub enum Msg {
    Redraw,
    ExpireMessage(u64),
    Input(Field, String),
    SelectDirection(MoveDirection),
    ToggleAdvanced,
    Move,
    Stop,
    Reset,
    SetZero,
    GotoAngle,
    SetDirection(MoveDirection),
    SetStepPeriod,
    DoSteps,
    EnableStepper,
    DisableStepper,
    Shutdown,
}

pub struct MotorPanel {
    controller: Controller,
    form: PanelForm,
    show_advanced: bool,
}

impl Component for MotorPanel {
    type Message = Msg;
    type Properties = MotorPanelProps;

    fn create(ctx: &Context<Self>) -> Self {
        let config = ctx.props().config.clone();
        let client = MotorServerClient::from_config(&config);
        let view = BrowserView::new(ctx.link().clone());
        let controller = PanelController::new(client, view, config);

        let ticks = IntervalStream::new(controller.config().poll_interval_ms());
        spawn_local(controller.start_polling(ticks));

        let initial = controller.clone();
        spawn_local(async move {
            initial.poll_status().await;
            initial.load_logs(initial.config().log_limit).await;
        });

        Self {
            controller,
            form: PanelForm::default(),
            show_advanced: false,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Redraw => true,
            Msg::ExpireMessage(id) => {
                self.controller.expire_message(id);
                false
            }
            Msg::Input(field, value) => {
                let slot = match field {
                    Field::Degrees => &mut self.form.degrees,
                    Field::Zero => &mut self.form.zero,
                    Field::Angle => &mut self.form.angle,
                    Field::StepPeriod => &mut self.form.step_period,
                    Field::Steps => &mut self.form.steps,
                };
                *slot = value;
                // Only the slider has a live readout.
                field == Field::Angle
            }
            Msg::SelectDirection(direction) => {
                self.form.direction = direction;
                false
            }
            Msg::ToggleAdvanced => {
                self.show_advanced = !self.show_advanced;
                true
            }
            Msg::Move => {
                let direction = self.form.direction;
                let degrees = self.form.degrees.clone();
                self.spawn(|c| async move { c.move_motor(direction, &degrees).await });
                false
            }
            Msg::Stop => {
                self.spawn(|c| async move { c.stop_motor().await });
                false
            }
            Msg::Reset => {
                self.spawn(|c| async move { c.reset_position().await });
                false
            }
            Msg::SetZero => {
                let zero = self.form.zero.clone();
                self.spawn(|c| async move { c.set_zero_position(&zero).await });
                false
            }
            Msg::GotoAngle => {
                let angle = self.form.angle.clone();
                self.spawn(|c| async move { c.goto_angle(&angle).await });
                false
            }
            Msg::SetDirection(direction) => {
                self.spawn(|c| async move { c.set_direction(direction).await });
                false
            }
            Msg::SetStepPeriod => {
                let period = self.form.step_period.clone();
                self.spawn(|c| async move { c.set_step_period(&period).await });
                false
            }
            Msg::DoSteps => {
                let steps = self.form.steps.clone();
                self.spawn(|c| async move { c.do_steps(&steps).await });
                false
            }
            Msg::EnableStepper => {
                self.spawn(|c| async move { c.enable_stepper().await });
                false
            }
            Msg::DisableStepper => {
                self.spawn(|c| async move { c.disable_stepper().await });
                false
            }
            Msg::Shutdown => {
                self.spawn(|c| async move { c.shutdown().await });
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let state = self.controller.state();

        html! {
            <div class="main-content">
                { view_message(state.message()) }

                <div class="column left-panel">
                    { view_status(&state) }
                    { self.view_move_form(ctx, &state) }
                    { self.view_position_controls(ctx, &state) }
                    if self.controller.config().admin {
                        { self.view_advanced(ctx, &state) }
                    }
                </div>

                <div class="column right-panel">
                    <h2>{"Recent Movements"}</h2>
                    <LogList logs={state.logs().clone()} />
                </div>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.controller.teardown();
    }
}

impl MotorPanel {
    /// Run a controller handler on the browser event loop.
    fn spawn<F, Fut>(&self, handler: F)
    where
        F: FnOnce(Controller) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        spawn_local(handler(self.controller.clone()));
    }

    fn input_callback(ctx: &Context<Self>, field: Field) -> Callback<InputEvent> {
        ctx.link().callback(move |e: InputEvent| {
            let target: HtmlInputElement = e.target_unchecked_into();
            Msg::Input(field, target.value())
        })
    }

    fn view_move_form(&self, ctx: &Context<Self>, state: &PanelState) -> Html {
        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Move
        });
        let onchange = ctx.link().callback(|e: Event| {
            let target: HtmlSelectElement = e.target_unchecked_into();
            let direction = MoveDirection::from_form_value(&target.value()).unwrap_or_default();
            Msg::SelectDirection(direction)
        });

        html! {
            <form id="motor-form" class="control-group" {onsubmit}>
                <h2>{"Move Motor"}</h2>
                <label class="control-label">{"Direction:"}</label>
                <select name="direction" {onchange}>
                    <option value="plus" selected={self.form.direction == MoveDirection::Plus}>
                        {"Plus (+)"}
                    </option>
                    <option value="minus" selected={self.form.direction == MoveDirection::Minus}>
                        {"Minus (-)"}
                    </option>
                </select>
                <label class="control-label">{"Degrees:"}</label>
                <input
                    type="number"
                    name="degrees"
                    min="0"
                    max="360"
                    step="0.1"
                    value={self.form.degrees.clone()}
                    oninput={Self::input_callback(ctx, Field::Degrees)}
                />
                <button
                    id="move-btn"
                    type="submit"
                    class={classes!(state.is_pending(ControlId::Move).then_some("loading"))}
                    disabled={state.is_disabled(ControlId::Move)}
                >
                    {"Move"}
                </button>
                <button
                    id="stop-btn"
                    type="button"
                    disabled={state.is_disabled(ControlId::Stop)}
                    onclick={ctx.link().callback(|_| Msg::Stop)}
                >
                    {"Stop"}
                </button>
                <button
                    id="reset-btn"
                    type="button"
                    disabled={state.is_disabled(ControlId::Reset)}
                    onclick={ctx.link().callback(|_| Msg::Reset)}
                >
                    {"Reset Position"}
                </button>
            </form>
        }
    }

    fn view_position_controls(&self, ctx: &Context<Self>, state: &PanelState) -> Html {
        html! {
            <div class="control-group">
                <h2>{"Position"}</h2>
                <label class="control-label">{"Zero Position:"}</label>
                <input
                    id="zero-pos"
                    type="number"
                    placeholder="Zero Position"
                    value={self.form.zero.clone()}
                    oninput={Self::input_callback(ctx, Field::Zero)}
                />
                <button
                    id="set-zero-btn"
                    disabled={state.is_disabled(ControlId::SetZero)}
                    onclick={ctx.link().callback(|_| Msg::SetZero)}
                >
                    {"Set Zero"}
                </button>

                <label class="control-label">
                    {"Angle: "}
                    <span id="angle-value" class="range-value">{&self.form.angle}</span>
                    {"°"}
                </label>
                <input
                    id="angle-slider"
                    type="range"
                    min={GOTO_ANGLE_MIN.to_string()}
                    max={GOTO_ANGLE_MAX.to_string()}
                    value={self.form.angle.clone()}
                    oninput={Self::input_callback(ctx, Field::Angle)}
                />
                <button
                    id="goto-angle-btn"
                    disabled={state.is_disabled(ControlId::GotoAngle)}
                    onclick={ctx.link().callback(|_| Msg::GotoAngle)}
                >
                    {"Go to Angle"}
                </button>
            </div>
        }
    }

    fn view_advanced(&self, ctx: &Context<Self>, state: &PanelState) -> Html {
        let button = |id: &'static str,
                      label: &'static str,
                      control: ControlId,
                      msg: fn() -> Msg| {
            html! {
                <button
                    {id}
                    disabled={state.is_disabled(control)}
                    onclick={ctx.link().callback(move |_| msg())}
                >
                    {label}
                </button>
            }
        };
        let dir_plus = button(
            "dir-plus-btn",
            "Direction +",
            ControlId::DirectionPlus,
            || Msg::SetDirection(MoveDirection::Plus),
        );
        let dir_minus = button(
            "dir-minus-btn",
            "Direction -",
            ControlId::DirectionMinus,
            || Msg::SetDirection(MoveDirection::Minus),
        );
        let set_step_period = button(
            "set-step-period-btn",
            "Set Step Period",
            ControlId::StepPeriod,
            || Msg::SetStepPeriod,
        );
        let do_steps = button("do-steps-btn", "Do Steps", ControlId::DoSteps, || Msg::DoSteps);
        let enable = button(
            "enable-stepper-btn",
            "Enable Stepper",
            ControlId::EnableStepper,
            || Msg::EnableStepper,
        );
        let disable = button(
            "disable-stepper-btn",
            "Disable Stepper",
            ControlId::DisableStepper,
            || Msg::DisableStepper,
        );
        let shutdown = button(
            "shutdown-btn",
            "Shutdown Device",
            ControlId::Shutdown,
            || Msg::Shutdown,
        );

        html! {
            <div class="control-group">
                <label style="cursor: pointer;">
                    <input
                        id="advanced-toggle"
                        type="checkbox"
                        checked={self.show_advanced}
                        onchange={ctx.link().callback(|_| Msg::ToggleAdvanced)}
                    />
                    <span style="margin-left: 5px;">{"Advanced Controls"}</span>
                </label>

                if self.show_advanced {
                    <div id="advanced-controls" class="advanced-controls active">
                        <div class="control-row">
                            { dir_plus }
                            { dir_minus }
                        </div>
                        <div class="control-row">
                            <input
                                id="step-period"
                                type="number"
                                min="1"
                                placeholder="Step period (ms)"
                                value={self.form.step_period.clone()}
                                oninput={Self::input_callback(ctx, Field::StepPeriod)}
                            />
                            { set_step_period }
                        </div>
                        <div class="control-row">
                            <input
                                id="step-count"
                                type="number"
                                placeholder="Steps"
                                value={self.form.steps.clone()}
                                oninput={Self::input_callback(ctx, Field::Steps)}
                            />
                            { do_steps }
                        </div>
                        <div class="control-row">
                            { enable }
                            { disable }
                        </div>
                        <div class="control-row">
                            { shutdown }
                        </div>
                    </div>
                }
            </div>
        }
    }
}
