use panel_shared::PanelState;
use yew::prelude::*;

/// Position, steps, motion and enable state of the motor.
pub fn view_status(state: &PanelState) -> Html {
    let moving = state.status().map(|s| s.is_moving);
    let enabled = state.status().map(|s| s.is_enabled);

    let motion_class = match moving {
        Some(true) => "status-moving",
        Some(false) => "status-stopped",
        None => "",
    };
    let enabled_class = match enabled {
        Some(true) => "status-enabled",
        Some(false) => "status-disabled",
        None => "",
    };

    html! {
        <div class="status-panel">
            <h2>{"Motor Status"}</h2>
            <div class="metadata-item">
                <span class="metadata-label">{"Position:"}</span>
                <span id="position">{state.position_label()}</span>
            </div>
            <div class="metadata-item">
                <span class="metadata-label">{"Steps:"}</span>
                <span id="steps">{state.steps_label()}</span>
            </div>
            <div class="metadata-item">
                <span class="metadata-label">{"Status:"}</span>
                <span id="status" class={motion_class}>{state.motion_label()}</span>
            </div>
            <div class="metadata-item">
                <span class="metadata-label">{"Enabled:"}</span>
                <span id="enabled" class={enabled_class}>{state.enabled_label()}</span>
            </div>
        </div>
    }
}
