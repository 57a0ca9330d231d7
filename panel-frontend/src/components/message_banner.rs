use panel_shared::Notice;
use yew::prelude::*;

/// The single notification slot. Renders nothing when empty.
pub fn view_message(notice: Option<&Notice>) -> Html {
    match notice {
        Some(notice) => html! {
            <div class={classes!("message", notice.kind.css_class())}>
                {&notice.text}
            </div>
        },
        None => html! {},
    }
}
