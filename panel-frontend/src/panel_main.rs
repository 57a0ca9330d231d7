use panel_frontend::MotorPanel;
use panel_shared::PanelConfig;
use yew::prelude::*;

#[function_component(App)]
fn app() -> Html {
    let window = web_sys::window().expect("no global `window` exists");
    let document = window.document().expect("should have a document on window");
    let mount = document.get_element_by_id("app");

    let config =
        PanelConfig::from_attributes(|name| mount.as_ref().and_then(|el| el.get_attribute(name)));

    html! {
        <MotorPanel {config} />
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
