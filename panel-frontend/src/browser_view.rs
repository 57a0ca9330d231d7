//! `PanelView` backed by a Yew component scope.
//!
//! Re-renders and notification expiry are routed back to the component as
//! messages. Once the component is destroyed its scope drops them, so late
//! writes from in-flight requests go nowhere.

use std::time::Duration;

use gloo_timers::future::TimeoutFuture;
use panel_shared::config::timer_millis;
use panel_shared::PanelView;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use yew::html::Scope;

use crate::panel_app::{MotorPanel, Msg};

pub struct BrowserView {
    link: Scope<MotorPanel>,
}

impl BrowserView {
    pub fn new(link: Scope<MotorPanel>) -> Self {
        Self { link }
    }
}

impl PanelView for BrowserView {
    fn refresh(&self) {
        self.link.send_message(Msg::Redraw);
    }

    fn schedule_expiry(&self, message_id: u64, ttl: Duration) {
        let link = self.link.clone();
        spawn_local(async move {
            TimeoutFuture::new(timer_millis(ttl)).await;
            link.send_message(Msg::ExpireMessage(message_id));
        });
    }

    fn confirm(&self, prompt: &str) -> bool {
        web_sys::window()
            .and_then(|window| window.confirm_with_message(prompt).ok())
            .unwrap_or(false)
    }

    fn debug(&self, message: &str) {
        web_sys::console::error_1(&JsValue::from_str(message));
    }
}
