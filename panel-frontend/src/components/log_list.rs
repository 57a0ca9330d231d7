//! Movement log list.
//!
//! Renders the rows fetched once at startup, newest first as the server
//! orders them. An empty log and a failed fetch each get an explicit
//! placeholder instead of a blank container.

use panel_shared::panel::{EMPTY_LOGS_TEXT, FAILED_LOGS_TEXT};
use panel_shared::{LogEntry, LogsView};
use yew::prelude::*;

/// Props for the LogList component.
#[derive(Properties, PartialEq)]
pub struct LogListProps {
    pub logs: LogsView,
}

#[function_component(LogList)]
pub fn log_list(props: &LogListProps) -> Html {
    let body = match &props.logs {
        LogsView::Loading => html! {
            <div class="loading">{"Loading movements..."}</div>
        },
        LogsView::Failed => html! {
            <div class="error">{FAILED_LOGS_TEXT}</div>
        },
        LogsView::Loaded(entries) if entries.is_empty() => html! {
            <div class="loading">{EMPTY_LOGS_TEXT}</div>
        },
        LogsView::Loaded(entries) => html! {
            <>{ for entries.iter().map(render_log_entry) }</>
        },
    };

    html! {
        <div id="logs-container" class="logs-container">
            { body }
        </div>
    }
}

/// Render a single log row.
fn render_log_entry(entry: &LogEntry) -> Html {
    html! {
        <div class="log-item">
            <div class="log-info">
                <div class="log-direction">{entry.summary()}</div>
                <div class="log-details">{entry.details()}</div>
            </div>
            <div class="log-time">{entry.created_at_label()}</div>
        </div>
    }
}
