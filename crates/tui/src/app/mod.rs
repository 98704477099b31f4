use crate::input::InputState;
use crate::keybinds::Keybinds;
use crate::ui::layout::LayoutState;
use crate::ui::panel::PanelType;
use crate::Config;
use anyhow::Result;
use codelens_client::AnalysisClient;
use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use ratatui::Frame;
use std::future::Future;
use tokio::sync::mpsc;

mod effects;
mod input;
mod render;
mod state;
mod types;
mod update;

pub use state::App;
pub use types::{
    Action, AnswerMeta, AppAsyncEvent, Effect, Focus, ServiceStatus, UploadStatus, UploadTicket,
    EMPTY_QUERY_NOTICE,
};
pub use update::{update, UiState};

impl App {
    pub(super) fn report_error(&mut self, context: &str, error: impl std::fmt::Display) {
        self.ui.record_error(context, error);
    }

    pub(super) fn clear_error(&mut self) {
        self.ui.last_error = None;
        self.show_error_details = false;
    }

    /// Runs `future` on the runtime and posts its event back to the UI.
    /// If the task dies before producing one, `on_abort` builds the event
    /// instead so no pending flag is left set.
    pub(super) fn spawn_app_task<F, A>(&self, future: F, on_abort: A)
    where
        F: Future<Output = AppAsyncEvent> + Send + 'static,
        A: FnOnce(String) -> AppAsyncEvent + Send + 'static,
    {
        if let Some(tx) = self.app_async_tx.clone() {
            tokio::spawn(async move {
                let event = match tokio::spawn(future).await {
                    Ok(event) => event,
                    Err(e) => on_abort(format!("request task aborted: {e}")),
                };
                let _ = tx.send(event);
            });
        }
    }

    /// Applies an action and runs whatever effects it asks for.
    pub fn dispatch(&mut self, action: Action) {
        let effects = update(&mut self.ui, action);
        for effect in effects {
            self.run_effect(effect);
        }
    }
}
