use super::types::{
    Action, AnswerMeta, AppAsyncEvent, Effect, Focus, ServiceStatus, UploadStatus, UploadTicket,
    EMPTY_QUERY_NOTICE,
};
use crate::input::InputState;
use codelens_client::{ChunkListing, ChunkRef, UploadReceipt};
use ratatui::layout::Size;
use ratatui::widgets::{Paragraph, Wrap};
use std::path::PathBuf;

/// Plain UI state. Only [`update`] mutates it, which keeps every user-visible
/// transition testable without a terminal.
#[derive(Debug, Clone)]
pub struct UiState {
    pub selected_file: Option<PathBuf>,
    pub query: InputState,
    pub response: String,
    pub loading: bool,
    pub upload_status: UploadStatus,
    pub notice: Option<String>,
    pub upload_ticket: UploadTicket,
    pub last_upload: Option<UploadReceipt>,
    pub sources: Vec<ChunkRef>,
    pub answer: Option<AnswerMeta>,
    pub service: ServiceStatus,
    pub chunks: Option<ChunkListing>,
    pub chunks_loading: bool,
    pub chunk_limit: u32,
    pub show_help: bool,
    pub focus: Focus,
    pub response_scroll: u16,
    /// Inner size of the response panel from the last draw.
    pub response_viewport: Size,
    pub last_error: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(10)
    }
}

impl UiState {
    pub fn new(chunk_limit: u32) -> Self {
        Self {
            selected_file: None,
            query: InputState::new(),
            response: String::new(),
            loading: false,
            upload_status: UploadStatus::Idle,
            notice: None,
            upload_ticket: UploadTicket::default(),
            last_upload: None,
            sources: Vec::new(),
            answer: None,
            service: ServiceStatus::Unknown,
            chunks: None,
            chunks_loading: false,
            chunk_limit,
            show_help: false,
            focus: Focus::Prompt,
            response_scroll: 0,
            response_viewport: Size::default(),
            last_error: None,
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.loading {
            "Analyzing..."
        } else {
            "Analyze"
        }
    }

    pub fn record_error(&mut self, context: &str, error: impl std::fmt::Display) {
        let message = format!("{context}: {error}");
        tracing::warn!("{message}");
        self.last_error = Some(message);
    }

    fn clear_response(&mut self) {
        self.response.clear();
        self.sources.clear();
        self.answer = None;
        self.response_scroll = 0;
    }

    /// Response body as drawn, including the sources footer.
    pub fn response_text(&self) -> String {
        let mut text = self.response.clone();
        if !self.sources.is_empty() {
            let labels: Vec<String> = self.sources.iter().map(|s| s.label()).collect();
            text.push_str(&format!("\n\nSources: {}", labels.join(", ")));
        }
        text
    }

    pub fn set_response_viewport(&mut self, viewport: Size) {
        self.response_viewport = viewport;
        self.response_scroll = self.response_scroll.min(self.max_scroll());
    }

    fn max_scroll(&self) -> u16 {
        let text = self.response_text();
        let Size { width, height } = self.response_viewport;
        let overflow = if width == 0 || height == 0 {
            // Not drawn yet: allow scrolling to the last logical line.
            text.lines().count().saturating_sub(1)
        } else {
            Paragraph::new(text)
                .wrap(Wrap { trim: false })
                .line_count(width)
                .saturating_sub(usize::from(height))
        };
        u16::try_from(overflow).unwrap_or(u16::MAX)
    }
}

pub fn update(state: &mut UiState, action: Action) -> Vec<Effect> {
    match action {
        Action::SelectFile(None) => Vec::new(),
        Action::SelectFile(Some(path)) => {
            state.upload_ticket = UploadTicket(state.upload_ticket.0 + 1);
            state.selected_file = Some(path.clone());
            state.upload_status = UploadStatus::Uploading;
            state.clear_response();
            tracing::info!(path = %path.display(), ticket = state.upload_ticket.0, "File selected");
            vec![Effect::Upload {
                ticket: state.upload_ticket,
                path,
            }]
        }
        Action::Submit => {
            if state.query.is_blank() {
                state.notice = Some(EMPTY_QUERY_NOTICE.to_string());
                return Vec::new();
            }
            if state.loading {
                tracing::debug!("Submit ignored while an analysis is running");
                return Vec::new();
            }
            state.loading = true;
            state.clear_response();
            vec![Effect::Analyze {
                query: state.query.buffer.clone(),
            }]
        }
        Action::DismissNotice => {
            state.notice = None;
            Vec::new()
        }
        Action::RequestChunks => {
            if state.chunks_loading {
                return Vec::new();
            }
            state.chunks_loading = true;
            vec![Effect::ListChunks {
                limit: state.chunk_limit,
            }]
        }
        Action::CloseChunks => {
            state.chunks = None;
            Vec::new()
        }
        Action::ToggleHelp => {
            state.show_help = !state.show_help;
            Vec::new()
        }
        Action::FocusNext => {
            state.focus = state.focus.next();
            Vec::new()
        }
        Action::Scroll(delta) => {
            let target = i64::from(state.response_scroll) + i64::from(delta);
            let clamped = target.clamp(0, i64::from(state.max_scroll()));
            state.response_scroll = u16::try_from(clamped).unwrap_or(0);
            Vec::new()
        }
        Action::CheckHealth => {
            state.service = ServiceStatus::Unknown;
            vec![Effect::CheckHealth]
        }
        Action::Async(event) => {
            apply_async(state, event);
            Vec::new()
        }
    }
}

fn apply_async(state: &mut UiState, event: AppAsyncEvent) {
    match event {
        AppAsyncEvent::UploadFinished { ticket, result } => {
            if ticket != state.upload_ticket {
                tracing::debug!(
                    stale = ticket.0,
                    current = state.upload_ticket.0,
                    "Ignoring superseded upload result"
                );
                return;
            }
            match result {
                // The server's message is kept but the status line stays fixed.
                Ok(receipt) => {
                    tracing::info!(message = %receipt.message, "Upload finished");
                    state.upload_status = UploadStatus::Succeeded;
                    state.last_upload = Some(receipt);
                }
                Err(reason) => {
                    state.upload_status = UploadStatus::Failed;
                    state.record_error("Upload failed", reason);
                }
            }
        }
        AppAsyncEvent::AnalyzeFinished {
            result,
            finished_at,
        } => {
            state.loading = false;
            match result {
                Ok(reply) => {
                    state.response = reply.result.display_text();
                    state.answer = Some(AnswerMeta {
                        finished_at,
                        structured: reply.result.is_structured(),
                    });
                    state.sources = reply.sources;
                }
                Err(reason) => {
                    state.response = format!("Error: {reason}");
                    state.record_error("Analyze failed", reason);
                }
            }
            state.response_scroll = 0;
        }
        AppAsyncEvent::ChunksLoaded { result } => {
            state.chunks_loading = false;
            match result {
                Ok(listing) => state.chunks = Some(listing),
                Err(reason) => state.record_error("Failed to list stored chunks", reason),
            }
        }
        AppAsyncEvent::HealthChecked { result } => match result {
            Ok(message) => {
                tracing::info!("Service online: {message}");
                state.service = ServiceStatus::Online(message);
            }
            Err(reason) => {
                tracing::warn!("Service unreachable: {reason}");
                state.service = ServiceStatus::Offline(reason);
            }
        },
    }
}
