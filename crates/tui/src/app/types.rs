use chrono::{DateTime, Utc};
use codelens_client::{AnalyzeReply, ChunkListing, UploadReceipt};
use std::path::PathBuf;

pub const EMPTY_QUERY_NOTICE: &str = "Please enter a query";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading,
    Succeeded,
    Failed,
}

impl UploadStatus {
    pub fn label(&self) -> &'static str {
        match self {
            UploadStatus::Idle => "",
            UploadStatus::Uploading => "Uploading...",
            UploadStatus::Succeeded => "Upload successful",
            UploadStatus::Failed => "Upload failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ServiceStatus {
    #[default]
    Unknown,
    Online(String),
    Offline(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Prompt,
    Response,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Prompt => Focus::Response,
            Focus::Response => Focus::Prompt,
        }
    }
}

/// Stamped on every upload so a late completion cannot overwrite the status
/// of a newer selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct UploadTicket(pub u64);

#[derive(Debug, Clone)]
pub struct AnswerMeta {
    pub finished_at: DateTime<Utc>,
    pub structured: bool,
}

/// Completion of a spawned request, delivered back to the UI thread.
#[derive(Debug)]
pub enum AppAsyncEvent {
    UploadFinished {
        ticket: UploadTicket,
        result: Result<UploadReceipt, String>,
    },
    AnalyzeFinished {
        result: Result<AnalyzeReply, String>,
        finished_at: DateTime<Utc>,
    },
    ChunksLoaded {
        result: Result<ChunkListing, String>,
    },
    HealthChecked {
        result: Result<String, String>,
    },
}

/// Everything that can change the UI state.
#[derive(Debug)]
pub enum Action {
    SelectFile(Option<PathBuf>),
    Submit,
    DismissNotice,
    RequestChunks,
    CloseChunks,
    ToggleHelp,
    FocusNext,
    Scroll(i32),
    CheckHealth,
    Async(AppAsyncEvent),
}

/// Side effects requested by the reducer and run by the app shell.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Upload { ticket: UploadTicket, path: PathBuf },
    Analyze { query: String },
    ListChunks { limit: u32 },
    CheckHealth,
}
