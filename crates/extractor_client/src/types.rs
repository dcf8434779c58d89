use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Opaque task identifier issued by the remote service.
pub type TaskId = String;

/// Name the service assigns to the downloaded result document.
pub const DOWNLOAD_FILENAME: &str = "knowledge_base.md";

/// Server-reported processing phase, decoded once at the response
/// boundary. Unrecognized values survive as `Other` instead of failing
/// the decode; the producing service is outside our control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Queued,
    Parsing,
    Analyzing,
    Merging,
    Completed,
    Failed,
    Other(String),
}

impl Phase {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "queued" => Phase::Queued,
            "parsing" => Phase::Parsing,
            "analyzing" => Phase::Analyzing,
            "merging" => Phase::Merging,
            "completed" => Phase::Completed,
            "failed" => Phase::Failed,
            _ => Phase::Other(raw.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed)
    }
}

impl<'de> Deserialize<'de> for Phase {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Phase::parse(&raw))
    }
}

/// One status poll response. Unknown fields in the task record are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskSnapshot {
    pub status: Phase,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub content_size: Option<u64>,
    #[serde(default)]
    pub completed_at: Option<String>,
}

/// Successful upload response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    pub task_id: TaskId,
    #[serde(default)]
    pub message: String,
}

/// Result preview for a completed task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PreviewPayload {
    pub content: String,
    #[serde(default)]
    pub truncated: bool,
}

/// One entry of the task listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskOverview {
    pub task_id: TaskId,
    pub filename: String,
    pub status: Phase,
    pub created_at: String,
}

/// File saved by a download call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Submission payload for a validated local file.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mode: String,
    pub model: String,
}

/// Events delivered back to the application loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    UploadFinished {
        result: Result<UploadReceipt, ApiError>,
    },
    Snapshot {
        task_id: TaskId,
        snapshot: TaskSnapshot,
    },
    PreviewFinished {
        result: Result<PreviewPayload, ApiError>,
    },
    DownloadFinished {
        result: Result<DownloadedFile, ApiError>,
    },
}

/// Errors crossing the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server rejected the request and said why.
    #[error("{0}")]
    Rejected(String),
    #[error("http status {0}")]
    Status(u16),
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("io error: {0}")]
    Io(String),
}
