use crate::state::{Mode, TaskId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Upload the accepted file with the chosen options.
    SubmitUpload {
        filename: String,
        mode: Mode,
        model: String,
    },
    /// Open the polling loop for the task.
    StartPolling { task_id: TaskId },
    /// Tear down the polling loop. Idempotent at the session level.
    StopPolling,
    /// Fetch the result preview for a completed task.
    FetchPreview { task_id: TaskId },
    /// Save the result document for a completed task.
    DownloadResult { task_id: TaskId },
    /// Persist the chosen model across restarts.
    PersistSettings { model: String },
    /// Surface a short user-facing notice.
    Notify { level: NoticeLevel, text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}
