use crate::state::{DownloadReport, Mode, PreviewContent, TaskId, TaskSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A validated local file was accepted for upload.
    FileAccepted { filename: String },
    /// Submission finished; `Ok` carries the server-issued task id.
    UploadFinished { result: Result<TaskId, String> },
    /// A status snapshot arrived from the polling session.
    SnapshotReceived {
        task_id: TaskId,
        snapshot: TaskSnapshot,
    },
    /// User asked for the result preview.
    PreviewRequested,
    /// Preview fetch finished.
    PreviewLoaded {
        result: Result<PreviewContent, String>,
    },
    /// User asked to save the result document locally.
    DownloadRequested,
    /// Download finished.
    DownloadFinished {
        result: Result<DownloadReport, String>,
    },
    /// User picked a processing mode.
    ModeSelected(Mode),
    /// User picked a model.
    ModelSelected(String),
    /// User saved the settings panel.
    SettingsSaveRequested,
    /// Previously saved settings restored at startup.
    SettingsRestored { model: Option<String> },
    /// User started over.
    ResetRequested,
    /// Fallback for placeholder wiring.
    NoOp,
}
