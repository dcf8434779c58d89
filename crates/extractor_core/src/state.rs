use crate::status::Phase;
use crate::view_model::{AppViewModel, ProgressView, ResultView};

/// Opaque task identifier issued by the remote service.
pub type TaskId = String;

/// Model requested when the user has not picked one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

/// Processing mode requested at submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Start a fresh knowledge base.
    New,
    /// Merge into the existing knowledge base.
    #[default]
    Append,
}

impl Mode {
    /// Wire value sent in the upload form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::New => "new",
            Mode::Append => "append",
        }
    }

    /// Parses a user-supplied mode, rejecting anything outside the enumeration.
    pub fn parse(raw: &str) -> Option<Mode> {
        match raw {
            "new" => Some(Mode::New),
            "append" => Some(Mode::Append),
            _ => None,
        }
    }
}

/// Last-seen server snapshot of the tracked task. Overwritten wholesale
/// on every poll, never merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    pub phase: Phase,
    pub message: String,
    pub content_size: Option<u64>,
    pub completed_at: Option<String>,
}

/// Result preview returned by the server after completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewContent {
    pub content: String,
    pub truncated: bool,
}

/// Outcome of saving the result document locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    pub path: String,
    pub bytes: u64,
}

/// Which top-level view is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Upload,
    Progress,
    Result,
}

/// Whole-application state. Owned by the event loop; mutated only
/// through [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    screen: Screen,
    mode: Mode,
    model: String,
    filename: Option<String>,
    upload_in_flight: bool,
    current_task: Option<TaskId>,
    snapshot: Option<TaskSnapshot>,
    preview: Option<PreviewContent>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            screen: Screen::default(),
            mode: Mode::default(),
            model: DEFAULT_MODEL.to_string(),
            filename: None,
            upload_in_flight: false,
            current_task: None,
            snapshot: None,
            preview: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the display instructions for the current state.
    pub fn view(&self) -> AppViewModel {
        let progress = match (&self.filename, &self.snapshot) {
            (Some(filename), Some(snapshot)) => Some(ProgressView::project(filename, snapshot)),
            _ => None,
        };
        let result = self
            .snapshot
            .as_ref()
            .filter(|snapshot| snapshot.phase == Phase::Completed)
            .map(ResultView::project);

        AppViewModel {
            screen: self.screen,
            mode: self.mode,
            model: self.model.clone(),
            progress,
            result,
            preview: self.preview.clone(),
        }
    }

    /// Returns whether the view changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn current_task(&self) -> Option<&TaskId> {
        self.current_task.as_ref()
    }

    pub fn snapshot(&self) -> Option<&TaskSnapshot> {
        self.snapshot.as_ref()
    }

    pub(crate) fn upload_in_flight(&self) -> bool {
        self.upload_in_flight
    }

    pub(crate) fn begin_upload(&mut self, filename: String) {
        self.filename = Some(filename);
        self.upload_in_flight = true;
        self.dirty = true;
    }

    pub(crate) fn upload_failed(&mut self) {
        self.upload_in_flight = false;
    }

    /// Starts tracking a freshly created task. The snapshot is seeded
    /// with the queued phase so the progress view is populated before
    /// the first poll lands.
    pub(crate) fn track_task(&mut self, task_id: TaskId) {
        self.upload_in_flight = false;
        self.current_task = Some(task_id);
        self.snapshot = Some(TaskSnapshot {
            phase: Phase::Queued,
            message: "Waiting for processing".to_string(),
            content_size: None,
            completed_at: None,
        });
        self.preview = None;
        self.screen = Screen::Progress;
        self.dirty = true;
    }

    pub(crate) fn apply_snapshot(&mut self, snapshot: TaskSnapshot) {
        if snapshot.phase == Phase::Completed {
            self.screen = Screen::Result;
        }
        self.snapshot = Some(snapshot);
        self.dirty = true;
    }

    pub(crate) fn show_preview(&mut self, preview: PreviewContent) {
        self.preview = Some(preview);
        self.dirty = true;
    }

    pub(crate) fn select_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.dirty = true;
    }

    pub(crate) fn select_model(&mut self, model: String) {
        self.model = model;
        self.dirty = true;
    }

    /// Clears everything tied to the tracked task, keeping the user's
    /// mode and model choices.
    pub(crate) fn reset(&mut self) {
        self.screen = Screen::Upload;
        self.filename = None;
        self.upload_in_flight = false;
        self.current_task = None;
        self.snapshot = None;
        self.preview = None;
        self.dirty = true;
    }
}
