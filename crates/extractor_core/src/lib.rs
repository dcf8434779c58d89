//! Extractor core: pure task-lifecycle state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod status;
mod update;
mod view_model;

pub use effect::{Effect, NoticeLevel};
pub use msg::Msg;
pub use state::{
    AppState, DownloadReport, Mode, PreviewContent, Screen, TaskId, TaskSnapshot, DEFAULT_MODEL,
};
pub use status::{step_marks, Phase, StepMark, STEP_ORDER};
pub use update::update;
pub use view_model::{
    format_completed_at, format_grouped, AppViewModel, ProgressView, ResultView, StepView,
};
