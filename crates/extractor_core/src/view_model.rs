use crate::state::{Mode, PreviewContent, Screen, TaskSnapshot};
use crate::status::{step_marks, Phase, StepMark, STEP_ORDER};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub screen: Screen,
    pub mode: Mode,
    pub model: String,
    pub progress: Option<ProgressView>,
    pub result: Option<ResultView>,
    pub preview: Option<PreviewContent>,
}

/// Display instructions for the tracked task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub filename: String,
    pub phase: Phase,
    pub label: String,
    pub percent: u8,
    pub message: String,
    pub terminal: bool,
    pub steps: Vec<StepView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepView {
    pub phase: Phase,
    pub mark: StepMark,
}

impl ProgressView {
    /// Pure projection from one task snapshot to display instructions.
    pub fn project(filename: &str, snapshot: &TaskSnapshot) -> Self {
        let steps = STEP_ORDER
            .iter()
            .zip(step_marks(&snapshot.phase))
            .map(|(phase, mark)| StepView {
                phase: phase.clone(),
                mark,
            })
            .collect();

        Self {
            filename: filename.to_string(),
            phase: snapshot.phase.clone(),
            label: snapshot.phase.label().to_string(),
            percent: snapshot.phase.percent(),
            message: snapshot.message.clone(),
            terminal: snapshot.phase.is_terminal(),
            steps,
        }
    }
}

/// Summary card shown after terminal completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub size_text: String,
    pub completed_text: String,
}

impl ResultView {
    pub fn project(snapshot: &TaskSnapshot) -> Self {
        Self {
            size_text: snapshot
                .content_size
                .map(format_grouped)
                .unwrap_or_else(|| "-".to_string()),
            completed_text: snapshot
                .completed_at
                .as_deref()
                .map(format_completed_at)
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Renders a character count with thousands separators.
pub fn format_grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

const COMPLETED_AT_FORMAT: &str = "%B %e, %Y %H:%M:%S";

/// Renders a completion timestamp in a local long format.
///
/// The service emits either RFC 3339 or a naive ISO-8601 local
/// timestamp; anything unparseable is shown as-is.
pub fn format_completed_at(raw: &str) -> String {
    if let Ok(timestamp) = chrono::DateTime::parse_from_rfc3339(raw) {
        return timestamp
            .with_timezone(&chrono::Local)
            .format(COMPLETED_AT_FORMAT)
            .to_string();
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format(COMPLETED_AT_FORMAT).to_string();
    }
    raw.to_string()
}
