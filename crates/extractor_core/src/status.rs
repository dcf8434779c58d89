use std::cmp::Ordering;

/// Server-reported processing phase of a conversion task.
///
/// The set is closed on the server side; anything else arrives as
/// `Other` so an unexpected value can never break the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Queued,
    Parsing,
    Analyzing,
    Merging,
    Completed,
    Failed,
    /// Phase string the client does not recognize.
    Other(String),
}

impl Phase {
    /// Display label for the phase.
    pub fn label(&self) -> &str {
        match self {
            Phase::Queued => "Queued",
            Phase::Parsing => "Parsing",
            Phase::Analyzing => "AI analysis",
            Phase::Merging => "Merging",
            Phase::Completed => "Completed",
            Phase::Failed => "Failed",
            Phase::Other(raw) => raw,
        }
    }

    /// Overall progress shown for the phase, 0-100.
    pub fn percent(&self) -> u8 {
        match self {
            Phase::Queued => 5,
            Phase::Parsing => 25,
            Phase::Analyzing => 55,
            Phase::Merging => 85,
            Phase::Completed => 100,
            Phase::Failed | Phase::Other(_) => 0,
        }
    }

    /// Whether no further status changes can follow this phase.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed)
    }
}

/// Stages shown in the progress stepper, in processing order.
pub const STEP_ORDER: [Phase; 4] = [
    Phase::Parsing,
    Phase::Analyzing,
    Phase::Merging,
    Phase::Completed,
];

/// Highlight state of one stepper stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMark {
    Done,
    Active,
    Upcoming,
}

/// Computes the highlight for each stage in [`STEP_ORDER`].
///
/// Stages before the current phase are done and the current phase is
/// active. Phases outside the stepper (`queued`, `failed`, unknown)
/// highlight nothing.
pub fn step_marks(current: &Phase) -> [StepMark; STEP_ORDER.len()] {
    let mut marks = [StepMark::Upcoming; STEP_ORDER.len()];
    if let Some(active) = STEP_ORDER.iter().position(|phase| phase == current) {
        for (index, mark) in marks.iter_mut().enumerate() {
            *mark = match index.cmp(&active) {
                Ordering::Less => StepMark::Done,
                Ordering::Equal => StepMark::Active,
                Ordering::Greater => StepMark::Upcoming,
            };
        }
    }
    marks
}
