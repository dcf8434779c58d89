use std::sync::Once;

use extractor_core::{
    update, AppState, Effect, Mode, Msg, NoticeLevel, Phase, Screen, TaskSnapshot,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn submit_file(state: AppState, filename: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::FileAccepted {
            filename: filename.to_string(),
        },
    )
}

fn accepted(state: AppState, task_id: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::UploadFinished {
            result: Ok(task_id.to_string()),
        },
    )
}

fn snapshot(phase: Phase, message: &str) -> TaskSnapshot {
    TaskSnapshot {
        phase,
        message: message.to_string(),
        content_size: None,
        completed_at: None,
    }
}

#[test]
fn accepted_upload_starts_polling_exactly_once() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = submit_file(state, "handbook.docx");
    assert!(effects.contains(&Effect::SubmitUpload {
        filename: "handbook.docx".to_string(),
        mode: Mode::Append,
        model: "gemini-2.5-flash-lite".to_string(),
    }));

    let (mut state, effects) = accepted(state, "t1");
    assert_eq!(state.current_task().map(String::as_str), Some("t1"));
    assert_eq!(
        effects
            .iter()
            .filter(|effect| matches!(effect, Effect::StartPolling { .. }))
            .count(),
        1
    );
    assert!(effects.contains(&Effect::StartPolling {
        task_id: "t1".to_string(),
    }));
    assert!(state.consume_dirty());

    // The seeded snapshot shows the queued phase before the first poll.
    let view = state.view();
    let progress = view.progress.expect("progress view");
    assert_eq!(progress.percent, 5);
    assert_eq!(progress.label, "Queued");
    assert!(!progress.terminal);
}

#[test]
fn second_submission_while_upload_in_flight_is_ignored() {
    init_logging();
    let state = AppState::new();
    let (state, _effects) = submit_file(state, "first.docx");
    let (_state, effects) = submit_file(state, "second.docx");
    assert!(effects.is_empty());
}

#[test]
fn rejected_upload_notifies_without_state_change() {
    init_logging();
    let state = AppState::new();
    let (state, _effects) = submit_file(state, "handbook.docx");
    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            result: Err("unsupported file format".to_string()),
        },
    );

    assert!(state.current_task().is_none());
    assert_eq!(state.view().screen, Screen::Upload);
    assert_eq!(
        effects,
        vec![Effect::Notify {
            level: NoticeLevel::Error,
            text: "Upload failed: unsupported file format".to_string(),
        }]
    );

    // A fresh submission is possible again after the failure.
    let (_state, effects) = submit_file(state, "handbook.docx");
    assert_eq!(effects.len(), 2);
}

#[test]
fn parsing_snapshot_projects_quarter_progress() {
    init_logging();
    let state = AppState::new();
    let (state, _effects) = submit_file(state, "handbook.docx");
    let (state, _effects) = accepted(state, "t1");

    let (state, effects) = update(
        state,
        Msg::SnapshotReceived {
            task_id: "t1".to_string(),
            snapshot: snapshot(Phase::Parsing, "Extracting document text"),
        },
    );
    assert!(effects.is_empty());

    let view = state.view();
    let progress = view.progress.expect("progress view");
    assert_eq!(progress.percent, 25);
    assert!(!progress.terminal);
    assert_eq!(progress.message, "Extracting document text");
}

#[test]
fn completed_snapshot_stops_polling_and_shows_result() {
    init_logging();
    let state = AppState::new();
    let (state, _effects) = submit_file(state, "handbook.docx");
    let (state, _effects) = accepted(state, "t1");

    let (state, effects) = update(
        state,
        Msg::SnapshotReceived {
            task_id: "t1".to_string(),
            snapshot: TaskSnapshot {
                phase: Phase::Completed,
                message: "Done".to_string(),
                content_size: Some(12345),
                completed_at: Some("2024-01-01T00:00:00Z".to_string()),
            },
        },
    );

    assert_eq!(effects[0], Effect::StopPolling);
    assert!(matches!(
        effects[1],
        Effect::Notify {
            level: NoticeLevel::Success,
            ..
        }
    ));

    let view = state.view();
    assert_eq!(view.screen, Screen::Result);
    let progress = view.progress.expect("progress view");
    assert_eq!(progress.percent, 100);
    assert!(progress.terminal);
    let result = view.result.expect("result view");
    assert_eq!(result.size_text, "12,345");
    assert!(result.completed_text.contains("2024") || result.completed_text.contains("2023"));
}

#[test]
fn failed_snapshot_stops_polling_and_carries_server_message() {
    init_logging();
    let state = AppState::new();
    let (state, _effects) = submit_file(state, "handbook.docx");
    let (state, _effects) = accepted(state, "t1");

    let (state, effects) = update(
        state,
        Msg::SnapshotReceived {
            task_id: "t1".to_string(),
            snapshot: snapshot(Phase::Failed, "model quota exhausted"),
        },
    );

    assert_eq!(
        effects,
        vec![
            Effect::StopPolling,
            Effect::Notify {
                level: NoticeLevel::Error,
                text: "Processing failed: model quota exhausted".to_string(),
            },
        ]
    );
    assert_eq!(state.view().screen, Screen::Progress);
}

#[test]
fn stale_snapshot_is_discarded() {
    init_logging();
    let state = AppState::new();
    let (state, _effects) = submit_file(state, "handbook.docx");
    let (mut state, _effects) = accepted(state, "t1");
    assert!(state.consume_dirty());

    let before = state.view();
    let (mut state, effects) = update(
        state,
        Msg::SnapshotReceived {
            task_id: "t0".to_string(),
            snapshot: snapshot(Phase::Failed, "stale"),
        },
    );

    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    assert_eq!(state.view(), before);
}

#[test]
fn snapshot_after_terminal_phase_is_discarded() {
    init_logging();
    let state = AppState::new();
    let (state, _effects) = submit_file(state, "handbook.docx");
    let (state, _effects) = accepted(state, "t1");
    let (state, _effects) = update(
        state,
        Msg::SnapshotReceived {
            task_id: "t1".to_string(),
            snapshot: snapshot(Phase::Completed, "Done"),
        },
    );

    let (_state, effects) = update(
        state,
        Msg::SnapshotReceived {
            task_id: "t1".to_string(),
            snapshot: snapshot(Phase::Completed, "Done"),
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn reset_clears_task_and_discards_late_snapshot() {
    init_logging();
    let state = AppState::new();
    let (state, _effects) = submit_file(state, "handbook.docx");
    let (state, _effects) = accepted(state, "t1");

    let (state, effects) = update(state, Msg::ResetRequested);
    assert_eq!(effects, vec![Effect::StopPolling]);
    assert!(state.current_task().is_none());
    assert_eq!(state.view().screen, Screen::Upload);

    // A query issued just before the reset may still deliver.
    let (state, effects) = update(
        state,
        Msg::SnapshotReceived {
            task_id: "t1".to_string(),
            snapshot: snapshot(Phase::Merging, "late"),
        },
    );
    assert!(effects.is_empty());
    assert!(state.snapshot().is_none());
}

#[test]
fn reset_is_safe_when_nothing_is_active() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = update(state, Msg::ResetRequested);
    assert_eq!(effects, vec![Effect::StopPolling]);
    let (_state, effects) = update(state, Msg::ResetRequested);
    assert_eq!(effects, vec![Effect::StopPolling]);
}

#[test]
fn reset_keeps_mode_and_model_choices() {
    init_logging();
    let state = AppState::new();
    let (state, _effects) = update(state, Msg::ModeSelected(Mode::New));
    let (state, _effects) = update(state, Msg::ModelSelected("gemini-1.5-pro".to_string()));
    let (state, _effects) = update(state, Msg::ResetRequested);

    let view = state.view();
    assert_eq!(view.mode, Mode::New);
    assert_eq!(view.model, "gemini-1.5-pro");
}

#[test]
fn preview_and_download_require_a_completed_task() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = update(state, Msg::PreviewRequested);
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::DownloadRequested);
    assert!(effects.is_empty());

    let (state, _effects) = submit_file(state, "handbook.docx");
    let (state, _effects) = accepted(state, "t1");
    let (state, effects) = update(state, Msg::PreviewRequested);
    assert!(effects.is_empty(), "preview before completion is a no-op");

    let (state, _effects) = update(
        state,
        Msg::SnapshotReceived {
            task_id: "t1".to_string(),
            snapshot: snapshot(Phase::Completed, "Done"),
        },
    );
    let (state, effects) = update(state, Msg::PreviewRequested);
    assert_eq!(
        effects,
        vec![Effect::FetchPreview {
            task_id: "t1".to_string(),
        }]
    );
    let (_state, effects) = update(state, Msg::DownloadRequested);
    assert_eq!(
        effects[0],
        Effect::DownloadResult {
            task_id: "t1".to_string(),
        }
    );
}

#[test]
fn settings_save_persists_the_chosen_model() {
    init_logging();
    let state = AppState::new();
    let (state, _effects) = update(state, Msg::ModelSelected("gemini-2.0-flash".to_string()));
    let (_state, effects) = update(state, Msg::SettingsSaveRequested);

    assert_eq!(
        effects[0],
        Effect::PersistSettings {
            model: "gemini-2.0-flash".to_string(),
        }
    );
}

#[test]
fn restored_settings_apply_only_when_present() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = update(state, Msg::SettingsRestored { model: None });
    assert!(effects.is_empty());
    assert_eq!(state.view().model, "gemini-2.5-flash-lite");

    let (state, _effects) = update(
        state,
        Msg::SettingsRestored {
            model: Some("gemini-1.5-flash".to_string()),
        },
    );
    assert_eq!(state.view().model, "gemini-1.5-flash");
}
