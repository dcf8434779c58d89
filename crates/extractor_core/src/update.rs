use crate::{AppState, Effect, Msg, NoticeLevel, Phase, TaskId};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileAccepted { filename } => {
            // One submission at a time; a fresh user action is required
            // to resubmit after the current one settles.
            if state.upload_in_flight() {
                return (state, Vec::new());
            }
            state.begin_upload(filename.clone());
            vec![
                Effect::Notify {
                    level: NoticeLevel::Info,
                    text: format!("Uploading {filename}..."),
                },
                Effect::SubmitUpload {
                    filename,
                    mode: state.mode(),
                    model: state.model().to_string(),
                },
            ]
        }
        Msg::UploadFinished { result } => match result {
            Ok(task_id) => {
                state.track_task(task_id.clone());
                vec![
                    Effect::Notify {
                        level: NoticeLevel::Success,
                        text: "Upload accepted, processing started".to_string(),
                    },
                    Effect::StartPolling { task_id },
                ]
            }
            Err(reason) => {
                state.upload_failed();
                vec![Effect::Notify {
                    level: NoticeLevel::Error,
                    text: format!("Upload failed: {reason}"),
                }]
            }
        },
        Msg::SnapshotReceived { task_id, snapshot } => {
            // Late response for a task that is no longer tracked, or a
            // duplicate after a terminal phase was already applied.
            if state.current_task() != Some(&task_id) {
                return (state, Vec::new());
            }
            if state
                .snapshot()
                .is_some_and(|current| current.phase.is_terminal())
            {
                return (state, Vec::new());
            }

            let phase = snapshot.phase.clone();
            let message = snapshot.message.clone();
            state.apply_snapshot(snapshot);
            match phase {
                Phase::Completed => vec![
                    Effect::StopPolling,
                    Effect::Notify {
                        level: NoticeLevel::Success,
                        text: "Knowledge base ready".to_string(),
                    },
                ],
                Phase::Failed => vec![
                    Effect::StopPolling,
                    Effect::Notify {
                        level: NoticeLevel::Error,
                        text: format!("Processing failed: {message}"),
                    },
                ],
                _ => Vec::new(),
            }
        }
        Msg::PreviewRequested => match completed_task(&state) {
            Some(task_id) => vec![Effect::FetchPreview { task_id }],
            None => Vec::new(),
        },
        Msg::PreviewLoaded { result } => match result {
            Ok(preview) => {
                let truncated = preview.truncated;
                state.show_preview(preview);
                if truncated {
                    vec![Effect::Notify {
                        level: NoticeLevel::Info,
                        text: "Preview truncated by the server".to_string(),
                    }]
                } else {
                    Vec::new()
                }
            }
            Err(reason) => vec![Effect::Notify {
                level: NoticeLevel::Error,
                text: format!("Preview failed: {reason}"),
            }],
        },
        Msg::DownloadRequested => match completed_task(&state) {
            Some(task_id) => vec![
                Effect::DownloadResult { task_id },
                Effect::Notify {
                    level: NoticeLevel::Info,
                    text: "Downloading result...".to_string(),
                },
            ],
            None => Vec::new(),
        },
        Msg::DownloadFinished { result } => match result {
            Ok(report) => vec![Effect::Notify {
                level: NoticeLevel::Success,
                text: format!("Saved {} ({} bytes)", report.path, report.bytes),
            }],
            Err(reason) => vec![Effect::Notify {
                level: NoticeLevel::Error,
                text: format!("Download failed: {reason}"),
            }],
        },
        Msg::ModeSelected(mode) => {
            state.select_mode(mode);
            Vec::new()
        }
        Msg::ModelSelected(model) => {
            state.select_model(model);
            Vec::new()
        }
        Msg::SettingsSaveRequested => vec![
            Effect::PersistSettings {
                model: state.model().to_string(),
            },
            Effect::Notify {
                level: NoticeLevel::Success,
                text: "Settings saved".to_string(),
            },
        ],
        Msg::SettingsRestored { model } => {
            if let Some(model) = model {
                state.select_model(model);
            }
            Vec::new()
        }
        Msg::ResetRequested => {
            state.reset();
            vec![Effect::StopPolling]
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn completed_task(state: &AppState) -> Option<TaskId> {
    match (state.current_task(), state.snapshot()) {
        (Some(task_id), Some(snapshot)) if snapshot.phase == Phase::Completed => {
            Some(task_id.clone())
        }
        _ => None,
    }
}
