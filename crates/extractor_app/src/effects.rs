use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use client_logging::client_info;
use extractor_client::{ApiSettings, ClientEvent, ClientHandle, UploadRequest};
use extractor_core::{DownloadReport, Effect, Msg, Phase, PreviewContent, TaskSnapshot};

use crate::persistence;
use crate::render;

/// Interprets core effects against the IO client and feeds client
/// events back into the message loop.
pub struct EffectRunner {
    msg_tx: mpsc::Sender<Msg>,
    client: ClientHandle,
    file_path: PathBuf,
    output_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(
        msg_tx: mpsc::Sender<Msg>,
        settings: ApiSettings,
        file_path: PathBuf,
        output_dir: PathBuf,
    ) -> anyhow::Result<Self> {
        let (client, event_rx) = ClientHandle::new(settings)?;
        spawn_event_loop(event_rx, msg_tx.clone());
        Ok(Self {
            msg_tx,
            client,
            file_path,
            output_dir,
        })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitUpload {
                    filename,
                    mode,
                    model,
                } => {
                    client_info!(
                        "SubmitUpload filename={} mode={} model={}",
                        filename,
                        mode.as_str(),
                        model
                    );
                    match std::fs::read(&self.file_path) {
                        Ok(bytes) => self.client.submit(UploadRequest {
                            file_name: filename,
                            bytes,
                            mode: mode.as_str().to_string(),
                            model,
                        }),
                        Err(err) => {
                            let _ = self.msg_tx.send(Msg::UploadFinished {
                                result: Err(format!("cannot read {:?}: {}", self.file_path, err)),
                            });
                        }
                    }
                }
                Effect::StartPolling { task_id } => self.client.start_polling(task_id),
                Effect::StopPolling => self.client.stop_polling(),
                Effect::FetchPreview { task_id } => self.client.fetch_preview(task_id),
                Effect::DownloadResult { task_id } => {
                    self.client.download(task_id, self.output_dir.clone())
                }
                Effect::PersistSettings { model } => {
                    persistence::save_settings(&self.output_dir, &model)
                }
                Effect::Notify { level, text } => render::notice(level, &text),
            }
        }
    }
}

fn spawn_event_loop(event_rx: mpsc::Receiver<ClientEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Ok(event) = event_rx.recv() {
            let msg = match event {
                ClientEvent::UploadFinished { result } => Msg::UploadFinished {
                    result: result
                        .map(|receipt| receipt.task_id)
                        .map_err(|err| err.to_string()),
                },
                ClientEvent::Snapshot { task_id, snapshot } => Msg::SnapshotReceived {
                    task_id,
                    snapshot: map_snapshot(snapshot),
                },
                ClientEvent::PreviewFinished { result } => Msg::PreviewLoaded {
                    result: result
                        .map(|payload| PreviewContent {
                            content: payload.content,
                            truncated: payload.truncated,
                        })
                        .map_err(|err| err.to_string()),
                },
                ClientEvent::DownloadFinished { result } => Msg::DownloadFinished {
                    result: result
                        .map(|file| DownloadReport {
                            path: file.path.display().to_string(),
                            bytes: file.bytes,
                        })
                        .map_err(|err| err.to_string()),
                },
            };
            if msg_tx.send(msg).is_err() {
                break;
            }
        }
    });
}

fn map_phase(phase: extractor_client::Phase) -> Phase {
    match phase {
        extractor_client::Phase::Queued => Phase::Queued,
        extractor_client::Phase::Parsing => Phase::Parsing,
        extractor_client::Phase::Analyzing => Phase::Analyzing,
        extractor_client::Phase::Merging => Phase::Merging,
        extractor_client::Phase::Completed => Phase::Completed,
        extractor_client::Phase::Failed => Phase::Failed,
        extractor_client::Phase::Other(raw) => Phase::Other(raw),
    }
}

fn map_snapshot(snapshot: extractor_client::TaskSnapshot) -> TaskSnapshot {
    TaskSnapshot {
        phase: map_phase(snapshot.status),
        message: snapshot.message,
        content_size: snapshot.content_size,
        completed_at: snapshot.completed_at,
    }
}
