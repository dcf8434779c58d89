use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use crate::api::{ApiClient, ApiSettings};
use crate::poller::{ChannelEventSink, PollSession};
use crate::types::{ApiError, ClientEvent, TaskId, UploadRequest};

enum ClientCommand {
    Submit {
        upload: UploadRequest,
    },
    StartPolling {
        task_id: TaskId,
    },
    StopPolling,
    FetchPreview {
        task_id: TaskId,
    },
    Download {
        task_id: TaskId,
        dir: PathBuf,
    },
}

/// Bridge between the synchronous application loop and the async API
/// client. Owns the tokio runtime and the polling session on a
/// background thread; commands go in over a channel, events come back
/// the same way.
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
}

impl ClientHandle {
    /// Spawns the IO thread. Returns the handle plus the receiving end
    /// of the event stream.
    pub fn new(settings: ApiSettings) -> Result<(Self, mpsc::Receiver<ClientEvent>), ApiError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let api = Arc::new(ApiClient::new(settings.clone())?);

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let sink = Arc::new(ChannelEventSink::new(event_tx.clone()));
            let mut session = PollSession::new(
                api.clone(),
                sink,
                settings.poll_interval,
                runtime.handle().clone(),
            );

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    ClientCommand::Submit { upload } => {
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = api.submit(upload).await;
                            let _ = event_tx.send(ClientEvent::UploadFinished { result });
                        });
                    }
                    ClientCommand::StartPolling { task_id } => session.start(task_id),
                    ClientCommand::StopPolling => session.stop(),
                    ClientCommand::FetchPreview { task_id } => {
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = api.preview(&task_id).await;
                            let _ = event_tx.send(ClientEvent::PreviewFinished { result });
                        });
                    }
                    ClientCommand::Download { task_id, dir } => {
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = api.download(&task_id, &dir).await;
                            let _ = event_tx.send(ClientEvent::DownloadFinished { result });
                        });
                    }
                }
            }
        });

        Ok((Self { cmd_tx }, event_rx))
    }

    pub fn submit(&self, upload: UploadRequest) {
        let _ = self.cmd_tx.send(ClientCommand::Submit { upload });
    }

    pub fn start_polling(&self, task_id: TaskId) {
        let _ = self.cmd_tx.send(ClientCommand::StartPolling { task_id });
    }

    pub fn stop_polling(&self) {
        let _ = self.cmd_tx.send(ClientCommand::StopPolling);
    }

    pub fn fetch_preview(&self, task_id: TaskId) {
        let _ = self.cmd_tx.send(ClientCommand::FetchPreview { task_id });
    }

    pub fn download(&self, task_id: TaskId, dir: PathBuf) {
        let _ = self.cmd_tx.send(ClientCommand::Download { task_id, dir });
    }
}
