use std::sync::{mpsc, Arc};
use std::time::Duration;

use client_logging::{client_debug, client_warn};
use tokio_util::sync::CancellationToken;

use crate::api::StatusSource;
use crate::types::{ClientEvent, TaskId};

/// Receives poll results as they are produced.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ClientEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<ClientEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<ClientEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: ClientEvent) {
        let _ = self.tx.send(event);
    }
}

/// Recurring status poll bound to one task id.
///
/// At most one poller is live per session: `start` tears down the
/// previous timer before scheduling a new one, and `stop` is a no-op
/// when nothing is running. Stopping never aborts a query already in
/// flight; it only suppresses future ticks, so a late response may
/// still reach the sink and must be discarded by task id downstream.
pub struct PollSession {
    source: Arc<dyn StatusSource>,
    sink: Arc<dyn EventSink>,
    interval: Duration,
    runtime: tokio::runtime::Handle,
    active: Option<ActivePoll>,
}

struct ActivePoll {
    task_id: TaskId,
    cancel: CancellationToken,
}

impl PollSession {
    pub fn new(
        source: Arc<dyn StatusSource>,
        sink: Arc<dyn EventSink>,
        interval: Duration,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        Self {
            source,
            sink,
            interval,
            runtime,
            active: None,
        }
    }

    /// Binds the poll loop to `task_id`, replacing any live loop.
    pub fn start(&mut self, task_id: TaskId) {
        self.stop();
        client_debug!("starting status poll for task {task_id}");
        let cancel = CancellationToken::new();
        self.runtime.spawn(poll_loop(
            self.source.clone(),
            self.sink.clone(),
            self.interval,
            task_id.clone(),
            cancel.clone(),
        ));
        self.active = Some(ActivePoll { task_id, cancel });
    }

    /// Idempotent teardown; safe from any state.
    pub fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            client_debug!("stopping status poll for task {}", active.task_id);
            active.cancel.cancel();
        }
    }

    /// Task id the session is currently bound to, if any.
    pub fn polled_task(&self) -> Option<&TaskId> {
        self.active.as_ref().map(|active| &active.task_id)
    }
}

impl Drop for PollSession {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop(
    source: Arc<dyn StatusSource>,
    sink: Arc<dyn EventSink>,
    interval: Duration,
    task_id: TaskId,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }

        // The query itself is never raced against cancellation.
        match source.fetch_status(&task_id).await {
            Ok(snapshot) => {
                let terminal = snapshot.status.is_terminal();
                sink.emit(ClientEvent::Snapshot {
                    task_id: task_id.clone(),
                    snapshot,
                });
                if terminal {
                    break;
                }
            }
            Err(err) => {
                // Transient miss: keep the cadence and wait for the
                // next tick.
                client_warn!("status poll for task {task_id} failed: {err}");
            }
        }
    }
}
