//! Extractor client: HTTP API access and the status polling session.
mod api;
mod handle;
mod persist;
mod poller;
mod types;
mod validate;

pub use api::{ApiClient, ApiSettings, StatusSource};
pub use handle::ClientHandle;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use poller::{ChannelEventSink, EventSink, PollSession};
pub use types::{
    ApiError, ClientEvent, DownloadedFile, Phase, PreviewPayload, TaskId, TaskOverview,
    TaskSnapshot, UploadReceipt, UploadRequest, DOWNLOAD_FILENAME,
};
pub use validate::{check_upload, UploadRejection, MAX_UPLOAD_BYTES};
