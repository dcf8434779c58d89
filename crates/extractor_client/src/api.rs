use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use serde::Deserialize;

use crate::persist::AtomicFileWriter;
use crate::types::{
    ApiError, DownloadedFile, PreviewPayload, TaskOverview, TaskSnapshot, UploadReceipt,
    UploadRequest, DOWNLOAD_FILENAME,
};

const API_KEY_HEADER: &str = "X-API-Key";

/// Connection settings for the extraction service.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            api_key: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(2000),
        }
    }
}

/// Source of task status snapshots, abstracted so the polling session
/// can be driven by a fake in tests.
#[async_trait::async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, task_id: &str) -> Result<TaskSnapshot, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    settings: ApiSettings,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self { settings, http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.with_api_key(self.http.get(self.url(path)))
    }

    fn with_api_key(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.settings.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    /// Creates a conversion job. Returns the server-issued task id;
    /// starting the status poll is the caller's decision.
    pub async fn submit(&self, upload: UploadRequest) -> Result<UploadReceipt, ApiError> {
        let part = reqwest::multipart::Part::bytes(upload.bytes).file_name(upload.file_name);
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("mode", upload.mode)
            .text("model", upload.model);

        let response = self
            .with_api_key(self.http.post(self.url("/api/upload")))
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        response
            .json::<UploadReceipt>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// Fetches the current task snapshot.
    pub async fn status(&self, task_id: &str) -> Result<TaskSnapshot, ApiError> {
        let response = self
            .get(&format!("/api/status/{task_id}"))
            .send()
            .await
            .map_err(map_transport_error)?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        response
            .json::<TaskSnapshot>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// Fetches the result preview of a completed task.
    pub async fn preview(&self, task_id: &str) -> Result<PreviewPayload, ApiError> {
        let response = self
            .get(&format!("/api/preview/{task_id}"))
            .send()
            .await
            .map_err(map_transport_error)?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        response
            .json::<PreviewPayload>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// Lists every task the service currently knows about.
    pub async fn tasks(&self) -> Result<Vec<TaskOverview>, ApiError> {
        #[derive(Deserialize)]
        struct TaskListPayload {
            tasks: Vec<TaskOverview>,
        }

        let response = self
            .get("/api/tasks")
            .send()
            .await
            .map_err(map_transport_error)?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        let payload = response
            .json::<TaskListPayload>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        Ok(payload.tasks)
    }

    /// Streams the result document of a completed task into `dir`,
    /// written atomically under [`DOWNLOAD_FILENAME`].
    pub async fn download(&self, task_id: &str, dir: &Path) -> Result<DownloadedFile, ApiError> {
        let response = self
            .get(&format!("/api/download/{task_id}"))
            .send()
            .await
            .map_err(map_transport_error)?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_transport_error)?;
            bytes.extend_from_slice(&chunk);
        }

        let writer = AtomicFileWriter::new(dir.to_path_buf());
        let path = writer
            .write(DOWNLOAD_FILENAME, &bytes)
            .map_err(|err| ApiError::Io(err.to_string()))?;
        Ok(DownloadedFile {
            path,
            bytes: bytes.len() as u64,
        })
    }
}

#[async_trait::async_trait]
impl StatusSource for ApiClient {
    async fn fetch_status(&self, task_id: &str) -> Result<TaskSnapshot, ApiError> {
        self.status(task_id).await
    }
}

/// Maps a non-2xx response, preferring the server-supplied error text.
async fn rejection(response: reqwest::Response) -> ApiError {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        error: String,
    }

    let code = response.status().as_u16();
    match response.json::<ErrorBody>().await {
        Ok(body) if !body.error.is_empty() => ApiError::Rejected(body.error),
        _ => ApiError::Status(code),
    }
}

fn map_transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout;
    }
    ApiError::Network(err.to_string())
}
