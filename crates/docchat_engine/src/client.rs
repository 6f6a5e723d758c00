use std::path::Path;
use std::sync::Arc;

use docchat_logging::docchat_debug;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde::de::DeserializeOwned;
use tokio_util::io::ReaderStream;
use url::Url;

use crate::{
    DocumentRecord, EngineEvent, FailureKind, QueryAnswer, QueryBody, ServiceError, UploadId,
};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";
const DOCUMENTS_PATH: &str = "documents/";
const QUERY_PATH: &str = "query/";
const UPLOAD_FIELD: &str = "file";
const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    /// Read size for streamed uploads; one progress event is emitted per chunk.
    pub upload_chunk_size: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            upload_chunk_size: 64 * 1024,
        }
    }
}

impl ServiceSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Resolves `path` against the base URL, treating the base as a directory.
    pub fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        let mut base = Url::parse(&self.base_url)
            .map_err(|err| ServiceError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }
        base.join(path)
            .map_err(|err| ServiceError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// The backend's document endpoints.
#[async_trait::async_trait]
pub trait DocumentService: Send + Sync {
    async fn list_documents(&self) -> Result<Vec<DocumentRecord>, ServiceError>;

    /// Streams the file at `path` as multipart field `file`, reporting
    /// `EngineEvent::UploadProgress` for `upload_id` through `sink`.
    async fn upload_document(
        &self,
        upload_id: UploadId,
        path: &Path,
        filename: &str,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<DocumentRecord, ServiceError>;
}

/// The backend's question-answering endpoint.
#[async_trait::async_trait]
pub trait QueryService: Send + Sync {
    async fn query(&self, body: &QueryBody) -> Result<QueryAnswer, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestClient {
    settings: ServiceSettings,
    client: reqwest::Client,
}

impl ReqwestClient {
    /// No client-side timeouts are configured; transport defaults apply.
    pub fn new(settings: ServiceSettings) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }
}

#[async_trait::async_trait]
impl DocumentService for ReqwestClient {
    async fn list_documents(&self) -> Result<Vec<DocumentRecord>, ServiceError> {
        let url = self.settings.endpoint(DOCUMENTS_PATH)?;
        docchat_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode_json(response).await
    }

    async fn upload_document(
        &self,
        upload_id: UploadId,
        path: &Path,
        filename: &str,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<DocumentRecord, ServiceError> {
        let url = self.settings.endpoint(DOCUMENTS_PATH)?;
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|err| ServiceError::new(FailureKind::Io, err.to_string()))?;
        let total = file
            .metadata()
            .await
            .map_err(|err| ServiceError::new(FailureKind::Io, err.to_string()))?
            .len();
        docchat_debug!(
            "POST {} upload_id={} file={} bytes={}",
            url,
            upload_id,
            filename,
            total
        );

        let mut sent: u64 = 0;
        let chunks = ReaderStream::with_capacity(file, self.settings.upload_chunk_size).map(
            move |chunk| {
                if let Ok(bytes) = &chunk {
                    sent += bytes.len() as u64;
                    sink.emit(EngineEvent::UploadProgress {
                        upload_id,
                        percent: percent_of(sent, total),
                    });
                }
                chunk
            },
        );

        let part = Part::stream_with_length(Body::wrap_stream(chunks), total)
            .file_name(filename.to_string())
            .mime_str(PDF_MIME)
            .map_err(map_reqwest_error)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode_json(response).await
    }
}

#[async_trait::async_trait]
impl QueryService for ReqwestClient {
    async fn query(&self, body: &QueryBody) -> Result<QueryAnswer, ServiceError> {
        let url = self.settings.endpoint(QUERY_PATH)?;
        docchat_debug!(
            "POST {} documents={} top_k={}",
            url,
            body.document_ids.len(),
            body.top_k
        );
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode_json(response).await
    }
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ServiceError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ServiceError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body)
        .map_err(|err| ServiceError::new(FailureKind::Decode, err.to_string()))
}

/// Rounded share of `total` already sent, as a percentage.
pub(crate) fn percent_of(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let sent = sent.min(total);
    ((sent * 100 + total / 2) / total) as u8
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ServiceError::new(FailureKind::InvalidUrl, err.to_string());
    }
    if err.is_decode() {
        return ServiceError::new(FailureKind::Decode, err.to_string());
    }
    ServiceError::new(FailureKind::Network, err.to_string())
}
