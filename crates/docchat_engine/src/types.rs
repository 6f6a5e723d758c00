use std::fmt;

use serde::{Deserialize, Serialize};

pub type UploadId = u64;

/// Document as reported by `GET /documents/` and `POST /documents/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub upload_time: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryBody {
    pub query: String,
    pub document_ids: Vec<String>,
    pub top_k: u32,
}

/// Source excerpt. Every field may be missing or null on the wire; sources
/// are passed through without validation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceRecord {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub page_num: Option<PageNumbers>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

/// Pages an excerpt came from. The service sends either a single number or a
/// comma-joined list such as `"3,4"`, which may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageNumbers {
    Number(u64),
    Text(String),
}

impl fmt::Display for PageNumbers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageNumbers::Number(page) => write!(f, "{page}"),
            PageNumbers::Text(pages) => f.write_str(pages),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryAnswer {
    pub answer: String,
    #[serde(default)]
    pub documents: Vec<SourceRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    DocumentsListed(Result<Vec<DocumentRecord>, ServiceError>),
    UploadProgress {
        upload_id: UploadId,
        percent: u8,
    },
    UploadCompleted {
        upload_id: UploadId,
        result: Result<DocumentRecord, ServiceError>,
    },
    RemovalDue {
        upload_id: UploadId,
    },
    QueryCompleted(Result<QueryAnswer, ServiceError>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: FailureKind,
    pub message: String,
}

impl ServiceError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Io,
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Io => write!(f, "io error"),
            FailureKind::Decode => write!(f, "undecodable response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
