/// Client-generated key for one upload. Allocated from a counter owned by
/// `AppState`, so two uploads of the same file never share an id.
pub type UploadId = u64;

/// ISO-8601 timestamp supplied by the caller. The core never reads a clock.
pub type Timestamp = String;

/// Fixed text shown when a query fails; the transport detail is only logged.
pub const QUERY_ERROR_TEXT: &str =
    "An error occurred while processing your query. Please try again.";

/// Number of chunks requested from the query service.
pub const QUERY_TOP_K: u32 = 3;

/// Delay between an upload completing and its entry leaving the tracker.
pub const UPLOAD_REMOVAL_DELAY_MS: u64 = 3_000;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A PDF the backend has ingested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub filename: String,
    pub page_count: Option<u32>,
    pub upload_time: Option<String>,
    pub file_size: Option<u64>,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        filename: impl Into<String>,
        page_count: Option<u32>,
    ) -> Self {
        Self {
            id: DocumentId::new(id),
            filename: filename.into(),
            page_count,
            upload_time: None,
            file_size: None,
        }
    }
}

/// A file the user picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub path: std::path::PathBuf,
    pub filename: String,
}

impl PickedFile {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, filename }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadEntry {
    pub filename: String,
    pub progress: u8,
    pub completed: bool,
    pub error: bool,
}

impl UploadEntry {
    pub(crate) fn started(filename: String) -> Self {
        Self {
            filename,
            progress: 0,
            completed: false,
            error: false,
        }
    }

    /// Still transferring: neither completed nor failed.
    pub fn is_active(&self) -> bool {
        !self.completed && !self.error
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    User,
    Ai,
    Error,
}

/// Excerpt the query service cites for an answer. Passed through as received.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceReference {
    pub filename: String,
    /// Pages as the service reported them, e.g. `3` or `3,4`.
    pub page_num: Option<String>,
    pub content: String,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub kind: MessageKind,
    pub content: String,
    pub documents: Option<Vec<SourceReference>>,
    pub timestamp: Timestamp,
}

/// Body of a request to the query service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub query: String,
    pub document_ids: Vec<DocumentId>,
    pub top_k: u32,
}
