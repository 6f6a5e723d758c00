//! DocChat engine: HTTP services and effect execution.
mod client;
mod engine;
mod types;

pub use client::{
    ChannelProgressSink, DocumentService, ProgressSink, QueryService, ReqwestClient,
    ServiceSettings, DEFAULT_BASE_URL,
};
pub use engine::{EngineError, EngineEvents, EngineHandle};
pub use types::{
    DocumentRecord, EngineEvent, FailureKind, PageNumbers, QueryAnswer, QueryBody,
    ServiceError, SourceRecord, UploadId,
};
