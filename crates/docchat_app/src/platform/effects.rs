use std::sync::mpsc;
use std::thread;

use chrono::{SecondsFormat, Utc};
use docchat_core::{
    Document, DocumentId, Effect, Msg, QueryRequest, SourceReference, Timestamp,
};
use docchat_engine::{
    DocumentRecord, EngineError, EngineEvent, EngineEvents, EngineHandle, QueryBody,
    ServiceSettings, SourceRecord,
};
use docchat_logging::{docchat_info, docchat_warn};

use super::app::Inbox;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ServiceSettings, inbox: mpsc::Sender<Inbox>) -> Result<Self, EngineError> {
        let (engine, events) = EngineHandle::spawn(settings)?;
        spawn_event_loop(events, inbox);
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchDocuments => self.engine.list_documents(),
                Effect::StartUpload {
                    upload_id,
                    path,
                    filename,
                } => {
                    docchat_info!("StartUpload upload_id={} file={:?}", upload_id, path);
                    self.engine.upload(upload_id, path, filename);
                }
                Effect::ScheduleUploadRemoval { upload_id, delay } => {
                    self.engine.schedule_removal(upload_id, delay);
                }
                Effect::SendQuery(request) => {
                    docchat_info!(
                        "SendQuery query_len={} documents={}",
                        request.query.len(),
                        request.document_ids.len()
                    );
                    self.engine.query(query_body(request));
                }
            }
        }
    }
}

fn spawn_event_loop(events: EngineEvents, inbox: mpsc::Sender<Inbox>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if let Some(msg) = event_to_msg(event, now_timestamp) {
                if inbox.send(Inbox::Core(msg)).is_err() {
                    break;
                }
            }
        }
    });
}

/// Failures are logged with their detail here; the core only learns that
/// something failed.
pub(crate) fn event_to_msg(event: EngineEvent, now: impl Fn() -> Timestamp) -> Option<Msg> {
    match event {
        EngineEvent::DocumentsListed(Ok(records)) => Some(Msg::DocumentsLoaded(
            records.into_iter().map(map_document).collect(),
        )),
        EngineEvent::DocumentsListed(Err(err)) => {
            docchat_warn!("Failed to load document list: {}", err);
            None
        }
        EngineEvent::UploadProgress { upload_id, percent } => {
            Some(Msg::UploadProgress { upload_id, percent })
        }
        EngineEvent::UploadCompleted {
            upload_id,
            result: Ok(record),
        } => Some(Msg::UploadSucceeded {
            upload_id,
            document: map_document(record),
        }),
        EngineEvent::UploadCompleted {
            upload_id,
            result: Err(err),
        } => {
            docchat_warn!("Upload {} failed: {}", upload_id, err);
            Some(Msg::UploadFailed { upload_id })
        }
        EngineEvent::RemovalDue { upload_id } => Some(Msg::UploadRemovalDue { upload_id }),
        EngineEvent::QueryCompleted(Ok(answer)) => Some(Msg::QueryAnswered {
            answer: answer.answer,
            documents: answer.documents.into_iter().map(map_source).collect(),
            timestamp: now(),
        }),
        EngineEvent::QueryCompleted(Err(err)) => {
            docchat_warn!("Query failed: {}", err);
            Some(Msg::QueryFailed { timestamp: now() })
        }
    }
}

/// Same shape as JavaScript's `Date.toISOString`.
pub(crate) fn now_timestamp() -> Timestamp {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn map_document(record: DocumentRecord) -> Document {
    Document {
        id: DocumentId::new(record.id),
        filename: record.filename,
        page_count: record.page_count,
        upload_time: record.upload_time,
        file_size: record.file_size,
    }
}

fn map_source(record: SourceRecord) -> SourceReference {
    SourceReference {
        filename: record.filename.unwrap_or_default(),
        page_num: record
            .page_num
            .map(|pages| pages.to_string())
            .filter(|pages| !pages.is_empty()),
        content: record.content.unwrap_or_default(),
        score: record.score,
    }
}

fn query_body(request: QueryRequest) -> QueryBody {
    QueryBody {
        query: request.query,
        document_ids: request
            .document_ids
            .into_iter()
            .map(|id| id.0)
            .collect(),
        top_k: request.top_k,
    }
}
