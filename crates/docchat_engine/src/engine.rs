use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use thiserror::Error;

use crate::client::{
    ChannelProgressSink, DocumentService, QueryService, ReqwestClient, ServiceSettings,
};
use crate::{EngineEvent, QueryBody, ServiceError, UploadId};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to build http client: {0}")]
    Client(#[from] ServiceError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] io::Error),
}

enum EngineCommand {
    ListDocuments,
    Upload {
        upload_id: UploadId,
        path: PathBuf,
        filename: String,
    },
    ScheduleRemoval {
        upload_id: UploadId,
        delay: Duration,
    },
    Query(QueryBody),
}

/// Sends work to the engine thread. Every command answers with exactly one
/// `EngineEvent` (uploads additionally report progress first).
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Receiving end for events produced by the engine thread.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn spawn(settings: ServiceSettings) -> Result<(Self, EngineEvents), EngineError> {
        let client = Arc::new(ReqwestClient::new(settings)?);
        Self::with_services(client.clone(), client)
    }

    pub fn with_services(
        documents: Arc<dyn DocumentService>,
        queries: Arc<dyn QueryService>,
    ) -> Result<(Self, EngineEvents), EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let documents = documents.clone();
                let queries = queries.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(documents, queries, command, event_tx).await;
                });
            }
        });

        Ok((Self { cmd_tx }, EngineEvents { event_rx }))
    }

    pub fn list_documents(&self) {
        let _ = self.cmd_tx.send(EngineCommand::ListDocuments);
    }

    pub fn upload(
        &self,
        upload_id: UploadId,
        path: impl Into<PathBuf>,
        filename: impl Into<String>,
    ) {
        let _ = self.cmd_tx.send(EngineCommand::Upload {
            upload_id,
            path: path.into(),
            filename: filename.into(),
        });
    }

    pub fn schedule_removal(&self, upload_id: UploadId, delay: Duration) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::ScheduleRemoval { upload_id, delay });
    }

    pub fn query(&self, body: QueryBody) {
        let _ = self.cmd_tx.send(EngineCommand::Query(body));
    }
}

impl EngineEvents {
    /// Blocks until the next event; `None` once the engine thread is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    documents: Arc<dyn DocumentService>,
    queries: Arc<dyn QueryService>,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::ListDocuments => {
            EngineEvent::DocumentsListed(documents.list_documents().await)
        }
        EngineCommand::Upload {
            upload_id,
            path,
            filename,
        } => {
            let sink = Arc::new(ChannelProgressSink::new(event_tx.clone()));
            let result = documents
                .upload_document(upload_id, &path, &filename, sink)
                .await;
            EngineEvent::UploadCompleted { upload_id, result }
        }
        EngineCommand::ScheduleRemoval { upload_id, delay } => {
            tokio::time::sleep(delay).await;
            EngineEvent::RemovalDue { upload_id }
        }
        EngineCommand::Query(body) => EngineEvent::QueryCompleted(queries.query(&body).await),
    };
    let _ = event_tx.send(event);
}
