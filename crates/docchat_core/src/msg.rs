use crate::{Document, DocumentId, PickedFile, SourceReference, Timestamp, UploadId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Front end is up; load the document list.
    Started,
    /// Engine listed the documents already known to the service.
    DocumentsLoaded(Vec<Document>),
    /// User picked one or more files for upload.
    FilesPicked(Vec<PickedFile>),
    /// Engine progress for an upload, as a percentage of bytes sent.
    UploadProgress { upload_id: UploadId, percent: u8 },
    /// Service acknowledged an upload with the created document.
    UploadSucceeded {
        upload_id: UploadId,
        document: Document,
    },
    /// Upload failed in transport or was rejected by the service.
    UploadFailed { upload_id: UploadId },
    /// Removal delay for a completed upload elapsed.
    UploadRemovalDue { upload_id: UploadId },
    /// User flipped the selection checkbox of a document.
    DocumentToggled(DocumentId),
    /// User edited the question input.
    InputChanged(String),
    /// User submitted the current input as a question.
    QuerySubmitted { timestamp: Timestamp },
    /// Query service answered.
    QueryAnswered {
        answer: String,
        documents: Vec<SourceReference>,
        timestamp: Timestamp,
    },
    /// Query failed; the detail has already been logged by the caller.
    QueryFailed { timestamp: Timestamp },
}
