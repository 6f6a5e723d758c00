use crate::{AppState, DocumentId, Message, UploadId};

pub const PLACEHOLDER_UPLOADING: &str = "Uploading documents...";
pub const PLACEHOLDER_READY: &str = "Ask a question about your documents";
pub const SELECTION_HINT: &str = "Select documents from the sidebar to start chatting";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub documents: Vec<DocumentRowView>,
    pub uploads: Vec<UploadRowView>,
    pub messages: Vec<Message>,
    pub input: String,
    pub input_locked: bool,
    pub awaiting_response: bool,
    pub input_disabled: bool,
    pub can_submit: bool,
    pub placeholder: &'static str,
    pub selected_count: usize,
    pub selection_summary: String,
    pub selection_hint: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRowView {
    pub id: DocumentId,
    pub filename: String,
    pub pages_label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    InProgress,
    Done,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRowView {
    pub upload_id: UploadId,
    pub filename: String,
    pub progress: u8,
    pub status: UploadStatus,
    pub status_label: String,
}

pub(crate) fn build(state: &AppState) -> AppViewModel {
    let documents = state
        .documents()
        .iter()
        .map(|doc| DocumentRowView {
            id: doc.id.clone(),
            filename: doc.filename.clone(),
            // A zero count means the service has not counted pages yet.
            pages_label: match doc.page_count {
                Some(count) if count > 0 => format!("{count} pages"),
                _ => "? pages".to_string(),
            },
            selected: state.is_selected(&doc.id),
        })
        .collect::<Vec<_>>();

    let uploads = state
        .uploads()
        .iter()
        .map(|(upload_id, entry)| {
            // Completed takes precedence over error.
            let status = if entry.completed {
                UploadStatus::Done
            } else if entry.error {
                UploadStatus::Error
            } else {
                UploadStatus::InProgress
            };
            let status_label = match status {
                UploadStatus::Done => "Done".to_string(),
                UploadStatus::Error => "Error".to_string(),
                UploadStatus::InProgress => format!("{}%", entry.progress),
            };
            UploadRowView {
                upload_id: *upload_id,
                filename: entry.filename.clone(),
                progress: entry.progress,
                status,
                status_label,
            }
        })
        .collect();

    let input_locked = state.input_locked();
    let selected_count = state.selection().len();
    let selection_summary = match selected_count {
        0 => "No documents selected".to_string(),
        1 => "1 document selected".to_string(),
        n => format!("{n} documents selected"),
    };
    let selection_hint = (selected_count == 0 && !documents.is_empty()).then_some(SELECTION_HINT);

    AppViewModel {
        documents,
        uploads,
        messages: state.messages().to_vec(),
        input: state.input().to_string(),
        input_locked,
        awaiting_response: state.awaiting_response(),
        input_disabled: state.input_disabled(),
        can_submit: state.can_submit(),
        placeholder: if input_locked {
            PLACEHOLDER_UPLOADING
        } else {
            PLACEHOLDER_READY
        },
        selected_count,
        selection_summary,
        selection_hint,
    }
}
