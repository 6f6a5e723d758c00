use docchat_core::{
    AppViewModel, DocumentRowView, Message, MessageKind, UploadRowView, UploadStatus,
};

use super::constants::*;

/// Turns successive view models into the lines the terminal has not shown yet.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    shown_messages: usize,
    documents: Vec<DocumentRowView>,
    uploads: Vec<UploadRowView>,
    status: String,
}

impl TerminalRenderer {
    pub fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut lines = Vec::new();

        for row in &view.uploads {
            let previous = self
                .uploads
                .iter()
                .find(|old| old.upload_id == row.upload_id);
            if previous.map_or(true, |old| upload_changed(old, row)) {
                lines.push(format_upload_row(row));
            }
        }
        self.uploads = view.uploads.clone();

        if view.documents != self.documents {
            lines.extend(document_lines(view));
            self.documents = view.documents.clone();
        }

        // Messages are append-only, so only the tail is new.
        for message in view.messages.iter().skip(self.shown_messages) {
            lines.extend(format_message(message));
        }
        self.shown_messages = view.messages.len();

        let status = status_line(view);
        if status != self.status {
            lines.push(status.clone());
            self.status = status;
        }

        lines
    }
}

/// Progress is reported in quarter steps to keep the terminal readable.
fn upload_changed(old: &UploadRowView, new: &UploadRowView) -> bool {
    old.status != new.status || old.progress / 25 != new.progress / 25
}

pub fn format_upload_row(row: &UploadRowView) -> String {
    let marker = match row.status {
        UploadStatus::InProgress => "..",
        UploadStatus::Done => "ok",
        UploadStatus::Error => "!!",
    };
    format!("[{marker}] {} {}", row.filename, row.status_label)
}

pub fn document_lines(view: &AppViewModel) -> Vec<String> {
    if view.documents.is_empty() {
        return vec![format!("Documents: {NO_DOCUMENTS}")];
    }
    let mut lines = Vec::with_capacity(view.documents.len() + 1);
    lines.push("Documents:".to_string());
    for (idx, doc) in view.documents.iter().enumerate() {
        let check = if doc.selected { "x" } else { " " };
        lines.push(format!(
            "  [{check}] {}. {} ({})",
            idx + 1,
            doc.filename,
            doc.pages_label
        ));
    }
    lines
}

pub fn format_message(message: &Message) -> Vec<String> {
    let prompt = match message.kind {
        MessageKind::User => PROMPT_USER,
        MessageKind::Ai => PROMPT_AI,
        MessageKind::Error => PROMPT_ERROR,
    };
    let mut lines = vec![format!("{prompt} {}", message.content)];

    if let Some(sources) = message.documents.as_ref().filter(|docs| !docs.is_empty()) {
        lines.push("    SOURCES".to_string());
        for source in sources {
            let page = source.page_num.as_deref().unwrap_or("?");
            lines.push(format!("    - {} (page {page}): {}", source.filename, source.content));
        }
    }
    lines
}

pub fn status_line(view: &AppViewModel) -> String {
    let activity = if view.awaiting_response {
        WAITING_FOR_ANSWER
    } else {
        view.placeholder
    };
    match view.selection_hint {
        Some(hint) => format!("-- {} | {activity} | {hint}", view.selection_summary),
        None => format!("-- {} | {activity}", view.selection_summary),
    }
}
