use std::collections::BTreeMap;

use crate::model::QUERY_TOP_K;
use crate::view_model::{self, AppViewModel};
use crate::{
    Document, DocumentId, Message, MessageKind, PickedFile, QueryRequest, SourceReference,
    Timestamp, UploadEntry, UploadId,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    documents: Vec<Document>,
    selection: Vec<DocumentId>,
    uploads: BTreeMap<UploadId, UploadEntry>,
    next_upload_id: UploadId,
    messages: Vec<Message>,
    input: String,
    awaiting_response: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        view_model::build(self)
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Selected ids in the order they were selected.
    pub fn selection(&self) -> &[DocumentId] {
        &self.selection
    }

    pub fn is_selected(&self, id: &DocumentId) -> bool {
        self.selection.contains(id)
    }

    pub fn uploads(&self) -> &BTreeMap<UploadId, UploadEntry> {
        &self.uploads
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    /// Derived on every call; never cached.
    pub fn input_locked(&self) -> bool {
        self.uploads.values().any(UploadEntry::is_active)
    }

    pub fn input_disabled(&self) -> bool {
        self.input_locked() || self.awaiting_response
    }

    pub fn can_submit(&self) -> bool {
        !self.input_disabled() && !self.input.trim().is_empty() && !self.selection.is_empty()
    }

    pub(crate) fn add_document(&mut self, document: Document) {
        self.documents.push(document);
        self.dirty = true;
    }

    pub(crate) fn select(&mut self, id: DocumentId) {
        if !self.selection.contains(&id) {
            self.selection.push(id);
            self.dirty = true;
        }
    }

    pub(crate) fn toggle_selection(&mut self, id: DocumentId) {
        if let Some(pos) = self.selection.iter().position(|selected| *selected == id) {
            self.selection.remove(pos);
        } else {
            self.selection.push(id);
        }
        self.dirty = true;
    }

    pub(crate) fn begin_upload(&mut self, file: &PickedFile) -> UploadId {
        self.next_upload_id += 1;
        let upload_id = self.next_upload_id;
        self.uploads
            .insert(upload_id, UploadEntry::started(file.filename.clone()));
        self.dirty = true;
        upload_id
    }

    pub(crate) fn apply_upload_progress(&mut self, upload_id: UploadId, percent: u8) {
        if let Some(entry) = self.uploads.get_mut(&upload_id) {
            if entry.is_active() {
                entry.progress = percent.min(100);
                self.dirty = true;
            }
        }
    }

    /// Marks the entry completed. Returns false when the id is unknown.
    pub(crate) fn complete_upload(&mut self, upload_id: UploadId) -> bool {
        match self.uploads.get_mut(&upload_id) {
            Some(entry) => {
                entry.completed = true;
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    pub(crate) fn fail_upload(&mut self, upload_id: UploadId) {
        if let Some(entry) = self.uploads.get_mut(&upload_id) {
            if !entry.completed {
                entry.error = true;
                self.dirty = true;
            }
        }
    }

    /// Only completed entries are removed; failed ones stay until restart.
    pub(crate) fn remove_completed_upload(&mut self, upload_id: UploadId) {
        let completed = self
            .uploads
            .get(&upload_id)
            .is_some_and(|entry| entry.completed);
        if completed {
            self.uploads.remove(&upload_id);
            self.dirty = true;
        }
    }

    /// Edits are dropped while the input is disabled.
    pub(crate) fn set_input(&mut self, text: String) {
        if !self.input_disabled() && self.input != text {
            self.input = text;
            self.dirty = true;
        }
    }

    /// Moves the current input into the conversation and builds the request.
    pub(crate) fn submit_query(&mut self, timestamp: Timestamp) -> Option<QueryRequest> {
        if !self.can_submit() {
            return None;
        }
        let query = std::mem::take(&mut self.input);
        self.messages.push(Message {
            kind: MessageKind::User,
            content: query.clone(),
            documents: None,
            timestamp,
        });
        self.awaiting_response = true;
        self.dirty = true;
        Some(QueryRequest {
            query,
            document_ids: self.selection.clone(),
            top_k: QUERY_TOP_K,
        })
    }

    pub(crate) fn finish_query(
        &mut self,
        kind: MessageKind,
        content: String,
        documents: Option<Vec<SourceReference>>,
        timestamp: Timestamp,
    ) {
        self.messages.push(Message {
            kind,
            content,
            documents,
            timestamp,
        });
        self.awaiting_response = false;
        self.dirty = true;
    }
}
