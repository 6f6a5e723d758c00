use std::time::Duration;

use crate::model::{QUERY_ERROR_TEXT, UPLOAD_REMOVAL_DELAY_MS};
use crate::{AppState, Effect, MessageKind, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => vec![Effect::FetchDocuments],
        Msg::DocumentsLoaded(documents) => {
            for document in documents {
                state.add_document(document);
            }
            Vec::new()
        }
        Msg::FilesPicked(files) => files
            .into_iter()
            .map(|file| {
                let upload_id = state.begin_upload(&file);
                Effect::StartUpload {
                    upload_id,
                    path: file.path,
                    filename: file.filename,
                }
            })
            .collect(),
        Msg::UploadProgress { upload_id, percent } => {
            state.apply_upload_progress(upload_id, percent);
            Vec::new()
        }
        Msg::UploadSucceeded {
            upload_id,
            document,
        } => {
            // Uploading a document opts it into the next query.
            let id = document.id.clone();
            state.add_document(document);
            state.select(id);
            if state.complete_upload(upload_id) {
                vec![Effect::ScheduleUploadRemoval {
                    upload_id,
                    delay: Duration::from_millis(UPLOAD_REMOVAL_DELAY_MS),
                }]
            } else {
                Vec::new()
            }
        }
        Msg::UploadFailed { upload_id } => {
            state.fail_upload(upload_id);
            Vec::new()
        }
        Msg::UploadRemovalDue { upload_id } => {
            state.remove_completed_upload(upload_id);
            Vec::new()
        }
        Msg::DocumentToggled(id) => {
            state.toggle_selection(id);
            Vec::new()
        }
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::QuerySubmitted { timestamp } => match state.submit_query(timestamp) {
            Some(request) => vec![Effect::SendQuery(request)],
            None => Vec::new(),
        },
        Msg::QueryAnswered {
            answer,
            documents,
            timestamp,
        } => {
            state.finish_query(MessageKind::Ai, answer, Some(documents), timestamp);
            Vec::new()
        }
        Msg::QueryFailed { timestamp } => {
            state.finish_query(
                MessageKind::Error,
                QUERY_ERROR_TEXT.to_string(),
                None,
                timestamp,
            );
            Vec::new()
        }
    };

    (state, effects)
}
