//! DocChat core: pure upload-and-query state machine and view-model helpers.
mod effect;
mod model;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use model::{
    Document, DocumentId, Message, MessageKind, PickedFile, QueryRequest, SourceReference,
    Timestamp, UploadEntry, UploadId, QUERY_ERROR_TEXT, QUERY_TOP_K, UPLOAD_REMOVAL_DELAY_MS,
};
pub use msg::Msg;
pub use state::AppState;
pub use update::update;
pub use view_model::{
    AppViewModel, DocumentRowView, UploadRowView, UploadStatus, PLACEHOLDER_READY,
    PLACEHOLDER_UPLOADING, SELECTION_HINT,
};
