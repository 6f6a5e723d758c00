use std::path::PathBuf;
use std::time::Duration;

use crate::{QueryRequest, UploadId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchDocuments,
    StartUpload {
        upload_id: UploadId,
        path: PathBuf,
        filename: String,
    },
    ScheduleUploadRemoval {
        upload_id: UploadId,
        delay: Duration,
    },
    SendQuery(QueryRequest),
}
