use crate::{SelectedFile, UploadId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST `file` as the single `file` part of a multipart form.
    StartUpload { upload_id: UploadId, file: SelectedFile },
}
