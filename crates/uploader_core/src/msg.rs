#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The file input's current selection, in picker order.
    FilesSelected(Vec<crate::SelectedFile>),
    /// User asked for the selected file to be uploaded.
    UploadClicked,
    /// Engine finished an upload, successfully or not.
    UploadFinished {
        upload_id: crate::UploadId,
        outcome: crate::UploadOutcome,
    },
    /// Engine can no longer report; every upload still in flight is lost.
    EngineStopped { description: String },
    /// Fallback for placeholder wiring.
    NoOp,
}
