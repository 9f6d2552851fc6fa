use std::collections::BTreeSet;
use std::fmt;

use crate::view_model::AppViewModel;

pub type UploadId = u64;

/// A file picked by the user: name, reported type and contents.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

// File contents can be large; only their length is useful in logs.
impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    selection: Vec<SelectedFile>,
    status_text: String,
    /// Bumped on every upload click; the latest value owns the status text.
    generation: UploadId,
    in_flight: BTreeSet<UploadId>,
    stale_replies: usize,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            status_text: self.status_text.clone(),
            selected_file: self.selection.first().map(|file| file.name.clone()),
            uploads_in_flight: self.in_flight.len(),
            stale_replies: self.stale_replies,
            dirty: self.dirty,
        }
    }

    /// Returns whether the status text changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn uploads_in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub(crate) fn set_selection(&mut self, files: Vec<SelectedFile>) {
        self.selection = files;
    }

    pub(crate) fn first_selected(&self) -> Option<&SelectedFile> {
        self.selection.first()
    }

    pub(crate) fn next_generation(&mut self) -> UploadId {
        self.generation += 1;
        self.generation
    }

    pub(crate) fn is_current(&self, upload_id: UploadId) -> bool {
        upload_id == self.generation
    }

    pub(crate) fn start_upload(&mut self, upload_id: UploadId) {
        self.in_flight.insert(upload_id);
    }

    /// Returns false when the id was not in flight.
    pub(crate) fn finish_upload(&mut self, upload_id: UploadId) -> bool {
        self.in_flight.remove(&upload_id)
    }

    /// Forgets every upload in flight; returns whether the current one was among them.
    pub(crate) fn abandon_uploads(&mut self) -> bool {
        let in_flight = std::mem::take(&mut self.in_flight);
        in_flight.contains(&self.generation)
    }

    pub(crate) fn record_stale_reply(&mut self) {
        self.stale_replies += 1;
    }

    pub(crate) fn set_status(&mut self, text: String) {
        self.status_text = text;
        self.dirty = true;
    }
}
