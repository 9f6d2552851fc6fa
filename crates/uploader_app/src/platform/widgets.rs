//! The two UI surfaces the trigger talks to, passed in as handles.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use engine_logging::engine_debug;
use uploader_core::SelectedFile;

/// A file picker: exposes whatever the user currently has selected.
pub trait FileInput {
    fn selected_files(&self) -> Vec<SelectedFile>;
}

/// Where status text is rendered.
pub trait StatusDisplay {
    fn set_text(&self, text: &str);
}

/// Files picked from disk, read once when picked.
#[derive(Debug, Clone, Default)]
pub struct PickedFiles {
    files: Vec<SelectedFile>,
}

impl PickedFiles {
    pub fn new(files: Vec<SelectedFile>) -> Self {
        Self { files }
    }

    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> io::Result<Self> {
        let files = paths
            .iter()
            .map(|path| read_selected_file(path.as_ref()))
            .collect::<io::Result<Vec<_>>>()?;
        Ok(Self { files })
    }
}

impl FileInput for PickedFiles {
    fn selected_files(&self) -> Vec<SelectedFile> {
        self.files.clone()
    }
}

fn read_selected_file(path: &Path) -> io::Result<SelectedFile> {
    let bytes = fs::read(path)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} does not name a file", path.display()),
            )
        })?;
    let mime_type = guess_mime_type(path, &bytes);
    engine_debug!("Picked {} ({} bytes, {:?})", name, bytes.len(), mime_type);

    let file = SelectedFile::new(name, bytes);
    Ok(match mime_type {
        Some(mime) => file.with_mime_type(mime),
        None => file,
    })
}

/// Extension first, like a browser file picker; content sniffing when the
/// extension says nothing.
fn guess_mime_type(path: &Path, bytes: &[u8]) -> Option<&'static str> {
    mime_guess::from_path(path)
        .first_raw()
        .or_else(|| infer::get(bytes).map(|kind| kind.mime_type()))
}

/// Prints every status update on its own line and remembers the last one.
#[derive(Debug, Default)]
pub struct TerminalStatus {
    last: Mutex<Option<String>>,
}

impl TerminalStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_text(&self) -> Option<String> {
        self.last.lock().ok().and_then(|last| last.clone())
    }
}

impl StatusDisplay for TerminalStatus {
    fn set_text(&self, text: &str) {
        println!("{text}");
        if let Ok(mut last) = self.last.lock() {
            *last = Some(text.to_string());
        }
    }
}
