/// Status shown when the trigger fires with an empty file input.
pub const NO_FILE_MESSAGE: &str = "Choose a file first";

/// Prefix for every request or decoding failure.
pub const FAILURE_PREFIX: &str = "Failed Upload: ";

/// Result of one upload as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The server answered with a JSON body.
    ///
    /// `message` is only set when the server sent a truthy value; `error` is
    /// set for any non-null value.
    Replied {
        message: Option<String>,
        error: Option<String>,
    },
    /// The request, or decoding its body, failed.
    Failed { description: String },
}

impl UploadOutcome {
    /// Text written into the status display.
    ///
    /// A reply without either field renders as the empty string.
    pub fn status_text(&self) -> String {
        match self {
            UploadOutcome::Replied { message, error } => message
                .as_ref()
                .or(error.as_ref())
                .cloned()
                .unwrap_or_default(),
            UploadOutcome::Failed { description } => format!("{FAILURE_PREFIX}{description}"),
        }
    }
}
