//! Syllabus uploader: wires a file input and a status display to the core
//! state machine and the upload engine.
pub mod platform;

pub use platform::app::UploadTrigger;
pub use platform::config::{AppConfig, ConfigError, DEFAULT_CONFIG_FILE};
pub use platform::widgets::{FileInput, PickedFiles, StatusDisplay, TerminalStatus};
