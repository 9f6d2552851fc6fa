//! Uploader core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod outcome;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use outcome::{UploadOutcome, FAILURE_PREFIX, NO_FILE_MESSAGE};
pub use state::{AppState, SelectedFile, UploadId};
pub use update::update;
pub use view_model::AppViewModel;
