use crate::{AppState, Effect, Msg, UploadOutcome, NO_FILE_MESSAGE};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesSelected(files) => {
            state.set_selection(files);
            Vec::new()
        }
        Msg::UploadClicked => {
            // Even a click without a file supersedes any upload still in flight.
            let upload_id = state.next_generation();
            match state.first_selected().cloned() {
                None => {
                    state.set_status(NO_FILE_MESSAGE.to_string());
                    Vec::new()
                }
                Some(file) => {
                    state.start_upload(upload_id);
                    vec![Effect::StartUpload { upload_id, file }]
                }
            }
        }
        Msg::UploadFinished { upload_id, outcome } => {
            if !state.finish_upload(upload_id) {
                return (state, Vec::new());
            }
            if state.is_current(upload_id) {
                state.set_status(outcome.status_text());
            } else {
                state.record_stale_reply();
            }
            Vec::new()
        }
        Msg::EngineStopped { description } => {
            if state.abandon_uploads() {
                state.set_status(UploadOutcome::Failed { description }.status_text());
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
