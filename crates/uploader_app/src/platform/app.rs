use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

use engine_logging::{engine_debug, engine_warn};
use uploader_core::{update, AppState, AppViewModel, Msg};
use uploader_engine::{EngineHandle, UploadSettings};

use super::effects::EffectRunner;
use super::widgets::{FileInput, StatusDisplay};

const PUMP_INTERVAL: Duration = Duration::from_millis(100);

/// The upload button: reads the file input, posts the first file and renders
/// the outcome into the status display.
///
/// Triggering never blocks on the network. Replies are applied by [`pump`] or
/// [`settle`], and only the reply to the most recent trigger is rendered.
///
/// [`pump`]: UploadTrigger::pump
/// [`settle`]: UploadTrigger::settle
pub struct UploadTrigger {
    state: AppState,
    effects: EffectRunner,
}

impl UploadTrigger {
    pub fn new(settings: UploadSettings) -> io::Result<Self> {
        Ok(Self::with_runner(EffectRunner::new(settings)?))
    }

    pub fn with_engine(engine: EngineHandle) -> Self {
        Self::with_runner(EffectRunner::with_engine(engine))
    }

    fn with_runner(effects: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            effects,
        }
    }

    pub fn trigger(&mut self, input: &dyn FileInput, status: &dyn StatusDisplay) {
        self.dispatch(Msg::FilesSelected(input.selected_files()), status);
        self.dispatch(Msg::UploadClicked, status);
    }

    /// Applies at most one finished upload, waiting up to `wait` for it.
    ///
    /// If the engine has stopped, every upload in flight is failed at once.
    pub fn pump(&mut self, status: &dyn StatusDisplay, wait: Duration) -> bool {
        match self.effects.next_msg(wait) {
            Ok(Some(msg)) => {
                self.dispatch(msg, status);
                true
            }
            Ok(None) => false,
            Err(err) => {
                engine_warn!("{}; failing {} upload(s)", err, self.state.uploads_in_flight());
                self.dispatch(
                    Msg::EngineStopped {
                        description: err.to_string(),
                    },
                    status,
                );
                false
            }
        }
    }

    /// Pumps until no upload is in flight. With a timeout, gives up when it
    /// expires and returns false.
    pub fn settle(&mut self, status: &dyn StatusDisplay, timeout: Option<Duration>) -> bool {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        while self.state.uploads_in_flight() > 0 {
            let wait = match deadline {
                Some(deadline) => {
                    let left = deadline.saturating_duration_since(Instant::now());
                    if left.is_zero() {
                        engine_warn!(
                            "Gave up waiting with {} upload(s) in flight",
                            self.state.uploads_in_flight()
                        );
                        return false;
                    }
                    left.min(PUMP_INTERVAL)
                }
                None => PUMP_INTERVAL,
            };
            self.pump(status, wait);
        }
        true
    }

    pub fn uploads_in_flight(&self) -> usize {
        self.state.uploads_in_flight()
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    fn dispatch(&mut self, msg: Msg, status: &dyn StatusDisplay) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (mut state, effects) = update(state, msg);
            if state.consume_dirty() {
                let text = state.view().status_text;
                engine_debug!("Status -> {:?}", text);
                status.set_text(&text);
            }
            self.state = state;
            inbox.extend(self.effects.run(effects));
        }
    }
}
