use std::io;
use std::time::Duration;

use engine_logging::engine_info;
use uploader_core::{Effect, Msg, SelectedFile, UploadOutcome};
use uploader_engine::{
    EngineEvent, EngineHandle, EngineStopped, ServerReply, UploadError, UploadFile, UploadSettings,
};

/// Executes core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: UploadSettings) -> io::Result<Self> {
        Ok(Self::with_engine(EngineHandle::new(settings)?))
    }

    pub fn with_engine(engine: EngineHandle) -> Self {
        Self { engine }
    }

    /// Runs effects; returns messages for uploads that could not be started.
    pub fn run(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut rejected = Vec::new();
        for effect in effects {
            match effect {
                Effect::StartUpload { upload_id, file } => {
                    engine_info!(
                        "StartUpload upload_id={} name={} len={}",
                        upload_id,
                        file.name,
                        file.bytes.len()
                    );
                    if let Err(err) = self.engine.enqueue(upload_id, map_file(file)) {
                        rejected.push(Msg::UploadFinished {
                            upload_id,
                            outcome: UploadOutcome::Failed {
                                description: err.to_string(),
                            },
                        });
                    }
                }
            }
        }
        rejected
    }

    /// Waits up to `wait` for the next engine event.
    pub fn next_msg(&self, wait: Duration) -> Result<Option<Msg>, EngineStopped> {
        let event = if wait.is_zero() {
            self.engine.try_recv()
        } else {
            self.engine.recv_timeout(wait)
        }?;
        Ok(event.map(map_event))
    }
}

fn map_file(file: SelectedFile) -> UploadFile {
    UploadFile {
        name: file.name,
        mime_type: file.mime_type,
        bytes: file.bytes,
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::UploadCompleted { upload_id, result } => Msg::UploadFinished {
            upload_id,
            outcome: map_outcome(result),
        },
    }
}

fn map_outcome(result: Result<ServerReply, UploadError>) -> UploadOutcome {
    match result {
        Ok(reply) => UploadOutcome::Replied {
            message: reply.message,
            error: reply.error,
        },
        Err(err) => UploadOutcome::Failed {
            description: err.to_string(),
        },
    }
}
