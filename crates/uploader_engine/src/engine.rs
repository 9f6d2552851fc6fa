use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};

use crate::upload::{ReqwestUploader, UploadSettings, Uploader};
use crate::{EngineEvent, EngineStopped, FailureKind, UploadError, UploadFile, UploadId};

enum EngineCommand {
    Upload { upload_id: UploadId, file: UploadFile },
}

/// Runs uploads on a background tokio runtime and reports completions.
///
/// Uploads are independent: they are neither de-duplicated nor ordered.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: UploadSettings) -> io::Result<Self> {
        Self::with_uploader(Arc::new(ReqwestUploader::new(settings)))
    }

    pub fn with_uploader(uploader: Arc<dyn Uploader>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::Builder::new()
            .name("uploader-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let uploader = uploader.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(handle_command(uploader, command, event_tx));
                }
                engine_info!("Engine command channel closed; shutting down");
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn enqueue(&self, upload_id: UploadId, file: UploadFile) -> Result<(), EngineStopped> {
        self.cmd_tx
            .send(EngineCommand::Upload { upload_id, file })
            .map_err(|_| {
                engine_warn!("Engine is gone; upload {} dropped", upload_id);
                EngineStopped
            })
    }

    pub fn try_recv(&self) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => Err(EngineStopped),
        }
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineStopped),
        }
    }
}

async fn handle_command(
    uploader: Arc<dyn Uploader>,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Upload { upload_id, file } => {
            // A panicking upload still has to report back, or the id stays in flight.
            let task = tokio::spawn(async move { uploader.upload(upload_id, &file).await });
            let result = task.await.unwrap_or_else(|err| {
                Err(UploadError::new(FailureKind::Aborted, err.to_string()))
            });
            if let Err(err) = &result {
                engine_warn!("Upload {} failed ({}): {}", upload_id, err.kind, err);
            }
            let _ = event_tx.send(EngineEvent::UploadCompleted { upload_id, result });
        }
    }
}
