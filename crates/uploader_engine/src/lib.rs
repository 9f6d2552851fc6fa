//! Uploader engine: multipart upload, reply decoding and effect execution.
mod engine;
mod reply;
mod types;
mod upload;

pub use engine::EngineHandle;
pub use reply::{parse_reply, ServerReply};
pub use types::{EngineEvent, EngineStopped, FailureKind, UploadError, UploadFile, UploadId};
pub use upload::{ReqwestUploader, UploadSettings, Uploader, FILE_FIELD, UPLOAD_PATH};
