use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use reqwest::multipart::{Form, Part};

use crate::{parse_reply, FailureKind, ServerReply, UploadError, UploadFile, UploadId};

/// Path the form is posted to, relative to the server root.
pub const UPLOAD_PATH: &str = "/upload_syllabus";

/// Name of the single multipart part.
pub const FILE_FIELD: &str = "file";

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone)]
pub struct UploadSettings {
    /// Absolute URL of the upload endpoint.
    pub endpoint: String,
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
}

impl UploadSettings {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            connect_timeout: None,
            request_timeout: None,
        }
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self::new(format!("http://127.0.0.1:8000{UPLOAD_PATH}"))
    }
}

#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(
        &self,
        upload_id: UploadId,
        file: &UploadFile,
    ) -> Result<ServerReply, UploadError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestUploader {
    settings: UploadSettings,
}

impl ReqwestUploader {
    pub fn new(settings: UploadSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, UploadError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = self.settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| UploadError::new(FailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Uploader for ReqwestUploader {
    async fn upload(
        &self,
        upload_id: UploadId,
        file: &UploadFile,
    ) -> Result<ServerReply, UploadError> {
        let url = reqwest::Url::parse(&self.settings.endpoint)
            .map_err(|err| UploadError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = self.build_client()?;

        engine_info!(
            "Upload {} sending name={} len={} to {}",
            upload_id,
            file.name,
            file.bytes.len(),
            url
        );

        let form = Form::new().part(FILE_FIELD, file_part(file));
        let response = client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        // Status is informational only; the body decides what the user sees.
        let status = response.status();
        engine_debug!("Upload {} answered with status {}", upload_id, status);

        let body = response.bytes().await.map_err(|err| {
            if err.is_timeout() {
                UploadError::new(FailureKind::Timeout, err.to_string())
            } else {
                UploadError::new(FailureKind::Body, err.to_string())
            }
        })?;

        parse_reply(&body)
    }
}

fn file_part(file: &UploadFile) -> Part {
    let part = || Part::bytes(file.bytes.clone()).file_name(file.name.clone());
    let mime = file.mime_type.as_deref().unwrap_or(FALLBACK_MIME);
    part().mime_str(mime).unwrap_or_else(|err| {
        engine_warn!("Ignoring mime type {:?} for {}: {}", mime, file.name, err);
        part()
    })
}

fn map_reqwest_error(err: reqwest::Error) -> UploadError {
    if err.is_timeout() {
        return UploadError::new(FailureKind::Timeout, err.to_string());
    }
    UploadError::new(FailureKind::Network, err.to_string())
}
