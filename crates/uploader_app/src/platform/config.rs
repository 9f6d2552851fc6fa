//! Optional RON configuration for the uploader binary.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uploader_engine::{UploadSettings, UPLOAD_PATH};
use url::Url;

use super::logging::LogDestination;

/// Looked up in the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "uploader.ron";

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid server url {url:?}: {source}")]
    ServerUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server root; the upload path is resolved against it.
    pub server_url: String,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            connect_timeout_secs: None,
            request_timeout_secs: None,
            log_destination: LogDestination::Terminal,
        }
    }
}

impl AppConfig {
    /// Loads `path`, or `uploader.ron` from the working directory if present.
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if !required && err.kind() == io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        ron::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Applies command-line values on top of the file's.
    pub fn apply_overrides(&mut self, server_url: Option<String>, request_timeout_secs: Option<u64>) {
        if let Some(server_url) = server_url {
            self.server_url = server_url;
        }
        if let Some(timeout) = request_timeout_secs {
            self.request_timeout_secs = Some(timeout);
        }
    }

    /// Absolute URL of the upload endpoint on the configured server.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.server_url)
            .and_then(|base| base.join(UPLOAD_PATH))
            .map_err(|source| ConfigError::ServerUrl {
                url: self.server_url.clone(),
                source,
            })
    }

    pub fn upload_settings(&self) -> Result<UploadSettings, ConfigError> {
        Ok(UploadSettings {
            endpoint: self.endpoint()?.to_string(),
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        })
    }
}
