//! Error types for sprintboard-core

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning API JSON into domain records
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Expected a list of {entity} records")]
    NotAList { entity: &'static str },

    #[error("Invalid {entity} record at index {index}: {message}")]
    InvalidRecord {
        entity: &'static str,
        index: usize,
        message: String,
    },

    #[error("Response is not valid JSON: {0}")]
    InvalidJson(String),
}

/// Errors that can occur while talking to the backend
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Failed to encode request body: {0}")]
    Encode(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ApiError {
    /// HTTP status for errors that came back from the server
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to write config file {path:?}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("Failed to determine home directory")]
    HomeDirMissing,

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
