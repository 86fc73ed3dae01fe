// src/error.rs
// =============================================================================
// Error types shared across the library.
//
// - NetworkError: anything that goes wrong talking to the GitHub API
// - FetchFailure: what the file fetcher hands back instead of a file
//
// The fetcher never lets a NetworkError escape on its own. It wraps every
// failure into a FetchFailure so callers can match on the kind and show the
// right message to the user.
//
// Rust concepts:
// - thiserror: Derives std::error::Error and Display from attributes
// - #[from]: Lets the ? operator convert one error type into another
// =============================================================================

use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Errors coming out of the GitHub REST client.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// The request never produced a response (DNS, TLS, connection, ...)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status code
    #[error("HTTP {status} from {url}")]
    Status { status: StatusCode, url: String },

    /// The response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// An endpoint could not be assembled from the base URL
    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),
}

impl NetworkError {
    /// True when GitHub told us the resource doesn't exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, NetworkError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Why a fetch didn't produce a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    /// The reference was incomplete; nothing was sent over the network
    Validation,
    /// The GitHub API call failed
    Network { not_found: bool },
}

/// Failure side of a fetch: a kind plus a human readable diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct FetchFailure {
    #[serde(flatten)]
    pub kind: FailureKind,
    pub message: String,
}

impl FetchFailure {
    pub fn validation(message: impl Into<String>) -> Self {
        FetchFailure {
            kind: FailureKind::Validation,
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind == FailureKind::Validation
    }

    /// Text shown to the user as a transient notification.
    ///
    /// A 404 gets its own wording because GitHub paths are case sensitive
    /// and a wrong case is by far the most common cause.
    pub fn notification(&self) -> String {
        match self.kind {
            FailureKind::Validation => self.message.clone(),
            FailureKind::Network { not_found: true } => {
                "The file was not found. GitHub is case sensitive so check the case of the path you provided.".to_string()
            }
            FailureKind::Network { not_found: false } => format!("error is {}", self.message),
        }
    }
}

impl From<NetworkError> for FetchFailure {
    fn from(err: NetworkError) -> Self {
        FetchFailure {
            kind: FailureKind::Network {
                not_found: err.is_not_found(),
            },
            message: err.to_string(),
        }
    }
}
