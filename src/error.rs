// src/error.rs
// =============================================================================
// Error types shared by the walker, the sources and the URL parser.
//
// Fatal errors travel up to main() and abort the run. The one recoverable
// failure (a GitLab file that cannot be fetched) is not an error at all: it is
// reported as RawFile::Unavailable so the walker can warn and keep going.
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can stop a run.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The platform string was neither "github" nor "gitlab".
    #[error("Invalid platform specified: '{0}' (expected 'github' or 'gitlab')")]
    InvalidPlatform(String),

    /// The repository URL matched neither the GitHub nor the GitLab pattern.
    #[error("Invalid repository URL: '{0}'")]
    InvalidRepositoryUrl(String),

    /// A directory listing came back with a non-2xx status.
    #[error("Failed to list '{path}' on {platform}: HTTP {status}")]
    Listing {
        platform: &'static str,
        path: String,
        status: StatusCode,
    },

    /// A file fetch came back with a non-2xx status on a platform where that
    /// is fatal.
    #[error("Failed to fetch file '{path}' on {platform}: HTTP {status}")]
    FileFetch {
        platform: &'static str,
        path: String,
        status: StatusCode,
    },

    #[error("Invalid base64 content in '{path}': {source}")]
    Decode {
        path: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("Invalid base URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed API response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IngestError>;
