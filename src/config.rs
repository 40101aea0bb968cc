// src/config.rs
// =============================================================================
// Run configuration: which platform to talk to, the credentials for it, and
// the parameters of a single collection run.
//
// Credentials are read once at start-up (after an optional .env file has been
// loaded) and handed to the sources explicitly. Nothing here is global.
// =============================================================================

use std::fmt;
use std::str::FromStr;

use crate::error::IngestError;

/// Default GitLab instance, used unless --base-url points at a self-hosted one.
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";

/// The hosting platforms we know how to walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Github,
    Gitlab,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Github => "github",
            Platform::Gitlab => "gitlab",
        }
    }
}

impl FromStr for Platform {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "github" => Ok(Platform::Github),
            "gitlab" => Ok(Platform::Gitlab),
            _ => Err(IngestError::InvalidPlatform(s.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API tokens for each platform. Either may be absent, in which case requests
/// are sent unauthenticated.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub github_token: Option<String>,
    pub gitlab_token: Option<String>,
}

impl Credentials {
    // Reads GITHUB_TOKEN and GITLAB_TOKEN from the process environment.
    // Empty or whitespace-only values count as missing.
    pub fn from_env() -> Self {
        Self {
            github_token: read_token("GITHUB_TOKEN"),
            gitlab_token: read_token("GITLAB_TOKEN"),
        }
    }
}

fn read_token(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Everything one collection run needs to know.
#[derive(Debug, Clone)]
pub struct RepoRequest {
    pub platform: Platform,
    pub owner: String,
    pub repo: String,
    /// Directory to start from; empty string means the repository root.
    pub start_path: String,
    /// Only consulted for GitLab.
    pub base_url: String,
    pub skip_folders: Vec<String>,
    pub skip_files: Vec<String>,
}
