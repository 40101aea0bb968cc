// src/source/mod.rs
// =============================================================================
// This module is the boundary between the walker and the hosting platforms.
//
// Each platform provides two capabilities:
// - list(path):      the entries of one directory
// - fetch_raw(path): the bytes of one file
//
// GitHub and GitLab describe entries differently ("dir" vs "tree"), so each
// source maps its own vocabulary onto EntryKind before the walker sees it.
// =============================================================================

mod github;
mod gitlab;
#[cfg(test)]
pub(crate) mod testing;

use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::config::{Credentials, Platform, RepoRequest};
use crate::error::{IngestError, Result};

pub use github::GitHubSource;
pub use gitlab::GitLabSource;

/// Sent on every request; GitHub rejects requests without a User-Agent.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Whether a listing entry is a directory to descend into or a file to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
}

/// One item of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Bare name, e.g. "main.rs"
    pub name: String,
    /// Path from the repository root, e.g. "src/main.rs"
    pub path: String,
    pub kind: EntryKind,
}

#[cfg(test)]
impl Entry {
    pub fn dir(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self { name: name.into(), path: path.into(), kind: EntryKind::Dir }
    }

    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self { name: name.into(), path: path.into(), kind: EntryKind::File }
    }
}

/// The result of listing a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Entries(Vec<Entry>),
    /// The API answered with something other than a sequence of entries,
    /// e.g. GitHub returning a single file object for a file path.
    NotADirectory,
}

// The result of fetching a file.
//
// Content holds the real file bytes (already base64-decoded for GitHub).
// Unavailable means the platform could not serve the file and the walker
// should warn and move on instead of aborting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawFile {
    Content(Vec<u8>),
    Unavailable(SkipReason),
}

// Why a file was skipped, shown in the warning line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The raw endpoint answered with a non-2xx status
    Status(StatusCode),
    /// The API answered but carried no inline body
    /// (GitHub: files over 1 MB, submodules)
    NoInlineContent,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Status(status) => write!(f, "HTTP {}", status),
            SkipReason::NoInlineContent => {
                f.write_str("no inline content (file too large or a submodule)")
            }
        }
    }
}

/// Directory-listing and file-fetch capabilities of one hosted repository.
#[async_trait]
pub trait RepoSource: Send + Sync {
    /// Short platform name used in log lines.
    fn platform(&self) -> &'static str;

    /// Lists the directory at `path` ("" is the repository root).
    async fn list(&self, path: &str) -> Result<Listing>;

    /// Fetches the raw bytes of the file at `path`.
    async fn fetch_raw(&self, path: &str) -> Result<RawFile>;
}

// Builds the source for the request's platform
//
// Parameters:
//   request: platform, owner/repo and (for GitLab) the instance base URL
//   credentials: tokens read once at start-up; only the matching one is used
//
// Returns:
//   A boxed RepoSource sharing one HTTP client, or a Url error when the
//   base URL cannot be parsed
pub fn for_request(request: &RepoRequest, credentials: &Credentials) -> Result<Box<dyn RepoSource>> {
    let client = http_client()?;

    let source: Box<dyn RepoSource> = match request.platform {
        Platform::Github => Box::new(GitHubSource::new(
            client,
            &request.owner,
            &request.repo,
            credentials.github_token.clone(),
        )?),
        Platform::Gitlab => Box::new(GitLabSource::new(
            client,
            &request.base_url,
            &request.owner,
            &request.repo,
            credentials.gitlab_token.clone(),
        )?),
    };

    Ok(source)
}

// Builds the shared HTTP client.
//
// No request timeout is set: a slow response is waited for, as the
// underlying client does by default.
fn http_client() -> Result<Client> {
    let client = Client::builder().user_agent(USER_AGENT).build()?;
    Ok(client)
}

/// Parses an API root, rejecting URLs that cannot take path segments
/// (e.g. "mailto:").
fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() {
        return Err(IngestError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase));
    }
    Ok(url)
}

/// Appends percent-encoded path segments to `base`. A segment containing '/'
/// is encoded as a single segment ("group/repo" becomes "group%2Frepo").
fn with_segments<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
    let mut joined = base.clone();
    joined
        .path_segments_mut()
        .map_err(|_| IngestError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .extend(segments);
    Ok(joined)
}
