// src/source/gitlab.rs
// =============================================================================
// GitLab repository API (gitlab.com or a self-hosted instance).
//
//   GET {base}/api/v4/projects/{owner}%2F{repo}/repository/tree?path={path}
//   GET {base}/api/v4/projects/{owner}%2F{repo}/repository/files/{path}/raw
//
// Tree items are typed "tree" (directory), "blob" (file) or "commit"
// (submodule). The raw endpoint returns the file body as-is, no base64.
//
// A failed listing aborts the run. A failed file fetch only skips that file.
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{Entry, EntryKind, Listing, RawFile, RepoSource, SkipReason};
use crate::error::{IngestError, Result};

const PLATFORM: &str = "gitlab";

#[derive(Debug, Deserialize)]
struct GitlabItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    item_type: String,
}

pub struct GitLabSource {
    client: Client,
    base: Url,
    /// "owner/repo", encoded as one path segment
    project: String,
    token: Option<String>,
}

impl GitLabSource {
    pub fn new(
        client: Client,
        base_url: &str,
        owner: &str,
        repo: &str,
        token: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            client,
            base: super::parse_base_url(base_url)?,
            project: format!("{owner}/{repo}"),
            token,
        })
    }

    // Builds {base}/api/v4/projects/{owner}%2F{repo}/repository/{tail...}
    //
    // Parameters:
    //   tail: extra path segments, each percent-encoded as one segment, so a
    //         file path like "src/lib.rs" becomes "src%2Flib.rs" as the
    //         files API expects
    fn repository_url<'a>(&'a self, tail: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let prefix = ["api", "v4", "projects", self.project.as_str(), "repository"];
        super::with_segments(&self.base, prefix.into_iter().chain(tail))
    }

    fn tree_url(&self, path: &str) -> Result<Url> {
        let mut url = self.repository_url(["tree"])?;
        url.query_pairs_mut().append_pair("path", path);
        Ok(url)
    }

    fn raw_file_url(&self, path: &str) -> Result<Url> {
        self.repository_url(["files", path, "raw"])
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response> {
        debug!(%url, "GitLab request");

        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.header("PRIVATE-TOKEN", token);
        }

        Ok(request.send().await?)
    }
}

#[async_trait]
impl RepoSource for GitLabSource {
    fn platform(&self) -> &'static str {
        PLATFORM
    }

    async fn list(&self, path: &str) -> Result<Listing> {
        let response = self.get(self.tree_url(path)?).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Listing {
                platform: PLATFORM,
                path: path.to_string(),
                status,
            });
        }

        let body: Value = response.json().await?;
        parse_listing(body)
    }

    async fn fetch_raw(&self, path: &str) -> Result<RawFile> {
        let response = self.get(self.raw_file_url(path)?).await?;
        let status = response.status();
        if !status.is_success() {
            // Not fatal: the walker logs a warning and moves on
            return Ok(RawFile::Unavailable(SkipReason::Status(status)));
        }

        // The raw endpoint serves the file as-is, nothing to decode
        let bytes = response.bytes().await?;
        Ok(RawFile::Content(bytes.to_vec()))
    }
}

fn entry_kind(item_type: &str) -> EntryKind {
    match item_type {
        "tree" => EntryKind::Dir,
        _ => EntryKind::File,
    }
}

fn parse_listing(body: Value) -> Result<Listing> {
    if !body.is_array() {
        return Ok(Listing::NotADirectory);
    }

    let items: Vec<GitlabItem> = serde_json::from_value(body)?;
    let entries = items
        .into_iter()
        .map(|item| Entry {
            kind: entry_kind(&item.item_type),
            name: item.name,
            path: item.path,
        })
        .collect();

    Ok(Listing::Entries(entries))
}
