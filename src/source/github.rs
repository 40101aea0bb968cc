// src/source/github.rs
// =============================================================================
// GitHub contents API.
//
//   GET {api}/repos/{owner}/{repo}/contents/{path}
//
// For a directory the API returns a JSON array of entries. For a file it
// returns one object whose `content` field holds the body, base64-encoded and
// wrapped at 60 columns.
//
// Both listing and file failures are fatal on GitHub.
// =============================================================================

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{Entry, EntryKind, Listing, RawFile, RepoSource, SkipReason};
use crate::error::{IngestError, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const PLATFORM: &str = "github";

/// One element of a directory listing.
#[derive(Debug, Deserialize)]
struct GithubItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    item_type: String,
}

/// The single-file response. `content` is missing for submodules, and empty
/// with encoding "none" for files over 1 MB.
#[derive(Debug, Deserialize)]
struct GithubFile {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

pub struct GitHubSource {
    client: Client,
    api_base: Url,
    owner: String,
    repo: String,
    token: Option<String>,
}

impl GitHubSource {
    pub fn new(client: Client, owner: &str, repo: &str, token: Option<String>) -> Result<Self> {
        Self::with_api_url(client, DEFAULT_API_URL, owner, repo, token)
    }

    /// Points the source at a different API root (GitHub Enterprise).
    pub fn with_api_url(
        client: Client,
        api_url: &str,
        owner: &str,
        repo: &str,
        token: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            client,
            api_base: super::parse_base_url(api_url)?,
            owner: owner.to_string(),
            repo: repo.to_string(),
            token,
        })
    }

    fn contents_url(&self, path: &str) -> Result<Url> {
        let prefix = ["repos", self.owner.as_str(), self.repo.as_str(), "contents"];
        let segments = prefix
            .into_iter()
            .chain(path.split('/').filter(|segment| !segment.is_empty()));
        super::with_segments(&self.api_base, segments)
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response> {
        let url = self.contents_url(path)?;
        debug!(%url, "GitHub request");

        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        Ok(request.send().await?)
    }
}

#[async_trait]
impl RepoSource for GitHubSource {
    fn platform(&self) -> &'static str {
        PLATFORM
    }

    async fn list(&self, path: &str) -> Result<Listing> {
        let response = self.get(path).await?;
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
        let response = self.get(path).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::FileFetch {
                platform: PLATFORM,
                path: path.to_string(),
                status,
            });
        }

        // A 2xx here is always a single JSON object for the file
        let file: GithubFile = response.json().await?;
        decode_file(path, file)
    }
}

fn entry_kind(item_type: &str) -> EntryKind {
    match item_type {
        "dir" => EntryKind::Dir,
        _ => EntryKind::File,
    }
}

// Turns a contents response into a Listing
//
// GitHub answers a directory path with an array and a file path with a
// single object. Anything that is not an array is NotADirectory, which the
// walker skips without an error.
fn parse_listing(body: Value) -> Result<Listing> {
    if !body.is_array() {
        return Ok(Listing::NotADirectory);
    }

    let items: Vec<GithubItem> = serde_json::from_value(body)?;
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

// Decodes the base64 body of a single-file response
//
// Parameters:
//   path: repository path of the file (only used in the error)
//   file: the deserialized contents API object
//
// Returns:
//   RawFile::Content with the decoded bytes, or
//   RawFile::Unavailable(NoInlineContent) when GitHub sent no body
//   (encoding "none" for files over 1 MB, no content at all for submodules)
fn decode_file(path: &str, file: GithubFile) -> Result<RawFile> {
    let content = match (file.content, file.encoding.as_deref()) {
        (Some(content), Some("base64") | None) => content,
        _ => return Ok(RawFile::Unavailable(SkipReason::NoInlineContent)),
    };

    // GitHub wraps the base64 payload with newlines
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = BASE64.decode(compact).map_err(|source| IngestError::Decode {
        path: path.to_string(),
        source,
    })?;

    Ok(RawFile::Content(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::testing::TestServer;
    use reqwest::StatusCode;
    use serde_json::json;

    fn source() -> GitHubSource {
        GitHubSource::new(Client::new(), "acme", "widgets", None).unwrap()
    }

    #[test]
    fn test_contents_url_for_root() {
        let url = source().contents_url("").unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/repos/acme/widgets/contents");
    }

    #[test]
    fn test_contents_url_encodes_segments() {
        let url = source().contents_url("docs/my notes/a#b.md").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/acme/widgets/contents/docs/my%20notes/a%23b.md"
        );
    }

    #[test]
    fn test_enterprise_api_url() {
        let source = GitHubSource::with_api_url(
            Client::new(),
            "https://ghe.example.com/api/v3/",
            "acme",
            "widgets",
            None,
        )
        .unwrap();
        let url = source.contents_url("src").unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/acme/widgets/contents/src"
        );
    }

    #[test]
    fn test_parse_listing_maps_dir_and_file() {
        let body = json!([
            {"name": "src", "path": "src", "type": "dir", "sha": "abc"},
            {"name": "README.md", "path": "README.md", "type": "file", "size": 12},
        ]);

        let listing = parse_listing(body).unwrap();
        assert_eq!(
            listing,
            Listing::Entries(vec![Entry::dir("src", "src"), Entry::file("README.md", "README.md")])
        );
    }

    #[test]
    fn test_parse_listing_single_object_is_not_a_directory() {
        let body = json!({"name": "README.md", "path": "README.md", "type": "file"});
        assert_eq!(parse_listing(body).unwrap(), Listing::NotADirectory);
    }

    #[test]
    fn test_decode_file_strips_line_wrapping() {
        let file = GithubFile {
            content: Some("aGVsbG8s\nIHdvcmxk\n".to_string()),
            encoding: Some("base64".to_string()),
        };
        let raw = decode_file("hello.txt", file).unwrap();
        assert_eq!(raw, RawFile::Content(b"hello, world".to_vec()));
    }

    #[test]
    fn test_decode_file_too_large_is_unavailable() {
        let file = GithubFile {
            content: Some(String::new()),
            encoding: Some("none".to_string()),
        };
        let raw = decode_file("big.sql", file).unwrap();
        assert_eq!(raw, RawFile::Unavailable(SkipReason::NoInlineContent));
    }

    #[test]
    fn test_decode_file_rejects_garbage() {
        let file = GithubFile {
            content: Some("not base64!!".to_string()),
            encoding: Some("base64".to_string()),
        };
        let err = decode_file("x.py", file).unwrap_err();
        assert!(matches!(err, IngestError::Decode { ref path, .. } if path == "x.py"));
    }

    // Source pointed at a local server instead of api.github.com
    fn local_source(server: &TestServer, token: Option<&str>) -> GitHubSource {
        GitHubSource::with_api_url(
            Client::new(),
            &server.base_url,
            "acme",
            "widgets",
            token.map(str::to_string),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_sends_accept_and_bearer_headers() {
        let server = TestServer::new()
            .json(
                "/repos/acme/widgets/contents",
                200,
                json!([{"name": "src", "path": "src", "type": "dir"}]),
            )
            .start()
            .await;

        let listing = local_source(&server, Some("ghp_token")).list("").await.unwrap();

        assert_eq!(listing, Listing::Entries(vec![Entry::dir("src", "src")]));
        let request = &server.requests()[0];
        assert_eq!(request.headers["authorization"], "Bearer ghp_token");
        assert_eq!(request.headers["accept"], "application/vnd.github+json");
    }

    #[tokio::test]
    async fn test_list_without_token_sends_no_authorization() {
        let server = TestServer::new()
            .json("/repos/acme/widgets/contents/docs", 200, json!([]))
            .start()
            .await;

        local_source(&server, None).list("docs").await.unwrap();

        assert!(!server.requests()[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_list_non_2xx_is_fatal() {
        let server = TestServer::new()
            .json("/repos/acme/widgets/contents", 403, json!({"message": "rate limited"}))
            .start()
            .await;

        let err = local_source(&server, None).list("").await.unwrap_err();

        assert!(matches!(
            err,
            IngestError::Listing { status, .. } if status == StatusCode::FORBIDDEN
        ));
    }

    #[tokio::test]
    async fn test_fetch_raw_decodes_base64_body() {
        let server = TestServer::new()
            .json(
                "/repos/acme/widgets/contents/src/main.c",
                200,
                json!({"name": "main.c", "encoding": "base64", "content": "aW50IG1haW4o\nKSB7fQ==\n"}),
            )
            .start()
            .await;

        let raw = local_source(&server, None).fetch_raw("src/main.c").await.unwrap();

        assert_eq!(raw, RawFile::Content(b"int main() {}".to_vec()));
    }

    #[tokio::test]
    async fn test_fetch_raw_non_2xx_is_fatal() {
        let server = TestServer::new().start().await;

        let err = local_source(&server, None).fetch_raw("missing.py").await.unwrap_err();

        assert!(matches!(
            err,
            IngestError::FileFetch { ref path, status, .. }
                if path == "missing.py" && status == StatusCode::NOT_FOUND
        ));
    }

    #[tokio::test]
    async fn test_fetch_raw_large_file_is_skipped() {
        let server = TestServer::new()
            .json(
                "/repos/acme/widgets/contents/dump.sql",
                200,
                json!({"name": "dump.sql", "encoding": "none", "content": ""}),
            )
            .start()
            .await;

        let raw = local_source(&server, None).fetch_raw("dump.sql").await.unwrap();

        assert_eq!(raw, RawFile::Unavailable(SkipReason::NoInlineContent));
    }
}
