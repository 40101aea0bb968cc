// src/repo_url.rs
// =============================================================================
// Extracts (owner, repo) from a repository URL.
//
// Supported formats:
//   - https://github.com/owner/repo
//   - https://gitlab.com/owner/repo
//   - https://git.example.org/owner/repo      (self-hosted GitLab)
//
// The GitHub pattern is tried first. The GitLab pattern accepts any host
// followed by exactly two path segments, so subgroup URLs
// (gitlab.com/group/subgroup/repo) are rejected.
// =============================================================================

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{IngestError, Result};

static GITHUB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://github\.com/([^/]+)/([^/]+)/?$").expect("valid regex")
});

static GITLAB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:gitlab\.|)([^/]+)/([^/]+)/([^/]+)/?$").expect("valid regex")
});

// Parses a repository URL into an (owner, repo) pair
//
// GitHub URLs are tried first, then the generic GitLab shape. A trailing
// ".git" on the repository name is dropped so clone URLs work too.
//
// Parameters:
//   url: the URL as typed on the command line (surrounding whitespace ignored)
//
// Returns:
//   Ok((owner, repo)), or InvalidRepositoryUrl for anything else
//
// Example:
//   "https://github.com/rust-lang/rust" -> ("rust-lang", "rust")
pub fn parse_repo_url(url: &str) -> Result<(String, String)> {
    let url = url.trim();

    let (owner, repo) = if let Some(caps) = GITHUB_URL.captures(url) {
        (caps[1].to_string(), caps[2].to_string())
    } else if let Some(caps) = GITLAB_URL.captures(url) {
        // caps[1] is the host; only the last two segments identify the project
        (caps[2].to_string(), caps[3].to_string())
    } else {
        return Err(IngestError::InvalidRepositoryUrl(url.to_string()));
    };

    let repo = repo.strip_suffix(".git").unwrap_or(&repo).to_string();
    if repo.is_empty() {
        return Err(IngestError::InvalidRepositoryUrl(url.to_string()));
    }

    Ok((owner, repo))
}
