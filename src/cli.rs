// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Usage:
//   repo-ingest <REPO_URL> [SPECIFIC_PATH] [OPTIONS]
//
// List options (--skip-folders, --skip-files) accept comma-separated values
// and may be repeated: `-s node_modules,dist -s build`.
// =============================================================================

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Platform, RepoRequest, DEFAULT_GITLAB_URL};
use crate::error::Result;
use crate::repo_url::parse_repo_url;

#[derive(Parser, Debug)]
#[command(
    name = "repo-ingest",
    version,
    about = "Flatten a GitHub or GitLab repository into a single text file",
    long_about = "repo-ingest walks a remote repository through the GitHub or GitLab API and \
                  concatenates every source file into <repo>_contents.txt, optionally prefixed \
                  with an analysis prompt. Handy for feeding a codebase to a language model."
)]
pub struct Cli {
    /// Repository URL (e.g., https://github.com/user/repo)
    pub repo_url: String,

    /// Directory inside the repository to start from (default: repository root)
    pub specific_path: Option<String>,

    /// Hosting platform: github or gitlab
    #[arg(short, long, default_value = "github")]
    pub platform: String,

    /// Include the analysis prompt at the top of the output file
    #[arg(short, long)]
    pub instructions: bool,

    /// GitLab base URL, for self-hosted instances
    #[arg(short, long, default_value = DEFAULT_GITLAB_URL)]
    pub base_url: String,

    /// Folder names to skip during traversal (comma-separated)
    #[arg(short = 's', long, value_delimiter = ',')]
    pub skip_folders: Vec<String>,

    /// File names to skip during traversal (comma-separated)
    #[arg(short = 'f', long, value_delimiter = ',')]
    pub skip_files: Vec<String>,

    /// Directory to write <repo>_contents.txt into
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,
}

impl Cli {
    // Validates the platform and repository URL and bundles the run parameters
    //
    // Returns:
    //   A RepoRequest ready for the walker, or InvalidPlatform /
    //   InvalidRepositoryUrl. Nothing here touches the network.
    pub fn to_request(&self) -> Result<RepoRequest> {
        let platform: Platform = self.platform.parse()?;
        let (owner, repo) = parse_repo_url(&self.repo_url)?;

        Ok(RepoRequest {
            platform,
            owner,
            repo,
            start_path: self.specific_path.clone().unwrap_or_default(),
            base_url: self.base_url.clone(),
            skip_folders: self.skip_folders.clone(),
            skip_files: self.skip_files.clone(),
        })
    }
}
