// src/walker/mod.rs
// =============================================================================
// This module walks a remote repository and collects file contents.
//
// Submodules:
// - stack: the depth-first traversal loop
// - filter: allowed extensions and skip lists
// =============================================================================

mod filter;
mod stack;

pub use filter::EntryFilter;
pub use stack::walk;

use tracing::info;

use crate::config::{Credentials, RepoRequest};
use crate::error::Result;
use crate::source;

// Builds the platform source for `request` and walks it from the start path
//
// Parameters:
//   request: what to walk and which names to skip
//   credentials: API tokens, injected here rather than read globally
//
// Returns:
//   The concatenated "File: <path>" records in traversal order
pub async fn collect_repository(request: &RepoRequest, credentials: &Credentials) -> Result<String> {
    let source = source::for_request(request, credentials)?;
    let filter = EntryFilter::new(&request.skip_folders, &request.skip_files);

    info!(
        platform = %request.platform,
        owner = %request.owner,
        repo = %request.repo,
        start_path = %request.start_path,
        "walking repository"
    );

    walk(source.as_ref(), &request.start_path, &filter).await
}
