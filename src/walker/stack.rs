// src/walker/stack.rs
// =============================================================================
// Depth-first walk over a remote repository tree.
//
// How it works:
// 1. Start with one frame for the start path on a stack
// 2. Pop a frame, mark it visited, list its entries
// 3. Push sub-directories that are neither visited nor skipped
// 4. Fetch allowed files and append them to the output, in listing order
// 5. Repeat until the stack is empty
//
// Frames are pushed in listing order and popped LIFO, so the last directory
// listed is descended first. Output order depends on this.
//
// Only one request is in flight at a time.
// =============================================================================

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::filter::EntryFilter;
use crate::error::Result;
use crate::source::{EntryKind, Listing, RawFile, RepoSource};

/// A directory waiting to be listed.
#[derive(Debug, Clone)]
struct Frame {
    /// Bare directory name (the start path for the first frame)
    path: String,
    /// Path from the repository root, used for listing and visited-tracking
    full_path: String,
}

#[derive(Debug, Default)]
struct WalkStats {
    dirs: usize,
    files: usize,
    skipped: usize,
}

// Walks a remote repository and collects the contents of allowed files
//
// Parameters:
//   source: the platform to list directories and fetch files from
//   start_path: directory to start at ("" = repository root)
//   filter: skip lists and the allowed-extension check
//
// Returns: Result<String>
//   Success: every kept file as "File: <path>\n<content>\n\n", in walk order
//   Error: a listing failed, or a platform reported a fatal fetch error.
//          Nothing collected so far is returned in that case.
pub async fn walk(source: &dyn RepoSource, start_path: &str, filter: &EntryFilter) -> Result<String> {
    let mut stack = vec![Frame {
        path: start_path.to_string(),
        full_path: start_path.to_string(),
    }];
    let mut visited: HashSet<String> = HashSet::new();
    let mut collected = String::new();
    let mut stats = WalkStats::default();

    while let Some(frame) = stack.pop() {
        // The same directory can be pushed twice before it is first popped
        if !visited.insert(frame.full_path.clone()) {
            continue;
        }
        stats.dirs += 1;

        debug!(platform = source.platform(), dir = %frame.path, full_path = %frame.full_path, "listing");

        let entries = match source.list(&frame.full_path).await? {
            Listing::Entries(entries) => entries,
            Listing::NotADirectory => {
                debug!(full_path = %frame.full_path, "not a directory listing, skipping");
                continue;
            }
        };

        for entry in entries {
            match entry.kind {
                EntryKind::Dir => {
                    if !visited.contains(&entry.path) && filter.allows_dir(&entry.name) {
                        stack.push(Frame {
                            path: entry.name,
                            full_path: entry.path,
                        });
                    }
                }
                EntryKind::File => {
                    if !filter.allows_file(&entry.name) {
                        continue;
                    }

                    match source.fetch_raw(&entry.path).await? {
                        RawFile::Content(bytes) => {
                            append_record(&mut collected, &entry.path, &bytes);
                            stats.files += 1;
                        }
                        RawFile::Unavailable(reason) => {
                            // Recoverable: leave the file out and keep walking
                            warn!(
                                "Skipping file '{}' from {}: {}",
                                entry.path,
                                source.platform(),
                                reason
                            );
                            stats.skipped += 1;
                        }
                    }
                }
            }
        }
    }

    info!(
        dirs = stats.dirs,
        files = stats.files,
        skipped = stats.skipped,
        "walk finished"
    );

    Ok(collected)
}

/// Appends one file record. Invalid UTF-8 is replaced with U+FFFD.
fn append_record(collected: &mut String, path: &str, bytes: &[u8]) {
    let text = String::from_utf8_lossy(bytes);
    collected.push_str("File: ");
    collected.push_str(path);
    collected.push('\n');
    collected.push_str(&text);
    collected.push_str("\n\n");
}
