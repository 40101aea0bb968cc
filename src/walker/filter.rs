// src/walker/filter.rs
// =============================================================================
// Decides which directories are descended and which files are read.
//
// - Files must end with one of ALLOWED_EXTENSIONS (plain, case-sensitive
//   suffix match on the bare name)
// - Skip lists match the bare name exactly, never a path or a glob
// =============================================================================

use std::collections::HashSet;

/// File suffixes whose contents end up in the output.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    ".js", ".jsx", ".ts", ".tsx", ".py", ".md", ".mdx", ".html", ".csv", ".ini", ".cfg", ".conf",
    ".log", ".sh", ".bat", ".sql", ".php", ".java", ".rb", ".c", ".cpp", ".h", ".hpp", ".cs",
    ".swift", ".pl", ".cgi", ".asm", ".m", ".mm", ".r", ".go", ".lua", ".perl", ".coffee",
    ".dart", ".groovy", ".kt", ".gradle", ".scala", ".ejs", ".jsp", ".pug", ".erb", ".hbs",
    ".twig", ".vue", ".clj", ".cljs", ".cljc", ".f", ".f90", ".f95", ".f03", ".f08",
];

#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    skip_folders: HashSet<String>,
    skip_files: HashSet<String>,
}

impl EntryFilter {
    /// Builds a filter from user-supplied names. Names are trimmed and empty
    /// ones dropped, so "a, b," behaves like "a,b".
    pub fn new<I, J, S, T>(skip_folders: I, skip_files: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            skip_folders: clean_names(skip_folders),
            skip_files: clean_names(skip_files),
        }
    }

    /// True if a directory with this bare name may be expanded.
    pub fn allows_dir(&self, name: &str) -> bool {
        !self.skip_folders.contains(name)
    }

    /// True if a file with this bare name should be fetched.
    pub fn allows_file(&self, name: &str) -> bool {
        has_allowed_extension(name) && !self.skip_files.contains(name)
    }
}

pub fn has_allowed_extension(name: &str) -> bool {
    ALLOWED_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

fn clean_names<I, S>(names: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| name.as_ref().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}
