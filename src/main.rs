// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Load .env, set up logging, parse command-line arguments
// 2. Validate the platform and repository URL (before any network call)
// 3. Walk the repository and collect file contents
// 4. Write <repo>_contents.txt
// 5. Exit with proper code (0 = success, 1 = error)
// =============================================================================

mod cli;
mod config;
mod error;
mod prompt;
mod repo_url;
mod source;
mod walker;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Credentials;

// Sets up the tokio runtime and turns the outcome of run() into an exit code
#[tokio::main]
async fn main() {
    // Any error that reaches here already carries its context chain;
    // {:#} prints it on one line
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

// The application logic
//
// Steps:
// 1. Load .env and start logging
// 2. Parse arguments and turn them into a RepoRequest (no network yet)
// 3. Walk the repository and collect every allowed file
// 4. Write the artifact, with the instruction preamble if asked for
//
// Returns:
//   Ok(()) once the file is written
//   Err for a bad URL/platform, a fatal API failure or a write failure
async fn run() -> Result<()> {
    // A missing .env is fine; tokens may come from the real environment
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let credentials = Credentials::from_env();
    let request = cli.to_request()?;

    println!(
        "🔍 Collecting {}/{} from {}",
        request.owner, request.repo, request.platform
    );

    let contents = walker::collect_repository(&request, &credentials).await?;
    let output = prompt::assemble(cli.instructions, &contents);

    let path = write_output(&cli.output_dir, &request.repo, &output).await?;
    println!("Repository contents saved to '{}'.", path.display());

    Ok(())
}

// Logs go to stderr so they never mix with the progress lines on stdout.
// RUST_LOG overrides the default "warn" level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// Writes the assembled artifact
//
// Parameters:
//   dir: output directory (must already exist)
//   repo: repository name, used for the "{repo}_contents.txt" file name
//   output: the full text to write
//
// Returns:
//   The path that was written
async fn write_output(dir: &Path, repo: &str, output: &str) -> Result<PathBuf> {
    let path = dir.join(prompt::output_filename(repo));
    tokio::fs::write(&path, output)
        .await
        .with_context(|| format!("Failed to write '{}'", path.display()))?;
    Ok(path)
}
