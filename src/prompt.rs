// src/prompt.rs
// =============================================================================
// The optional instruction preamble and assembly of the final artifact.
// =============================================================================

/// Prepended to the output when --instructions is given.
pub const INSTRUCTIONS: &str = "
Prompt: Analyze the repository to understand its structure, purpose, and functionality. Follow these steps to study the codebase:

1. Read the README file to gain an overview of the project, its goals, and any setup instructions.

2. Examine the repository structure to understand how the files and directories are organized.

3. Identify the main entry point of the application (e.g., main.py, app.py, index.js) and start analyzing the code flow from there.

4. Study the dependencies and libraries used in the project to understand the external tools and frameworks being utilized.

5. Analyze the core functionality of the project by examining the key modules, classes, and functions.

6. Look for any configuration files (e.g., config.py, .env) to understand how the project is configured and what settings are available.

7. Investigate any tests or test directories to see how the project ensures code quality and handles different scenarios.

8. Review any documentation or inline comments to gather insights into the codebase and its intended behavior.

9. Identify any potential areas for improvement, optimization, or further exploration based on your analysis.

10. Provide a summary of your findings, including the project's purpose, key features, and any notable observations or recommendations.

Use the files and contents provided below to complete this analysis:
";

// Name of the file the artifact is written to
//
// Example:
//   "widgets" -> "widgets_contents.txt"
pub fn output_filename(repo: &str) -> String {
    format!("{}_contents.txt", repo)
}

// Joins the optional preamble and the collected records
//
// Parameters:
//   include_instructions: whether to prepend INSTRUCTIONS
//   contents: the "File: ..." records produced by the walker
//
// Returns:
//   The preamble immediately followed by the records, with nothing in between
pub fn assemble(include_instructions: bool, contents: &str) -> String {
    let preamble = if include_instructions { INSTRUCTIONS } else { "" };

    let mut output = String::with_capacity(preamble.len() + contents.len());
    output.push_str(preamble);
    output.push_str(contents);
    output
}
