use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use walkdir::WalkDir;

use crate::models::Source;
use crate::utils::{get_claude_projects_dir, get_codex_session_dirs};

/// Maximum number of session files collected in one run (prevents resource exhaustion)
const MAX_SESSION_FILES: usize = 100_000;

const SESSION_EXTENSION: &str = "jsonl";

/// Session logs in a Claude Code projects directory: `<projects>/<project>/*.jsonl`
///
/// Returns an empty Vec if the directory doesn't exist (not an error).
pub fn discover_claude_code_sessions(projects_dir: &Path) -> Result<Vec<PathBuf>> {
    walk_sessions(projects_dir, Some(2))
}

/// Session logs under any of the Codex session roots, at any depth
pub fn discover_codex_sessions(roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for root in roots {
        files.extend(walk_sessions(root, None)?);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Session logs for a user-supplied input: the file itself, or every log below a directory
pub fn collect_session_files(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        bail!("Input not found: {}", input.display());
    }
    walk_sessions(input, None)
}

/// Session logs in the tool's default location under the home directory
pub fn default_session_files(source: Source) -> Result<Vec<PathBuf>> {
    match source {
        Source::ClaudeCode => discover_claude_code_sessions(&get_claude_projects_dir()?),
        Source::Codex => discover_codex_sessions(&get_codex_session_dirs()?),
        Source::ChatGpt | Source::ClaudeWeb => {
            bail!("{} has no default location; pass --input", source)
        }
    }
}

/// `.jsonl` files under `root`, sorted. `depth` pins the exact depth when given.
///
/// Symlinks are not followed and unreadable entries are skipped with a warning.
fn walk_sessions(root: &Path, depth: Option<usize>) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut walker = WalkDir::new(root).follow_links(false);
    if let Some(depth) = depth {
        walker = walker.min_depth(depth).max_depth(depth);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        let is_log = entry.path().extension().is_some_and(|ext| ext == SESSION_EXTENSION);
        if !entry.file_type().is_file() || !is_log {
            continue;
        }

        if files.len() >= MAX_SESSION_FILES {
            bail!(
                "Resource limit exceeded: found more than {} session files under {}",
                MAX_SESSION_FILES,
                root.display()
            );
        }
        files.push(entry.into_path());
    }
    files.sort();
    Ok(files)
}
