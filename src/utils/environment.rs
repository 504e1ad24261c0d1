use std::path::PathBuf;

use anyhow::{Context, Result};

/// Get the user's home directory (honours `$HOME` on Unix)
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Could not determine home directory (is HOME set?)")
}

/// Default Claude Code session root: `~/.claude/projects`
pub fn get_claude_projects_dir() -> Result<PathBuf> {
    Ok(get_home_dir()?.join(".claude").join("projects"))
}

/// Default Codex session roots: `~/.codex/sessions` and `~/.codex/archived_sessions`
pub fn get_codex_session_dirs() -> Result<Vec<PathBuf>> {
    let codex_dir = get_home_dir()?.join(".codex");
    Ok(vec![codex_dir.join("sessions"), codex_dir.join("archived_sessions")])
}
