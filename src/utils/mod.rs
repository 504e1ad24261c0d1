pub mod environment;
pub mod paths;

pub use environment::{get_claude_projects_dir, get_codex_session_dirs, get_home_dir};
pub use paths::{file_stem, project_name, read_input_file, validate_file_size};
