use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};

// Maximum size of a single input file: 512MB
const MAX_FILE_SIZE_BYTES: u64 = 512 * 1024 * 1024;

/// Validates that a file's size is within acceptable limits (512MB)
///
/// Takes an open file handle to avoid TOCTOU (time-of-check-time-of-use)
/// race conditions where the file could be modified between the size check
/// and subsequent file operations.
///
/// # Errors
///
/// Returns an error if:
/// - The file metadata cannot be read
/// - The file is larger than 512MB
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    let file_size = metadata.len();
    if file_size > MAX_FILE_SIZE_BYTES {
        bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            file_size,
            MAX_FILE_SIZE_BYTES
        );
    }

    Ok(())
}

/// Read an input file into memory after the size check
pub fn read_input_file(path: &Path) -> Result<Vec<u8>> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    validate_file_size(&file, path)?;

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(bytes)
}

/// File name without extension, lossily converted
pub fn file_stem(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Short project name: the last non-empty segment of a working directory.
///
/// Both `/` and `\` separate segments so Windows paths recorded in logs
/// resolve the same way on every platform.
///
/// # Examples
///
/// ```
/// use palimpsest::utils::project_name;
///
/// assert_eq!(project_name("/Users/dev/my-project/"), Some("my-project".to_string()));
/// assert_eq!(project_name(r"C:\work\api"), Some("api".to_string()));
/// assert_eq!(project_name("/"), None);
/// ```
pub fn project_name(cwd: &str) -> Option<String> {
    cwd.split(['/', '\\']).rev().find(|segment| !segment.trim().is_empty()).map(str::to_string)
}
