//! Dialog file persistence operations.
//!
//! # File Structure
//!
//! The whole store is saved to a single file, conventionally `dialogs.json`.
//! The caller picks the path; this module never invents one.
//!
//! # Design Notes
//!
//! - **Atomic writes**: Write to temp file, then rename (prevents corruption)
//! - **First run**: A missing file loads as an empty store, not an error
//! - **Whole-file saves**: The store is small; every save rewrites it

use std::fs;
use std::path::Path;

use super::types::DialogMap;

/// Error type for dialog persistence operations.
#[derive(Debug)]
pub enum DialogsError {
    /// IO error (permission denied, disk full, etc.)
    Io(std::io::Error),
    /// JSON serialization/deserialization error
    Json(serde_json::Error),
}

impl std::fmt::Display for DialogsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialogsError::Io(e) => write!(f, "IO error: {e}"),
            DialogsError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for DialogsError {}

impl From<std::io::Error> for DialogsError {
    fn from(e: std::io::Error) -> Self {
        DialogsError::Io(e)
    }
}

impl From<serde_json::Error> for DialogsError {
    fn from(e: serde_json::Error) -> Self {
        DialogsError::Json(e)
    }
}

/// Save all dialogs to disk.
///
/// # Atomic Write Strategy
///
/// 1. Write to `{path}.tmp`
/// 2. Rename to `{path}`
///
/// This prevents data corruption if the write is interrupted.
pub fn save_dialogs(path: &Path, dialogs: &DialogMap) -> Result<(), DialogsError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut temp_path = path.as_os_str().to_owned();
    temp_path.push(".tmp");
    let temp_path = Path::new(&temp_path);

    let json = serde_json::to_string_pretty(dialogs)?;
    fs::write(temp_path, json)?;
    fs::rename(temp_path, path)?;

    Ok(())
}

/// Load all dialogs from disk.
///
/// Returns an empty map if the file doesn't exist (first run).
pub fn load_dialogs(path: &Path) -> Result<DialogMap, DialogsError> {
    if !path.exists() {
        return Ok(DialogMap::new());
    }

    let contents = fs::read_to_string(path)?;
    let dialogs: DialogMap = serde_json::from_str(&contents)?;

    Ok(dialogs)
}

// ============================================================================
// TESTS
// ============================================================================
