//! Small helpers for text matching and file system checks.

use crate::error::ScrapeError;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Case-insensitive substring test.
///
/// # Examples
///
/// ```ignore
/// assert!(contains_ci("Blog du Modérateur", "modérateur"));
/// ```
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` characters with an ellipsis and a byte count
/// appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a probe file.
///
/// # Errors
///
/// [`ScrapeError::Store`] if the directory cannot be created or is not
/// writable (permission denied, read-only file system, ...).
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), ScrapeError> {
    let store_err = |source| ScrapeError::Store {
        path: path.to_path_buf(),
        source,
    };
    fs::create_dir_all(path).await.map_err(store_err)?;

    // Try a small sync write using std fs (simpler error surface)
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path).map_err(store_err)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Store directory is writable");
    Ok(())
}
