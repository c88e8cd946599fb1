//! Feature file discovery
//!
//! Walks a directory tree and returns every `.feature` file in a stable,
//! sorted order so duplicate detection and logs are reproducible.

use crate::error::ScanError;
use crate::parser::FeatureParser;
use std::path::{Path, PathBuf};

/// Recursively collect feature files under `root`, sorted by path
///
/// # Errors
/// `ScanError::DirectoryUnreadable` if `root` or any nested directory cannot
/// be listed. Unreadable directories are never skipped silently.
pub async fn scan_feature_files(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let parser = FeatureParser::new();
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| ScanError::unreadable(&dir, e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ScanError::unreadable(&dir, e))?
        {
            let path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| ScanError::unreadable(&dir, e))?;

            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() && parser.can_parse(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    tracing::debug!(root = %root.display(), count = files.len(), "scanned feature files");
    Ok(files)
}
