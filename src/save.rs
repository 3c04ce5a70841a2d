//! Saving downloaded files
//!
//! Downloads hand their bytes to a [`FileSaver`] along with the name the
//! service would suggest. The CLI saves into a directory; embedders can
//! route bytes anywhere else.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Destination for downloaded files.
pub trait FileSaver {
    /// Store `bytes` under `file_name` and return where they went.
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Saves files into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Keep a suggested name inside the target directory.
fn sanitize_file_name(file_name: &str) -> String {
    let cleaned: String = file_name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    match cleaned.trim_matches('.') {
        "" => "download".to_string(),
        _ => cleaned,
    }
}

impl FileSaver for DirectorySaver {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(sanitize_file_name(file_name));
        fs::write(&path, bytes)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "saved download");
        Ok(path)
    }
}

/// Result of a completed download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadOutcome {
    pub success: bool,
    pub message: String,
    pub path: PathBuf,
    pub bytes: usize,
}

impl DownloadOutcome {
    pub(crate) fn saved(path: PathBuf, bytes: usize) -> Self {
        Self {
            success: true,
            message: "Download complete".to_string(),
            path,
            bytes,
        }
    }
}
