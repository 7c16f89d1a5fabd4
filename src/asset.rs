// Asset module: the one local file a run creates. The guard owns the path
// and removes the file when dropped, so every exit path after the download
// cleans up after itself.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct LocalAsset {
    path: PathBuf,
}

impl LocalAsset {
    /// Reserve `<title>.png` inside `dir`. Nothing is written yet.
    pub fn for_title(dir: &Path, title: &str) -> Self {
        let path = dir.join(format!("{}.png", file_stem(title)));
        LocalAsset { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LocalAsset {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed temporary image"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), "failed to remove temporary image: {e}"),
        }
    }
}

/// Make a comic title safe to use as a file stem.
pub fn file_stem(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_matches('.');
    if cleaned.is_empty() {
        "comic".to_string()
    } else {
        cleaned.to_string()
    }
}
