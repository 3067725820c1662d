use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use url::Url;

/// Owns the per-site output directory and writes fetched bytes into it.
///
/// The directory is created lazily on the first write, so a session whose
/// root fetch fails leaves nothing behind.
pub struct SiteStore {
    site_dir: PathBuf,
}

impl SiteStore {
    pub fn new(root: &Path, host: &str) -> Self {
        Self {
            site_dir: root.join(host),
        }
    }

    pub fn site_dir(&self) -> &Path {
        &self.site_dir
    }

    /// Binary-safe write under the site directory. An existing file with the
    /// same name is silently overwritten; creating the directory is
    /// idempotent.
    pub fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.site_dir)?;
        let path = self.site_dir.join(filename);
        fs::write(&path, bytes)?;
        debug!(file = %path.display(), len = bytes.len(), "saved");
        Ok(path)
    }
}

/// The final path segment of a URL, used as the local filename.
///
/// A path ending in `/` (or an empty path) has no usable tail; the caller
/// records that as an asset-processing error and skips.
pub fn filename_for(url: &Url) -> Option<String> {
    let tail = url.path().rsplit('/').next().unwrap_or("");
    if tail.is_empty() {
        None
    } else {
        Some(tail.to_string())
    }
}
