//! Assets read from a directory on disk.
//!
//! Uses the same layout as the embedded `static/` tree, which makes it handy
//! for iterating on templates without rebuilding.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use vellum_core::application::{ApplicationError, ports::AssetProvider};
use vellum_core::domain::{AssetFile, ModifiedTime, is_valid_path};
use vellum_core::error::VellumResult;

/// Provider over the files below a root directory.
///
/// Unlike embedded assets, handles report the file's real modification time.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    /// Serve assets from `root`, which must be an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> VellumResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ApplicationError::AssetRead {
                path: root.display().to_string(),
                reason: "not a directory".into(),
            }
            .into());
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        path.split('/').fold(self.root.clone(), |mut acc, segment| {
            acc.push(segment);
            acc
        })
    }
}

impl AssetProvider for DirectoryAssets {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn open(&self, path: &str) -> VellumResult<AssetFile> {
        if !is_valid_path(path) {
            debug!("Path leaves the asset root");
            return Err(ApplicationError::not_found(path).into());
        }

        let full = self.resolve(path);
        let read_error = |e: std::io::Error| -> ApplicationError {
            if e.kind() == ErrorKind::NotFound {
                ApplicationError::not_found(path)
            } else {
                ApplicationError::AssetRead {
                    path: path.to_string(),
                    reason: e.to_string(),
                }
            }
        };

        let metadata = std::fs::metadata(&full).map_err(read_error)?;
        if !metadata.is_file() {
            return Err(ApplicationError::not_found(path).into());
        }
        let content = std::fs::read(&full).map_err(read_error)?;
        let modified = metadata
            .modified()
            .map(ModifiedTime::from)
            .unwrap_or_default();

        debug!(size = content.len(), %modified, "Opened asset from disk");
        Ok(AssetFile::new(path, content, modified))
    }

    fn paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let segments: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            paths.push(segments.join("/"));
        }
        paths.sort();
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pages")).unwrap();
        fs::write(dir.path().join("base.tmpl"), "base").unwrap();
        fs::write(dir.path().join("pages/home.tmpl"), "home").unwrap();
        dir
    }

    #[test]
    fn rejects_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DirectoryAssets::new(dir.path().join("nope")).is_err());
    }

    #[test]
    fn opens_files_with_real_mtime() {
        let dir = tree();
        let assets = DirectoryAssets::new(dir.path()).unwrap();
        let mut file = assets.open("pages/home.tmpl").unwrap();
        assert_eq!(file.read_all(), b"home");

        let info = file.stat();
        assert_eq!(info.size, 4);
        assert!(!info.modified.is_unknown());
        let age = chrono::Utc::now() - info.modified.as_datetime();
        assert!(age.num_minutes() < 10);
    }

    #[test]
    fn directories_and_escapes_are_not_found() {
        let dir = tree();
        let assets = DirectoryAssets::new(dir.path().join("pages")).unwrap();
        for path in ["../base.tmpl", "missing.tmpl", "."] {
            assert!(assets.open(path).unwrap_err().is_not_found(), "{path:?}");
        }

        let root = DirectoryAssets::new(dir.path()).unwrap();
        assert!(root.open("pages").unwrap_err().is_not_found());
    }

    #[test]
    fn paths_are_relative_and_sorted() {
        let dir = tree();
        let assets = DirectoryAssets::new(dir.path()).unwrap();
        assert_eq!(assets.paths(), vec!["base.tmpl", "pages/home.tmpl"]);
    }
}
