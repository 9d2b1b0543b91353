//! In-memory asset provider for testing.

use std::borrow::Cow;
use std::collections::BTreeMap;

use tracing::warn;

use vellum_core::application::{ApplicationError, ports::AssetProvider};
use vellum_core::domain::{AssetFile, ModifiedTime, is_valid_path};
use vellum_core::error::VellumResult;

/// A fixed asset set built in code.
///
/// Like embedded assets, every handle reports [`ModifiedTime::unknown`].
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    files: BTreeMap<String, Cow<'static, [u8]>>,
}

impl MemoryAssets {
    /// Create a new empty asset set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset. Invalid paths are dropped, since they could never be opened.
    pub fn with(
        mut self,
        path: impl Into<String>,
        content: impl Into<Cow<'static, [u8]>>,
    ) -> Self {
        let path = path.into();
        if is_valid_path(&path) {
            self.files.insert(path, content.into());
        } else {
            warn!(path = %path, "Ignoring asset with invalid path");
        }
        self
    }

    /// Add a text asset.
    pub fn with_text(self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.with(path, text.into().into_bytes())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl AssetProvider for MemoryAssets {
    fn open(&self, path: &str) -> VellumResult<AssetFile> {
        let content = self
            .files
            .get(path)
            .ok_or_else(|| ApplicationError::not_found(path))?;
        Ok(AssetFile::new(path, content.clone(), ModifiedTime::unknown()))
    }

    fn paths(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }
}
