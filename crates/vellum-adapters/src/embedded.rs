//! Assets compiled into the binary.

use rust_embed::RustEmbed;
use tracing::{debug, instrument};

use vellum_core::application::{ApplicationError, ports::AssetProvider};
use vellum_core::domain::{AssetFile, ModifiedTime, is_valid_path};
use vellum_core::error::VellumResult;

/// The `static/` tree, embedded at build time.
#[derive(RustEmbed)]
#[folder = "static/"]
struct StaticAssets;

/// Provider over the template assets embedded in the binary.
///
/// Embedded files carry no filesystem timestamp, so every handle reports
/// [`ModifiedTime::unknown`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedAssets;

impl EmbeddedAssets {
    pub fn new() -> Self {
        Self
    }
}

impl AssetProvider for EmbeddedAssets {
    #[instrument(skip(self))]
    fn open(&self, path: &str) -> VellumResult<AssetFile> {
        if !is_valid_path(path) {
            debug!("Path leaves the asset root");
            return Err(ApplicationError::not_found(path).into());
        }

        let file = StaticAssets::get(path).ok_or_else(|| ApplicationError::not_found(path))?;
        debug!(size = file.data.len(), "Opened embedded asset");
        Ok(AssetFile::new(path, file.data, ModifiedTime::unknown()))
    }

    fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = StaticAssets::iter().map(|p| p.into_owned()).collect();
        paths.sort();
        paths
    }
}
