//! Command handlers, one module per subcommand.

pub mod cat;
pub mod completions;
pub mod config;
pub mod demo;
pub mod list;
pub mod render;
pub mod stat;

use std::sync::Arc;

use tracing::debug;

use vellum_adapters::{DirectoryAssets, EmbeddedAssets};
use vellum_core::prelude::*;

use crate::{cli::GlobalArgs, config::AppConfig, error::CliResult};

/// Pick the asset provider: `--assets-dir`, then `assets.dir`, then the
/// embedded set.
pub fn provider(global: &GlobalArgs, config: &AppConfig) -> CliResult<Arc<dyn AssetProvider>> {
    match global.assets_dir.as_ref().or(config.assets.dir.as_ref()) {
        Some(dir) => {
            debug!(dir = %dir.display(), "Serving assets from disk");
            Ok(Arc::new(DirectoryAssets::new(dir)?))
        }
        None => {
            debug!("Serving embedded assets");
            Ok(Arc::new(EmbeddedAssets::new()))
        }
    }
}

/// A [`PageRenderer`] over [`provider`], using the configured layout.
pub fn renderer(global: &GlobalArgs, config: &AppConfig) -> CliResult<PageRenderer> {
    Ok(PageRenderer::new(provider(global, config)?).with_layout(config.assets.page_layout()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_by_default() {
        let provider = provider(&GlobalArgs::default(), &AppConfig::default()).unwrap();
        assert!(provider.exists("base.tmpl"));
    }

    #[test]
    fn flag_beats_config() {
        let flag_dir = tempfile::tempdir().unwrap();
        std::fs::write(flag_dir.path().join("only-here.tmpl"), "x").unwrap();

        let global = GlobalArgs {
            assets_dir: Some(flag_dir.path().to_path_buf()),
            ..GlobalArgs::default()
        };
        let mut config = AppConfig::default();
        config.assets.dir = Some("/definitely/not/a/dir".into());

        let provider = provider(&global, &config).unwrap();
        assert_eq!(provider.paths(), vec!["only-here.tmpl"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let global = GlobalArgs {
            assets_dir: Some("/definitely/not/a/dir".into()),
            ..GlobalArgs::default()
        };
        assert!(provider(&global, &AppConfig::default()).is_err());
    }
}
