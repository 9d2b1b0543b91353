//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only ever sees the [`PageLayout`]
//! built from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `VELLUM__SECTION__KEY` (e.g. `VELLUM__ASSETS__DIR`)
//! 3. Config file (`--config`, or the default path when it exists)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use vellum_core::application::PageLayout;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where assets come from and how pages are laid out.
    pub assets: AssetsConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Serve assets from this directory instead of the embedded set.
    pub dir: Option<PathBuf>,
    /// Path of the base layout.
    pub layout: String,
    /// Directory holding one asset per page.
    pub pages_dir: String,
    /// Extension of page assets, including the dot.
    pub extension: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        let layout = PageLayout::default();
        Self {
            dir: None,
            layout: layout.base,
            pages_dir: layout.pages_dir,
            extension: layout.extension,
        }
    }
}

impl AssetsConfig {
    pub fn page_layout(&self) -> PageLayout {
        PageLayout {
            base: self.layout.clone(),
            pages_dir: self.pages_dir.clone(),
            extension: self.extension.clone(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then environment.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required, Environment::with_prefix("VELLUM").separator("__"))
    }

    fn load_from(path: &Path, required: bool, env: Environment) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to encode default configuration")?;

        let settings = Config::builder()
            .add_source(defaults)
            .add_source(File::from(path).required(required))
            .add_source(env.try_parsing(true))
            .build()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

        let config: Self = settings
            .try_deserialize()
            .context("Configuration has invalid values")?;
        tracing::debug!(path = %path.display(), ?config, "Configuration loaded");
        Ok(config)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.vellum.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "vellum", "vellum")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".vellum.toml"))
    }
}
