//! Vellum Core - embedded assets and page rendering
//!
//! This crate provides the domain and application layers for Vellum, a small
//! engine that serves a fixed set of template assets through a read-only
//! virtual filesystem and renders pages from them.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           vellum-cli (CLI)              │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │            (PageRenderer)               │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │     (AssetProvider, AssetProviderExt)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     vellum-adapters (Infrastructure)    │
//! │ (EmbeddedAssets, DirectoryAssets, ...)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (AssetFile, ContentDigest, TemplateSet)│
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vellum_core::prelude::*;
//!
//! # fn demo(provider: Arc<dyn AssetProvider>) -> VellumResult<()> {
//! let renderer = PageRenderer::new(provider);
//! renderer.render_page("about", &serde_json::Value::Null, &mut std::io::stdout())?;
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        PageLayout, PageRenderer,
        ports::{AssetProvider, AssetProviderExt},
    };
    pub use crate::domain::{AssetFile, AssetInfo, ContentDigest, ModifiedTime, TemplateSet};
    pub use crate::error::{VellumError, VellumResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
