//! Application layer for Vellum.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (PageRenderer)
//! - **Ports**: Interface definitions for where assets come from
//! - **Errors**: Application-specific error types
//!
//! The template language itself lives in `crate::domain`; this layer only
//! decides which assets are composed and where output goes.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{PageLayout, PageRenderer};

pub use ports::{AssetProvider, AssetProviderExt};

pub use error::ApplicationError;
