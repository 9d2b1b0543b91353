//! Asset providers for Vellum.
//!
//! This crate implements the [`AssetProvider`](vellum_core::application::ports::AssetProvider)
//! port defined in `vellum-core`. It owns the `static/` template tree that is
//! compiled into the binary, and every piece of filesystem I/O.

pub mod directory;
pub mod embedded;
pub mod memory;

// Re-export commonly used adapters
pub use directory::DirectoryAssets;
pub use embedded::EmbeddedAssets;
pub use memory::MemoryAssets;
