//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `vellum-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `AssetProvider`: read-only access to template assets
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, served by `PageRenderer`)

pub mod output;

pub use output::{AssetProvider, AssetProviderExt};

#[cfg(test)]
pub use output::MockAssetProvider;
