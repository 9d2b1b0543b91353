//! Domain layer: assets and the template language.
//!
//! Nothing in here performs I/O beyond writing rendered output to a
//! caller-supplied sink. Asset lookup lives behind the
//! [`AssetProvider`](crate::application::ports::AssetProvider) port.

pub mod asset;
pub mod error;
pub mod template;

pub use asset::{AssetFile, AssetInfo, ContentDigest, ModifiedTime, is_valid_path};
pub use error::TemplateError;
pub use template::TemplateSet;
