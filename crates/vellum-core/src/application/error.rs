//! Application layer errors.
//!
//! These errors represent failures in locating and loading assets, not in
//! the template language. Template failures are `TemplateError` from
//! `crate::domain`.

use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while resolving assets for a render.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// No asset exists at the requested path.
    #[error("Asset not found: {path}")]
    AssetNotFound { path: String },

    /// The asset exists but could not be read.
    #[error("Failed to read asset {path}: {reason}")]
    AssetRead { path: String, reason: String },

    /// The page identifier cannot be mapped onto an asset path.
    #[error("Invalid page name '{name}': {reason}")]
    InvalidPageName { name: String, reason: String },

    /// A template set was requested from zero assets.
    #[error("No template assets given to parse")]
    EmptyParseSet,
}

impl ApplicationError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::AssetNotFound { path: path.into() }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::AssetNotFound { path } => vec![
                format!("No asset at: {}", path),
                "Try: vellum list to see the available assets and pages".into(),
            ],
            Self::AssetRead { path, .. } => vec![
                format!("Failed to read: {}", path),
                "Check that the assets directory is readable".into(),
            ],
            Self::InvalidPageName { .. } => vec![
                "Page names are bare identifiers such as 'home' or 'about'".into(),
                "Do not include directories or the .tmpl extension".into(),
            ],
            Self::EmptyParseSet => vec!["Pass at least one template path".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AssetNotFound { .. } => ErrorCategory::NotFound,
            Self::AssetRead { .. } => ErrorCategory::Internal,
            Self::InvalidPageName { .. } | Self::EmptyParseSet => ErrorCategory::Validation,
        }
    }
}
