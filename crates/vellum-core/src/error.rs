//! Unified error handling for Vellum Core.
//!
//! This module provides a unified error type that wraps template and
//! application errors, with user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::TemplateError;

/// Root error type for Vellum Core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VellumError {
    /// Errors from the template language (parse or execution).
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Errors from the application layer (asset resolution).
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl VellumError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Template(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec!["This appears to be a bug in Vellum".into()],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Template(_) => ErrorCategory::Template,
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// True when the error means "no such asset".
    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Template,
    Internal,
}

/// Convenient result type alias.
pub type VellumResult<T> = Result<T, VellumError>;
