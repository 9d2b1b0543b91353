//! CLI error type and its mapping to messages and exit codes.
//!
//! Every command returns [`CliResult`]. `main` turns the error into a report
//! on stderr via [`CliError::report`] and into a process exit code via
//! [`CliError::exit_code`].

use std::error::Error;
use std::fmt::Write as _;

use owo_colors::OwoColorize;
use thiserror::Error;

use vellum_core::error::{ErrorCategory as CoreCategory, VellumError};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Input clap accepted but the command could not use, e.g. a malformed
    /// JSON context.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    /// Raised by the renderer or an asset provider.
    #[error("{0}")]
    Core(#[from] VellumError),

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

/// How an error is classified for logging and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserError,
    NotFound,
    /// A template failed to parse or execute.
    Template,
    Configuration,
    Internal,
}

impl ErrorCategory {
    /// | Category      | Code |
    /// |---------------|------|
    /// | Internal      |  1   |
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Template      |  5   |
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Internal => 1,
            Self::UserError => 2,
            Self::NotFound => 3,
            Self::Configuration => 4,
            Self::Template => 5,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::UserError => "Invalid input",
            Self::NotFound => "Not found",
            Self::Template => "Template error",
            Self::Configuration => "Configuration error",
            Self::Internal => "Internal error",
        }
    }
}

impl From<CoreCategory> for ErrorCategory {
    fn from(category: CoreCategory) -> Self {
        match category {
            CoreCategory::Validation => Self::UserError,
            CoreCategory::NotFound => Self::NotFound,
            CoreCategory::Template => Self::Template,
            CoreCategory::Internal => Self::Internal,
        }
    }
}

impl CliError {
    /// Hints printed under the error message.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { .. } => vec![
                "Pass the render context as a JSON document, e.g. --context '{\"Name\": \"Ada\"}'"
                    .into(),
                "Use --help for usage information".into(),
            ],
            Self::ConfigError { .. } => vec![
                "Run `vellum config path` to locate the config file".into(),
                "Environment overrides use VELLUM__SECTION__KEY, e.g. VELLUM__ASSETS__DIR".into(),
            ],
            Self::Core(core) => core.suggestions(),
            Self::IoError { .. } => {
                vec!["Check that stdout is writable (e.g. not a closed pipe)".into()]
            }
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => core.category().into(),
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.category().exit_code()
    }

    /// Multi-line report for stderr: the message, its causes when `verbose`,
    /// then suggestions.
    pub fn report(&self, verbose: bool, colored: bool) -> String {
        let paint = |text: &str, style: fn(&str) -> String| {
            if colored { style(text) } else { text.to_owned() }
        };

        let mut out = String::new();
        let _ = writeln!(
            out,
            "\n{} {}",
            paint("error:", |s| s.red().bold().to_string()),
            paint(&self.to_string(), |s| s.red().to_string()),
        );

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                let line = format!("caused by: {err}");
                let _ = writeln!(out, "  {}", paint(&line, |s| s.dimmed().to_string()));
                cause = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            let heading = paint("Suggestions:", |s| s.yellow().bold().to_string());
            let _ = writeln!(out, "\n{heading}");
            for hint in &suggestions {
                let _ = writeln!(out, "  - {hint}");
            }
        }

        if !verbose {
            let hint = paint("Run with -v for more details.", |s| s.dimmed().to_string());
            let _ = writeln!(out, "\n{hint}");
        }
        out
    }

    /// Emit the error through tracing at a level matching its category.
    pub fn log(&self) {
        let category = self.category();
        let label = category.label();
        match category {
            ErrorCategory::UserError | ErrorCategory::NotFound => {
                tracing::warn!(exit_code = category.exit_code(), "{label}: {self}")
            }
            _ => tracing::error!(exit_code = category.exit_code(), "{label}: {self}"),
        }
        if let Some(source) = self.source() {
            tracing::debug!(%source, "underlying cause");
        }
    }
}

/// Attach a context message to an I/O failure.
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|source| CliError::IoError {
            message: f().into(),
            source,
        })
    }
}
