// ============================================================================
// domain/error.rs - TEMPLATE ERRORS
// ============================================================================

use thiserror::Error;

/// Errors raised by the template language.
///
/// Parse errors always carry the asset path they came from so a bad asset can
/// be found without re-running with extra logging.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TemplateError {
    // ========================================================================
    // Parse-time (syntax, composition)
    // ========================================================================
    #[error("template: {path}:{line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },

    // ========================================================================
    // Execution-time (context mismatch, undefined references)
    // ========================================================================
    #[error("template: {template}:{line}: {message}")]
    Execution {
        template: String,
        line: usize,
        message: String,
    },

    /// The output sink rejected a write.
    #[error("template: {template}: write failed: {reason}")]
    Write { template: String, reason: String },
}

impl TemplateError {
    pub(crate) fn parse(path: &str, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_string(),
            line,
            message: message.into(),
        }
    }

    pub(crate) fn execution(template: &str, line: usize, message: impl Into<String>) -> Self {
        Self::Execution {
            template: template.to_string(),
            line,
            message: message.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Parse { path, line, .. } => vec![
                format!("Check the template syntax in {} near line {}", path, line),
                "Every {{if}}, {{with}}, {{range}}, {{define}} and {{block}} needs a matching {{end}}".into(),
                "Every {{template \"name\"}} must have a {{define \"name\"}} in the base or the page".into(),
            ],
            Self::Execution { .. } => vec![
                "A template referenced data the render context does not provide".into(),
                "Pass a context with the missing field, or guard it with {{with}} / {{if}}".into(),
            ],
            Self::Write { .. } => vec!["Check that the output destination is writable".into()],
        }
    }

    /// The template or asset the error points at.
    pub fn location(&self) -> &str {
        match self {
            Self::Parse { path, .. } => path,
            Self::Execution { template, .. } | Self::Write { template, .. } => template,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_path_and_line() {
        let err = TemplateError::parse("pages/about.tmpl", 3, "unexpected {{end}}");
        assert_eq!(
            err.to_string(),
            "template: pages/about.tmpl:3: unexpected {{end}}"
        );
        assert_eq!(err.location(), "pages/about.tmpl");
    }

    #[test]
    fn every_kind_has_suggestions() {
        let errors = [
            TemplateError::parse("base.tmpl", 1, "x"),
            TemplateError::execution("base.tmpl", 4, "x"),
            TemplateError::Write {
                template: "base.tmpl".into(),
                reason: "broken pipe".into(),
            },
        ];
        for err in errors {
            assert!(!err.suggestions().is_empty());
        }
    }
}
