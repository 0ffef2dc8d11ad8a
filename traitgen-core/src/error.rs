//! Typed error handling for traitgen.
//!
//! Provides structured errors that library consumers can match on. Note
//! that "type not found" is deliberately *not* an error: the locator
//! returns `Option` so callers can treat multiple units independently.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for traitgen operations.
#[derive(Error, Debug)]
pub enum TraitgenError {
    /// Malformed type selector. Fatal: no unit can be processed without
    /// a valid selector.
    #[error("invalid selector {selector:?}: expected module::TypeName")]
    InvalidSelector { selector: String },

    /// Syntax error while parsing one source file of a unit.
    #[error("parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// The assembled declaration was rejected by the formatter. This
    /// indicates a rendering bug, not a user error; the offending text
    /// is carried for diagnosis.
    #[error("render error: {message}")]
    Render { message: String, text: String },

    /// Failure writing to the output sink.
    #[error("output error at {path}: {message}")]
    Output {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration file errors.
    #[error("config error at {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl TraitgenError {
    /// Create an invalid-selector error.
    pub fn selector(selector: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
        }
    }

    /// Create a parse error for one file.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a render error carrying the rejected text.
    pub fn render(message: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
            text: text.into(),
        }
    }

    /// Create an output error with path context.
    pub fn output(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Output {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether analysis of remaining units may continue after this error.
    ///
    /// Only a malformed selector aborts the whole run; everything else
    /// is terminal for the affected unit alone.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidSelector { .. })
    }

    /// The path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Parse { path, .. } => Some(path),
            Self::Output { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for traitgen results.
pub type TraitgenResult<T> = Result<T, TraitgenError>;

/// Extension trait for converting `std::io::Error` with path context.
pub trait IoResultExt<T> {
    /// Add output-path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> TraitgenResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> TraitgenResult<T> {
        self.map_err(|e| TraitgenError::output(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_error_is_fatal() {
        let err = TraitgenError::selector("BadSelector");
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("BadSelector"));
    }

    #[test]
    fn test_parse_error_skips_the_file_only() {
        let err = TraitgenError::parse(PathBuf::from("src/broken.rs"), "unexpected token");
        assert!(err.is_recoverable());
        assert_eq!(err.path(), Some(&PathBuf::from("src/broken.rs")));
        assert!(err.to_string().contains("src/broken.rs"));
    }

    #[test]
    fn test_render_error_carries_text() {
        let err = TraitgenError::render("unexpected token", "pub trait Broken {");
        assert!(err.is_recoverable());
        if let TraitgenError::Render { text, .. } = &err {
            assert_eq!(text, "pub trait Broken {");
        } else {
            panic!("expected Render error");
        }
    }

    #[test]
    fn test_output_error_path() {
        let err = TraitgenError::output(
            PathBuf::from("/out/barer_gen.rs"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.is_recoverable());
        assert_eq!(err.path(), Some(&PathBuf::from("/out/barer_gen.rs")));
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        assert!(result.with_path("/missing/file.rs").is_err());
    }
}
