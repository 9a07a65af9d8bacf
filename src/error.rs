use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from terminal or filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A runtime option could not be applied.
    #[error(transparent)]
    Option(#[from] OptionError),
}

/// A filesystem location could not be listed, stat-ed or read.
///
/// These never abort an interaction; views render them as messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("{}: No such file or directory", .path.display())]
    NotFound { path: PathBuf },

    #[error("{}: Permission denied", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("{}: Broken symbolic link", .path.display())]
    BrokenSymlink { path: PathBuf },

    #[error("{}: {message}", .path.display())]
    Os { path: PathBuf, message: String },
}

impl PathError {
    /// Classify an I/O error raised while accessing `path`.
    pub fn from_io(path: &Path, err: &io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => PathError::NotFound { path },
            io::ErrorKind::PermissionDenied => PathError::PermissionDenied { path },
            _ => PathError::Os {
                path,
                message: err.to_string(),
            },
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            PathError::NotFound { path }
            | PathError::PermissionDenied { path }
            | PathError::BrokenSymlink { path }
            | PathError::Os { path, .. } => path,
        }
    }
}

/// Navigating past either end of the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("History entry index out of range")]
pub struct HistoryRangeError;

/// Errors from `Options::set`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("Unknown option: {0}")]
    UnknownKey(String),

    #[error("Invalid value for option '{key}': {value}")]
    InvalidValue { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("file not found"));
    }

    #[test]
    fn terminal_error_display() {
        let err = AppError::Terminal("failed to enter raw mode".into());
        assert_eq!(err.to_string(), "Terminal error: failed to enter raw mode");
    }

    #[test]
    fn invalid_path_error_display() {
        let err = AppError::InvalidPath("/nonexistent".into());
        assert_eq!(err.to_string(), "Invalid path: /nonexistent");
    }

    #[test]
    fn path_error_classifies_io_kinds() {
        let path = Path::new("/tmp/x");
        let not_found = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert_eq!(
            PathError::from_io(path, &not_found),
            PathError::NotFound {
                path: path.to_path_buf()
            }
        );
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "no");
        assert!(matches!(
            PathError::from_io(path, &denied),
            PathError::PermissionDenied { .. }
        ));
        let other = io::Error::new(io::ErrorKind::Other, "disk on fire");
        let err = PathError::from_io(path, &other);
        assert_eq!(err.to_string(), "/tmp/x: disk on fire");
        assert_eq!(err.path(), path);
    }

    #[test]
    fn path_error_display_includes_path() {
        let err = PathError::BrokenSymlink {
            path: PathBuf::from("/a/link"),
        };
        assert_eq!(err.to_string(), "/a/link: Broken symbolic link");
    }

    #[test]
    fn option_error_converts_into_app_error() {
        let err: AppError = OptionError::UnknownKey("colour".into()).into();
        assert_eq!(err.to_string(), "Unknown option: colour");
    }
}
