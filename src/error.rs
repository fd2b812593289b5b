// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NavigatorError>;

#[derive(Error, Debug)]
pub enum NavigatorError {
    #[error("Invalid path format '{path}': {reason}")]
    PathFormat { path: String, reason: String },

    #[error("Unknown repository '{repo_id}' (available: {})", format_available(.available))]
    UnknownRepository {
        repo_id: String,
        available: Vec<String>,
    },

    #[error("Not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("File system access failed for {}: {source}", .path.display())]
    FileSystemAccess {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid repository id '{0}': expected a lowercase slug")]
    InvalidRepositoryId(String),

    #[error("Manifest parsing error in {}: {message}", .path.display())]
    ManifestParse { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Background task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NavigatorError {
    pub fn path_format(path: &str, reason: impl Into<String>) -> Self {
        Self::PathFormat {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystemAccess {
            path: path.into(),
            source,
        }
    }
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        "none registered".to_string()
    } else {
        available.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_repository_lists_available() {
        let err = NavigatorError::UnknownRepository {
            repo_id: "ghost".to_string(),
            available: vec!["api".to_string(), "web".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unknown repository 'ghost' (available: api, web)"
        );

        let err = NavigatorError::UnknownRepository {
            repo_id: "ghost".to_string(),
            available: vec![],
        };
        assert!(err.to_string().contains("none registered"));
    }

    #[test]
    fn test_path_format_message() {
        let err = NavigatorError::path_format("/demo", "missing relative path");
        assert_eq!(
            err.to_string(),
            "Invalid path format '/demo': missing relative path"
        );
    }
}
