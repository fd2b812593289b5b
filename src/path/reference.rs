// file: src/path/reference.rs
// description: address string classification and decomposition into repository and relative path
// reference: virtual file system path parsing

use crate::error::{NavigatorError, Result};
use std::fmt;
use std::str::FromStr;

/// One parsed address. Classification is order-sensitive: a leading `/` is absolute even if
/// the rest contains `://`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathReference {
    /// `/repo/relative/path`
    Absolute {
        repo_id: String,
        relative_path: String,
    },
    /// `repo://relative/path`
    Prefixed {
        repo_id: String,
        relative_path: String,
    },
    /// `relative/path`, bound to the default repository at resolution time.
    Relative { relative_path: String },
}

impl PathReference {
    pub fn parse(address: &str) -> Result<Self> {
        if address.is_empty() {
            return Err(NavigatorError::path_format(address, "address is empty"));
        }

        if let Some(rest) = address.strip_prefix('/') {
            let segments: Vec<&str> = rest.split('/').collect();
            if segments.len() < 2 {
                return Err(NavigatorError::path_format(
                    address,
                    "expected '/<repository>/<path>'",
                ));
            }
            if segments[0].is_empty() {
                return Err(NavigatorError::path_format(
                    address,
                    "missing repository id after leading '/'",
                ));
            }
            return Ok(Self::Absolute {
                repo_id: segments[0].to_string(),
                relative_path: segments[1..].join("/"),
            });
        }

        if let Some((repo_id, relative_path)) = address.split_once("://") {
            if repo_id.is_empty() || relative_path.is_empty() {
                return Err(NavigatorError::path_format(
                    address,
                    "expected '<repository>://<path>'",
                ));
            }
            return Ok(Self::Prefixed {
                repo_id: repo_id.to_string(),
                relative_path: relative_path.to_string(),
            });
        }

        Ok(Self::Relative {
            relative_path: address.to_string(),
        })
    }

    /// The repository named by the address, if it names one.
    pub fn repo_id(&self) -> Option<&str> {
        match self {
            Self::Absolute { repo_id, .. } | Self::Prefixed { repo_id, .. } => Some(repo_id),
            Self::Relative { .. } => None,
        }
    }

    pub fn relative_path(&self) -> &str {
        match self {
            Self::Absolute { relative_path, .. }
            | Self::Prefixed { relative_path, .. }
            | Self::Relative { relative_path } => relative_path,
        }
    }

    /// The named repository, falling back to `default` for relative addresses.
    pub fn effective_repo_id<'a>(&'a self, default: Option<&'a str>) -> Option<&'a str> {
        self.repo_id().or(default)
    }

    pub fn is_absolute(&self) -> bool {
        matches!(self, Self::Absolute { .. })
    }

    /// Renders the reference in absolute form, `/<repo>/<relative>`.
    pub fn to_absolute(&self, default: Option<&str>) -> String {
        let repo_id = self.effective_repo_id(default).unwrap_or("<repository>");
        let relative = self.relative_path().trim_start_matches("./");
        format!("/{}/{}", repo_id, relative.trim_start_matches('/'))
    }
}

impl FromStr for PathReference {
    type Err = NavigatorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for PathReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute {
                repo_id,
                relative_path,
            } => write!(f, "/{}/{}", repo_id, relative_path),
            Self::Prefixed {
                repo_id,
                relative_path,
            } => write!(f, "{}://{}", repo_id, relative_path),
            Self::Relative { relative_path } => f.write_str(relative_path),
        }
    }
}
