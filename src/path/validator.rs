// file: src/path/validator.rs
// description: tool-facing address validation with corrected-example guidance
// reference: input validation patterns

use crate::error::NavigatorError;
use crate::path::reference::PathReference;
use crate::registry::RepositoryRegistry;
use serde::Serialize;

/// Outcome of [`validate`]. Failures are values so tool handlers can hand the message
/// straight back to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip)]
    pub reference: Option<PathReference>,
}

impl ValidationResult {
    fn valid(reference: PathReference) -> Self {
        Self {
            is_valid: true,
            error_message: None,
            reference: Some(reference),
        }
    }

    fn invalid(message: String) -> Self {
        Self {
            is_valid: false,
            error_message: Some(message),
            reference: None,
        }
    }
}

/// Accepts only absolute addresses (`/<repo>/<path>`) naming a registered repository and
/// staying inside it.
pub fn validate(address: &str, repositories: &RepositoryRegistry) -> ValidationResult {
    let reference = match PathReference::parse(address) {
        Ok(reference) => reference,
        Err(err) => {
            let example = format_error_example(address);
            return ValidationResult::invalid(format!("{}. Try '{}'.", err, example));
        }
    };

    if !reference.is_absolute() {
        let example = reference.to_absolute(repositories.default_id());
        return ValidationResult::invalid(format!(
            "Path '{}' must be absolute and start with '/<repository>/'. Try '{}'.",
            address, example
        ));
    }

    let repo_id = reference.repo_id().unwrap_or_default();
    if !repositories.contains(repo_id) {
        let err = NavigatorError::UnknownRepository {
            repo_id: repo_id.to_string(),
            available: repositories.ids(),
        };
        let suggestion = repositories
            .ids()
            .into_iter()
            .next()
            .unwrap_or_else(|| "<repository>".to_string());
        return ValidationResult::invalid(format!(
            "{}. Try '/{}/{}'.",
            err,
            suggestion,
            reference.relative_path()
        ));
    }

    if escapes_root(reference.relative_path()) {
        let cleaned: Vec<&str> = reference
            .relative_path()
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
            .collect();
        return ValidationResult::invalid(format!(
            "Path '{}' escapes the repository root. Try '/{}/{}'.",
            address,
            repo_id,
            cleaned.join("/")
        ));
    }

    ValidationResult::valid(reference)
}

/// True when `..` segments climb above the start of `relative`, or when an empty segment
/// (a leading or doubled `/`) would make the joined path absolute. A single trailing `/`
/// is allowed.
fn escapes_root(relative: &str) -> bool {
    let segments: Vec<&str> = relative.split('/').collect();
    let last = segments.len() - 1;

    let mut depth: i32 = 0;
    for (index, segment) in segments.into_iter().enumerate() {
        match segment {
            "" if index == last => {}
            "" => return true,
            "." => {}
            ".." => {
                depth -= 1;
                if depth < 0 {
                    return true;
                }
            }
            _ => depth += 1,
        }
    }
    false
}

fn format_error_example(address: &str) -> String {
    if let Some((repo_id, rest)) = address.split_once("://") {
        let repo_id = repo_id.trim_matches('/');
        let rest = rest.trim_matches('/');
        let repo_id = if repo_id.is_empty() { "<repository>" } else { repo_id };
        let rest = if rest.is_empty() { "<path>" } else { rest };
        return format!("/{}/{}", repo_id, rest);
    }
    let trimmed = address.trim_matches('/');
    if trimmed.is_empty() {
        return "/<repository>/<path>".to_string();
    }
    format!("/{}/<path>", trimmed)
}
