// file: src/detection/manifest.rs
// description: reads ecosystem manifest files into a uniform dependency summary
// reference: https://docs.rs/serde_json, https://docs.rs/toml

use crate::detection::rules::ManifestKind;
use crate::error::{NavigatorError, Result};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ManifestInfo {
    pub kind: ManifestKind,
    pub file: PathBuf,
    pub package_name: Option<String>,
    pub dependencies: BTreeSet<String>,
    pub publishable: bool,
    /// Lowercased manifest text, searched when the format has no structured dependency list.
    content: String,
    structured: bool,
}

impl ManifestInfo {
    pub fn empty(kind: ManifestKind) -> Self {
        Self {
            kind,
            file: PathBuf::new(),
            package_name: None,
            dependencies: BTreeSet::new(),
            publishable: false,
            content: String::new(),
            structured: true,
        }
    }

    pub fn read(kind: ManifestKind, file: &Path, module_dir: &Path) -> Result<Self> {
        let raw = fs::read_to_string(file).map_err(|e| NavigatorError::file_system(file, e))?;
        let mut info = Self::empty(kind);
        info.file = file.to_path_buf();
        info.content = raw.to_lowercase();

        let file_name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        match kind {
            ManifestKind::PackageJson => info.parse_package_json(&raw)?,
            ManifestKind::Python => match file_name {
                "requirements.txt" => {
                    info.dependencies = raw.lines().filter_map(requirement_name).collect();
                }
                "pyproject.toml" => {
                    info.parse_pyproject(&raw)?;
                    info.publishable = true;
                }
                _ => {
                    info.structured = false;
                    info.publishable = true;
                }
            },
            ManifestKind::GoMod => info.parse_go_mod(&raw),
            ManifestKind::Cargo => {
                info.parse_cargo(&raw)?;
                info.publishable = info.publishable || module_dir.join("src/lib.rs").is_file();
            }
        }

        Ok(info)
    }

    /// Exact dependency match, or a path-prefix match so `github.com/labstack/echo` also
    /// covers `github.com/labstack/echo/v4`.
    pub fn declares(&self, dependency: &str) -> bool {
        let dependency = dependency.to_lowercase();
        if self.dependencies.contains(&dependency) {
            return true;
        }
        let prefix = format!("{}/", dependency);
        if self.dependencies.iter().any(|d| d.starts_with(&prefix)) {
            return true;
        }
        !self.structured && self.content.contains(&dependency)
    }

    fn parse_error(&self, message: impl ToString) -> NavigatorError {
        NavigatorError::ManifestParse {
            path: self.file.clone(),
            message: message.to_string(),
        }
    }

    fn parse_package_json(&mut self, raw: &str) -> Result<()> {
        let json: Value = serde_json::from_str(raw).map_err(|e| self.parse_error(e))?;

        self.package_name = json.get("name").and_then(Value::as_str).map(str::to_string);
        for section in ["dependencies", "devDependencies", "peerDependencies"] {
            if let Some(deps) = json.get(section).and_then(Value::as_object) {
                self.dependencies
                    .extend(deps.keys().map(|k| k.to_lowercase()));
            }
        }
        self.publishable = json.get("private").and_then(Value::as_bool) != Some(true);
        Ok(())
    }

    fn parse_pyproject(&mut self, raw: &str) -> Result<()> {
        let doc: toml::Value = toml::from_str(raw).map_err(|e| self.parse_error(e))?;

        if let Some(project) = doc.get("project") {
            self.package_name = project
                .get("name")
                .and_then(toml::Value::as_str)
                .map(str::to_string);
            if let Some(deps) = project.get("dependencies").and_then(toml::Value::as_array) {
                self.dependencies.extend(
                    deps.iter()
                        .filter_map(toml::Value::as_str)
                        .filter_map(requirement_name),
                );
            }
        }

        if let Some(poetry) = doc.get("tool").and_then(|t| t.get("poetry")) {
            if self.package_name.is_none() {
                self.package_name = poetry
                    .get("name")
                    .and_then(toml::Value::as_str)
                    .map(str::to_string);
            }
            if let Some(deps) = poetry.get("dependencies").and_then(toml::Value::as_table) {
                self.dependencies
                    .extend(deps.keys().map(|k| k.to_lowercase()));
            }
        }
        Ok(())
    }

    fn parse_go_mod(&mut self, raw: &str) {
        let mut in_require_block = false;
        for line in raw.lines().map(str::trim) {
            if let Some(module) = line.strip_prefix("module ") {
                self.package_name = Some(module.trim().to_string());
            } else if line.starts_with("require (") {
                in_require_block = true;
            } else if in_require_block && line.starts_with(')') {
                in_require_block = false;
            } else if let Some(single) = line.strip_prefix("require ") {
                if let Some(path) = single.split_whitespace().next() {
                    self.dependencies.insert(path.to_lowercase());
                }
            } else if in_require_block
                && let Some(path) = line.split_whitespace().next()
                && !path.starts_with("//")
            {
                self.dependencies.insert(path.to_lowercase());
            }
        }
    }

    fn parse_cargo(&mut self, raw: &str) -> Result<()> {
        let doc: toml::Value = toml::from_str(raw).map_err(|e| self.parse_error(e))?;

        self.package_name = doc
            .get("package")
            .and_then(|p| p.get("name"))
            .and_then(toml::Value::as_str)
            .map(str::to_string);

        for section in ["dependencies", "dev-dependencies", "build-dependencies"] {
            if let Some(deps) = doc.get(section).and_then(toml::Value::as_table) {
                self.dependencies
                    .extend(deps.keys().map(|k| k.to_lowercase()));
            }
        }
        self.publishable = doc.get("lib").is_some();
        Ok(())
    }
}

/// Package name of a PEP 508 requirement line, e.g. `Flask>=2.0 ; python_version>"3"`.
fn requirement_name(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
        return None;
    }
    let end = line
        .find(|c: char| "=<>~!;[ @".contains(c))
        .unwrap_or(line.len());
    let name = line[..end].trim();
    (!name.is_empty()).then(|| name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_package_json() {
        let temp = TempDir::new().unwrap();
        let file = write(
            temp.path(),
            "package.json",
            r#"{"name": "@acme/ui", "private": true,
                "dependencies": {"React": "^18"}, "devDependencies": {"vite": "^5"}}"#,
        );

        let info = ManifestInfo::read(ManifestKind::PackageJson, &file, temp.path()).unwrap();
        assert_eq!(info.package_name.as_deref(), Some("@acme/ui"));
        assert!(info.declares("react"));
        assert!(info.declares("vite"));
        assert!(!info.declares("vue"));
        assert!(!info.publishable);
    }

    #[test]
    fn test_package_json_without_private_is_publishable() {
        let temp = TempDir::new().unwrap();
        let file = write(temp.path(), "package.json", r#"{"name": "utils"}"#);

        let info = ManifestInfo::read(ManifestKind::PackageJson, &file, temp.path()).unwrap();
        assert!(info.publishable);
    }

    #[test]
    fn test_malformed_package_json() {
        let temp = TempDir::new().unwrap();
        let file = write(temp.path(), "package.json", "{ not json");

        let err = ManifestInfo::read(ManifestKind::PackageJson, &file, temp.path()).unwrap_err();
        assert!(matches!(err, NavigatorError::ManifestParse { .. }));
    }

    #[test]
    fn test_requirements_txt() {
        let temp = TempDir::new().unwrap();
        let file = write(
            temp.path(),
            "requirements.txt",
            "# web\nFlask>=2.0\nrequests[socks]==2.31 ; python_version > '3.8'\n-r base.txt\n",
        );

        let info = ManifestInfo::read(ManifestKind::Python, &file, temp.path()).unwrap();
        assert!(info.declares("flask"));
        assert!(info.declares("requests"));
        assert!(!info.declares("base.txt"));
        assert!(!info.publishable);
    }

    #[test]
    fn test_setup_py_falls_back_to_text_search() {
        let temp = TempDir::new().unwrap();
        let file = write(
            temp.path(),
            "setup.py",
            "setup(name='tool', install_requires=['Django>=4'])",
        );

        let info = ManifestInfo::read(ManifestKind::Python, &file, temp.path()).unwrap();
        assert!(info.declares("django"));
        assert!(info.publishable);
    }

    #[test]
    fn test_pyproject() {
        let temp = TempDir::new().unwrap();
        let file = write(
            temp.path(),
            "pyproject.toml",
            "[project]\nname = \"svc\"\ndependencies = [\"fastapi>=0.100\", \"uvicorn\"]\n",
        );

        let info = ManifestInfo::read(ManifestKind::Python, &file, temp.path()).unwrap();
        assert_eq!(info.package_name.as_deref(), Some("svc"));
        assert!(info.declares("fastapi"));
        assert!(info.declares("uvicorn"));
    }

    #[test]
    fn test_go_mod() {
        let temp = TempDir::new().unwrap();
        let file = write(
            temp.path(),
            "go.mod",
            "module github.com/acme/gateway\n\ngo 1.22\n\nrequire (\n\tgithub.com/labstack/echo/v4 v4.11.0\n\t// indirect comment\n)\nrequire golang.org/x/sync v0.5.0\n",
        );

        let info = ManifestInfo::read(ManifestKind::GoMod, &file, temp.path()).unwrap();
        assert_eq!(info.package_name.as_deref(), Some("github.com/acme/gateway"));
        assert!(info.declares("github.com/labstack/echo"));
        assert!(info.declares("golang.org/x/sync"));
        assert!(!info.declares("github.com/gin-gonic/gin"));
    }

    #[test]
    fn test_cargo_toml() {
        let temp = TempDir::new().unwrap();
        let file = write(
            temp.path(),
            "Cargo.toml",
            "[package]\nname = \"engine\"\n\n[dependencies]\naxum = \"0.7\"\n",
        );

        let info = ManifestInfo::read(ManifestKind::Cargo, &file, temp.path()).unwrap();
        assert_eq!(info.package_name.as_deref(), Some("engine"));
        assert!(info.declares("axum"));
        assert!(!info.publishable);

        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/lib.rs"), "").unwrap();
        let info = ManifestInfo::read(ManifestKind::Cargo, &file, temp.path()).unwrap();
        assert!(info.publishable);
    }

    #[test]
    fn test_requirement_name() {
        assert_eq!(requirement_name("numpy"), Some("numpy".to_string()));
        assert_eq!(requirement_name("Pandas~=2.1"), Some("pandas".to_string()));
        assert_eq!(requirement_name("pkg @ https://x"), Some("pkg".to_string()));
        assert_eq!(requirement_name("  # comment"), None);
        assert_eq!(requirement_name("--index-url x"), None);
    }
}
