// file: src/detection/detector.rs
// description: classifies a repository's top-level directories into modules in three passes
// reference: directory scanning with per-entry error tolerance

use crate::detection::language::LanguageDetector;
use crate::detection::manifest::ManifestInfo;
use crate::detection::rules::DetectionRules;
use crate::error::{NavigatorError, Result};
use crate::models::{ModuleInfo, ModuleType};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

pub const CATCH_ALL_MODULE_ID: &str = "root";

#[derive(Debug, Clone, Default)]
pub struct ModuleDetector {
    rules: DetectionRules,
}

impl ModuleDetector {
    pub fn new(rules: DetectionRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &DetectionRules {
        &self.rules
    }

    /// Runs the manifest, static-site and utility passes over the top-level directories of
    /// `repo_root`. A directory claimed by an earlier pass is not revisited. When nothing is
    /// found, a single catch-all module covering the whole repository is returned.
    pub fn detect(&self, repo_root: &Path) -> Result<Vec<ModuleInfo>> {
        info!("Detecting modules in {}", repo_root.display());

        let dirs = self.top_level_dirs(repo_root)?;
        let mut modules = Vec::new();
        let mut claimed = BTreeSet::new();

        for dir in &dirs {
            match self.detect_manifest_module(repo_root, dir) {
                Ok(Some(module)) => {
                    claimed.insert(dir.clone());
                    modules.push(module);
                }
                Ok(None) => {}
                Err(e) => warn!("Skipping {}: {}", repo_root.join(dir).display(), e),
            }
        }

        for candidate in &self.rules.static_site_dirs {
            if !dirs.contains(candidate) || claimed.contains(candidate) {
                continue;
            }
            match self.detect_static_site(repo_root, candidate) {
                Ok(Some(module)) => {
                    claimed.insert(candidate.clone());
                    modules.push(module);
                }
                Ok(None) => {}
                Err(e) => warn!("Skipping {}: {}", repo_root.join(candidate).display(), e),
            }
        }

        for candidate in &self.rules.utility_dirs {
            if !dirs.contains(candidate) || claimed.contains(candidate) {
                continue;
            }
            let language = self.detect_language(&repo_root.join(candidate));
            debug!("Utility module {} ({})", candidate, language);
            claimed.insert(candidate.clone());
            modules.push(ModuleInfo::new(
                candidate.clone(),
                candidate.clone(),
                ModuleType::Utility,
                language,
            ));
        }

        if modules.is_empty() {
            let name = repo_root
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| CATCH_ALL_MODULE_ID.to_string());
            let language = self.detect_language(repo_root);
            debug!("No modules found, using catch-all ({})", language);
            modules.push(
                ModuleInfo::new(CATCH_ALL_MODULE_ID, "", ModuleType::Unknown, language)
                    .with_name(name),
            );
        }

        info!(
            "Detected {} modules in {}",
            modules.len(),
            repo_root.display()
        );
        Ok(modules)
    }

    pub fn detect_language(&self, dir: &Path) -> String {
        LanguageDetector::new(&self.rules).detect(dir)
    }

    /// Names of non-hidden top-level directories, sorted. Entries that cannot be inspected
    /// are logged and left out.
    fn top_level_dirs(&self, repo_root: &Path) -> Result<BTreeSet<String>> {
        let entries =
            fs::read_dir(repo_root).map_err(|e| NavigatorError::file_system(repo_root, e))?;

        let mut dirs = BTreeSet::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to read entry in {}: {}", repo_root.display(), e);
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }

            match fs::metadata(entry.path()) {
                Ok(metadata) if metadata.is_dir() => {
                    dirs.insert(name);
                }
                Ok(_) => {}
                Err(e) => warn!("Failed to stat {}: {}", entry.path().display(), e),
            }
        }
        Ok(dirs)
    }

    fn detect_manifest_module(&self, repo_root: &Path, dir: &str) -> Result<Option<ModuleInfo>> {
        let module_dir = repo_root.join(dir);

        for rule in &self.rules.manifests {
            let Some(file) = rule
                .files
                .iter()
                .map(|f| module_dir.join(f))
                .find(|path| path.is_file())
            else {
                continue;
            };

            let manifest = ManifestInfo::read(rule.kind, &file, &module_dir)?;
            let module_type = rule.classify(dir, &manifest);
            debug!(
                "{} -> {} ({:?}, {})",
                dir,
                module_type,
                rule.kind,
                file.display()
            );

            let module = ModuleInfo::new(dir, dir, module_type, rule.language.clone());
            return Ok(Some(match manifest.package_name {
                Some(name) => module.with_name(name),
                None => module,
            }));
        }

        Ok(None)
    }

    fn detect_static_site(&self, repo_root: &Path, dir: &str) -> Result<Option<ModuleInfo>> {
        let site_dir = repo_root.join(dir);
        let entries =
            fs::read_dir(&site_dir).map_err(|e| NavigatorError::file_system(&site_dir, e))?;

        let mut has_index = false;
        let mut has_markdown = false;
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().to_lowercase();
            if file_name == self.rules.static_site_index {
                has_index = true;
            }
            if path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("md"))
            {
                has_markdown = true;
            }
        }

        if !has_index && !has_markdown {
            debug!("{} has no index or markdown, not a static site", dir);
            return Ok(None);
        }

        let language = if has_markdown { "markdown" } else { "html" };
        Ok(Some(ModuleInfo::new(
            dir,
            dir,
            ModuleType::StaticSite,
            language,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn summary(modules: &[ModuleInfo]) -> Vec<(String, String, ModuleType, String)> {
        modules
            .iter()
            .map(|m| (m.id.clone(), m.path.clone(), m.module_type, m.language.clone()))
            .collect()
    }

    #[test]
    fn test_ui_dependency_yields_single_web_module() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "frontend/package.json",
            r#"{"private": true, "dependencies": {"react": "^18.2.0"}}"#,
        );

        let modules = ModuleDetector::default().detect(temp.path()).unwrap();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].module_type, ModuleType::Web);
        assert_eq!(modules[0].language, "typescript");
        assert_eq!(modules[0].path, "frontend");
    }

    #[test]
    fn test_empty_repository_yields_catch_all() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "main.py", "print('hi')");
        write(temp.path(), "src/other.py", "");
        write(temp.path(), ".hidden/package.json", "{}");

        let modules = ModuleDetector::default().detect(temp.path()).unwrap();
        assert_eq!(modules.len(), 1);
        let module = &modules[0];
        assert_eq!(module.id, CATCH_ALL_MODULE_ID);
        assert_eq!(module.path, "");
        assert_eq!(module.module_type, ModuleType::Unknown);
        assert_eq!(module.language, "python");
        assert!(module.is_catch_all());
    }

    #[test]
    fn test_docs_and_scripts() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "docs/index.html", "<html></html>");
        write(temp.path(), "scripts/deploy.py", "");
        write(temp.path(), "scripts/lib/helpers.py", "");

        let modules = ModuleDetector::default().detect(temp.path()).unwrap();
        assert_eq!(
            summary(&modules),
            vec![
                (
                    "docs".to_string(),
                    "docs".to_string(),
                    ModuleType::StaticSite,
                    "html".to_string()
                ),
                (
                    "scripts".to_string(),
                    "scripts".to_string(),
                    ModuleType::Utility,
                    "python".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_markdown_site_and_unqualified_docs() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "website/intro.md", "# Intro");
        write(temp.path(), "website/index.html", "");
        write(temp.path(), "static/logo.png", "");

        let modules = ModuleDetector::default().detect(temp.path()).unwrap();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].id, "website");
        assert_eq!(modules[0].language, "markdown");
    }

    #[test]
    fn test_manifest_priority_first_match_wins() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "tooling/package.json", r#"{"private": true}"#);
        write(temp.path(), "tooling/Cargo.toml", "[package]\nname = \"tooling\"\n");

        let modules = ModuleDetector::default().detect(temp.path()).unwrap();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].language, "typescript");
    }

    #[test]
    fn test_manifest_type_heuristics() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "web-admin/package.json", r#"{"private": true}"#);
        write(temp.path(), "api/package.json", r#"{"private": true}"#);
        write(
            temp.path(),
            "gateway/package.json",
            r#"{"private": true, "dependencies": {"express": "4"}}"#,
        );
        write(temp.path(), "shared/package.json", r#"{"name": "@acme/shared"}"#);
        write(temp.path(), "misc/package.json", r#"{"private": true}"#);
        write(temp.path(), "billing/requirements.txt", "flask==3.0\n");
        write(temp.path(), "worker/go.mod", "module example.com/worker\n");
        write(
            temp.path(),
            "engine/Cargo.toml",
            "[package]\nname = \"engine\"\n[dependencies]\naxum = \"0.7\"\n",
        );

        let modules = ModuleDetector::default().detect(temp.path()).unwrap();
        let types: Vec<(&str, ModuleType, &str)> = modules
            .iter()
            .map(|m| (m.id.as_str(), m.module_type, m.language.as_str()))
            .collect();

        assert_eq!(
            types,
            vec![
                ("api", ModuleType::Api, "typescript"),
                ("billing", ModuleType::Service, "python"),
                ("engine", ModuleType::Service, "rust"),
                ("gateway", ModuleType::Service, "typescript"),
                ("misc", ModuleType::Unknown, "typescript"),
                ("shared", ModuleType::Library, "typescript"),
                ("web-admin", ModuleType::Web, "typescript"),
                ("worker", ModuleType::Unknown, "go"),
            ]
        );

        let shared = modules.iter().find(|m| m.id == "shared").unwrap();
        assert_eq!(shared.name, "@acme/shared");
    }

    #[test]
    fn test_manifest_directory_not_reclaimed_by_later_passes() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "docs/package.json",
            r#"{"private": true, "dependencies": {"react": "18"}}"#,
        );
        write(temp.path(), "docs/index.html", "");
        write(temp.path(), "tools/package.json", r#"{"private": true}"#);

        let modules = ModuleDetector::default().detect(temp.path()).unwrap();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].module_type, ModuleType::Web);
        assert_eq!(modules[1].module_type, ModuleType::Unknown);
    }

    #[test]
    fn test_broken_manifest_is_skipped() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "broken/package.json", "{");
        write(temp.path(), "tools/build.sh", "");

        let modules = ModuleDetector::default().detect(temp.path()).unwrap();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].id, "tools");
        assert_eq!(modules[0].module_type, ModuleType::Utility);
        assert_eq!(modules[0].language, "shell");
    }

    #[test]
    fn test_missing_root_is_error() {
        let temp = TempDir::new().unwrap();
        let err = ModuleDetector::default()
            .detect(&temp.path().join("missing"))
            .unwrap_err();
        assert!(matches!(err, NavigatorError::FileSystemAccess { .. }));
    }

    #[test]
    fn test_custom_rules() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "handbook/index.html", "");

        let mut rules = DetectionRules::default();
        rules.static_site_dirs = vec!["handbook".to_string()];

        let modules = ModuleDetector::new(rules).detect(temp.path()).unwrap();
        assert_eq!(modules[0].module_type, ModuleType::StaticSite);
    }
}
