// file: src/detection/rules.rs
// description: swappable heuristic tables driving module type and language detection
// reference: configurable keyword rules in the spirit of category/topic classification

use crate::detection::manifest::ManifestInfo;
use crate::models::ModuleType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestKind {
    PackageJson,
    Python,
    GoMod,
    Cargo,
}

/// One ecosystem: the manifest files that identify it, the language it implies and the
/// ordered rules that pick a module type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestRule {
    pub kind: ManifestKind,
    pub files: Vec<String>,
    pub language: String,
    #[serde(default)]
    pub type_rules: Vec<TypeRule>,
}

impl ManifestRule {
    /// First matching rule wins; no match is `unknown`.
    pub fn classify(&self, dir_name: &str, manifest: &ManifestInfo) -> ModuleType {
        self.type_rules
            .iter()
            .find(|rule| rule.matches(dir_name, manifest))
            .map(|rule| rule.module_type)
            .unwrap_or(ModuleType::Unknown)
    }
}

/// Matches when any one of its conditions holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeRule {
    pub module_type: ModuleType,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub name_prefixes: Vec<String>,
    #[serde(default)]
    pub name_suffixes: Vec<String>,
    #[serde(default)]
    pub name_contains: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Matches manifests that describe a publishable package.
    #[serde(default)]
    pub publishable: bool,
}

impl TypeRule {
    fn new(module_type: ModuleType) -> Self {
        Self {
            module_type,
            names: Vec::new(),
            name_prefixes: Vec::new(),
            name_suffixes: Vec::new(),
            name_contains: Vec::new(),
            dependencies: Vec::new(),
            publishable: false,
        }
    }

    pub fn matches(&self, dir_name: &str, manifest: &ManifestInfo) -> bool {
        let name = dir_name.to_lowercase();

        self.names.iter().any(|n| name == *n)
            || self.name_prefixes.iter().any(|p| name.starts_with(p.as_str()))
            || self.name_suffixes.iter().any(|s| name.ends_with(s.as_str()))
            || self.name_contains.iter().any(|c| name.contains(c.as_str()))
            || self.dependencies.iter().any(|d| manifest.declares(d))
            || (self.publishable && manifest.publishable)
    }

    fn names(mut self, items: &[&str]) -> Self {
        self.names = strings(items);
        self
    }

    fn prefixes(mut self, items: &[&str]) -> Self {
        self.name_prefixes = strings(items);
        self
    }

    fn suffixes(mut self, items: &[&str]) -> Self {
        self.name_suffixes = strings(items);
        self
    }

    fn containing(mut self, items: &[&str]) -> Self {
        self.name_contains = strings(items);
        self
    }

    fn depending_on(mut self, items: &[&str]) -> Self {
        self.dependencies = strings(items);
        self
    }

    fn when_publishable(mut self) -> Self {
        self.publishable = true;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionRules {
    /// Checked in order; the first manifest found in a directory decides its ecosystem.
    pub manifests: Vec<ManifestRule>,
    pub static_site_dirs: Vec<String>,
    pub static_site_index: String,
    pub utility_dirs: Vec<String>,
    pub ignored_dirs: Vec<String>,
    /// Lowercase file extension (without the dot) to language tag.
    pub extensions: BTreeMap<String, String>,
}

impl DetectionRules {
    pub fn language_for_extension(&self, extension: &str) -> Option<&str> {
        self.extensions
            .get(&extension.to_lowercase())
            .map(String::as_str)
    }

    pub fn is_ignored_dir(&self, name: &str) -> bool {
        self.ignored_dirs.iter().any(|ignored| ignored == name)
    }
}

impl Default for DetectionRules {
    fn default() -> Self {
        Self {
            manifests: vec![
                ManifestRule {
                    kind: ManifestKind::PackageJson,
                    files: strings(&["package.json"]),
                    language: "typescript".to_string(),
                    type_rules: vec![
                        TypeRule::new(ModuleType::Web).prefixes(&["web-"]).depending_on(&[
                            "react",
                            "react-dom",
                            "vue",
                            "@angular/core",
                            "svelte",
                            "next",
                            "nuxt",
                            "preact",
                            "solid-js",
                        ]),
                        TypeRule::new(ModuleType::Api)
                            .names(&["api"])
                            .prefixes(&["api-"])
                            .suffixes(&["-api"]),
                        TypeRule::new(ModuleType::Service)
                            .containing(&["service", "server"])
                            .depending_on(&["express", "fastify", "koa", "@nestjs/core", "@hapi/hapi"]),
                        TypeRule::new(ModuleType::Library)
                            .containing(&["lib"])
                            .when_publishable(),
                    ],
                },
                ManifestRule {
                    kind: ManifestKind::Python,
                    files: strings(&["requirements.txt", "setup.py", "pyproject.toml"]),
                    language: "python".to_string(),
                    type_rules: vec![
                        TypeRule::new(ModuleType::Web)
                            .prefixes(&["web-"])
                            .depending_on(&["streamlit", "dash", "gradio"]),
                        TypeRule::new(ModuleType::Api)
                            .names(&["api"])
                            .prefixes(&["api-"])
                            .suffixes(&["-api"])
                            .depending_on(&["fastapi", "djangorestframework"]),
                        TypeRule::new(ModuleType::Service)
                            .containing(&["service", "server"])
                            .depending_on(&["flask", "django", "aiohttp", "tornado", "sanic"]),
                        TypeRule::new(ModuleType::Library)
                            .containing(&["lib"])
                            .when_publishable(),
                    ],
                },
                ManifestRule {
                    kind: ManifestKind::GoMod,
                    files: strings(&["go.mod"]),
                    language: "go".to_string(),
                    type_rules: vec![
                        TypeRule::new(ModuleType::Web).prefixes(&["web-"]),
                        TypeRule::new(ModuleType::Api)
                            .names(&["api"])
                            .prefixes(&["api-"])
                            .suffixes(&["-api"]),
                        TypeRule::new(ModuleType::Service)
                            .containing(&["service", "server"])
                            .depending_on(&[
                                "github.com/gin-gonic/gin",
                                "github.com/labstack/echo",
                                "github.com/gofiber/fiber",
                                "github.com/gorilla/mux",
                                "github.com/go-chi/chi",
                                "google.golang.org/grpc",
                            ]),
                        TypeRule::new(ModuleType::Library).containing(&["lib", "pkg"]),
                    ],
                },
                ManifestRule {
                    kind: ManifestKind::Cargo,
                    files: strings(&["Cargo.toml"]),
                    language: "rust".to_string(),
                    type_rules: vec![
                        TypeRule::new(ModuleType::Web)
                            .prefixes(&["web-"])
                            .depending_on(&["yew", "leptos", "dioxus", "sycamore"]),
                        TypeRule::new(ModuleType::Api)
                            .names(&["api"])
                            .prefixes(&["api-"])
                            .suffixes(&["-api"]),
                        TypeRule::new(ModuleType::Service)
                            .containing(&["service", "server"])
                            .depending_on(&[
                                "axum",
                                "actix-web",
                                "rocket",
                                "warp",
                                "tonic",
                                "hyper",
                                "poem",
                            ]),
                        TypeRule::new(ModuleType::Library)
                            .containing(&["lib"])
                            .when_publishable(),
                    ],
                },
            ],
            static_site_dirs: strings(&["docs", "website", "gh-pages", "static"]),
            static_site_index: "index.html".to_string(),
            utility_dirs: strings(&["scripts", "examples", "tools", "config", "utils"]),
            ignored_dirs: strings(&[
                "node_modules",
                "target",
                "dist",
                "build",
                "out",
                ".git",
                ".svn",
                ".hg",
                "__pycache__",
                ".venv",
                "venv",
                "vendor",
                "coverage",
                ".next",
                ".cache",
            ]),
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> BTreeMap<String, String> {
    [
        ("ts", "typescript"),
        ("tsx", "typescript"),
        ("js", "javascript"),
        ("jsx", "javascript"),
        ("mjs", "javascript"),
        ("cjs", "javascript"),
        ("py", "python"),
        ("go", "go"),
        ("rs", "rust"),
        ("java", "java"),
        ("kt", "kotlin"),
        ("rb", "ruby"),
        ("php", "php"),
        ("cs", "csharp"),
        ("c", "c"),
        ("h", "c"),
        ("cpp", "cpp"),
        ("cc", "cpp"),
        ("hpp", "cpp"),
        ("swift", "swift"),
        ("scala", "scala"),
        ("md", "markdown"),
        ("mdx", "markdown"),
        ("html", "html"),
        ("htm", "html"),
        ("css", "css"),
        ("scss", "css"),
        ("sh", "shell"),
        ("bash", "shell"),
    ]
    .into_iter()
    .map(|(ext, lang)| (ext.to_string(), lang.to_string()))
    .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_priority_order() {
        let rules = DetectionRules::default();
        let kinds: Vec<ManifestKind> = rules.manifests.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ManifestKind::PackageJson,
                ManifestKind::Python,
                ManifestKind::GoMod,
                ManifestKind::Cargo
            ]
        );
    }

    #[test]
    fn test_extension_lookup_is_case_insensitive() {
        let rules = DetectionRules::default();
        assert_eq!(rules.language_for_extension("TS"), Some("typescript"));
        assert_eq!(rules.language_for_extension("py"), Some("python"));
        assert_eq!(rules.language_for_extension("lock"), None);
    }

    #[test]
    fn test_name_rules() {
        let manifest = ManifestInfo::empty(ManifestKind::PackageJson);
        let rule = TypeRule::new(ModuleType::Api)
            .names(&["api"])
            .prefixes(&["api-"])
            .suffixes(&["-api"]);

        assert!(rule.matches("api", &manifest));
        assert!(rule.matches("API-gateway", &manifest));
        assert!(rule.matches("billing-api", &manifest));
        assert!(!rule.matches("rapid", &manifest));
    }

    #[test]
    fn test_rules_deserialize_from_toml() {
        let rules: DetectionRules = toml::from_str(
            r#"
            static_site_dirs = ["site"]

            [[manifests]]
            kind = "package_json"
            files = ["package.json"]
            language = "javascript"

            [[manifests.type_rules]]
            module_type = "static-site"
            dependencies = ["gatsby"]
            "#,
        )
        .unwrap();

        assert_eq!(rules.static_site_dirs, vec!["site"]);
        assert_eq!(rules.manifests.len(), 1);
        assert_eq!(
            rules.manifests[0].type_rules[0].module_type,
            ModuleType::StaticSite
        );
        // untouched tables keep their defaults
        assert_eq!(rules.static_site_index, "index.html");
        assert!(rules.is_ignored_dir("node_modules"));
    }
}
