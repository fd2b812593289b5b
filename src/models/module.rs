// file: src/models/module.rs
// description: detected module record and closed module type enumeration
// reference: internal data structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Best-effort classification of a module. Produced by heuristics, not a manifest contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleType {
    Api,
    Service,
    Web,
    Library,
    StaticSite,
    Utility,
    Docs,
    Config,
    Unknown,
}

impl ModuleType {
    pub const ALL: [ModuleType; 9] = [
        ModuleType::Api,
        ModuleType::Service,
        ModuleType::Web,
        ModuleType::Library,
        ModuleType::StaticSite,
        ModuleType::Utility,
        ModuleType::Docs,
        ModuleType::Config,
        ModuleType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleType::Api => "api",
            ModuleType::Service => "service",
            ModuleType::Web => "web",
            ModuleType::Library => "library",
            ModuleType::StaticSite => "static-site",
            ModuleType::Utility => "utility",
            ModuleType::Docs => "docs",
            ModuleType::Config => "config",
            ModuleType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ModuleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        ModuleType::ALL
            .into_iter()
            .find(|t| t.as_str() == lowered)
            .ok_or_else(|| format!("unknown module type: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub id: String,
    pub name: String,
    /// Relative to the repository root; empty for the whole-repository module.
    pub path: String,
    #[serde(rename = "type")]
    pub module_type: ModuleType,
    pub language: String,
    #[serde(default)]
    pub repo_id: String,
}

impl ModuleInfo {
    pub fn new(
        id: impl Into<String>,
        path: impl Into<String>,
        module_type: ModuleType,
        language: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            path: path.into(),
            module_type,
            language: language.into(),
            repo_id: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn is_catch_all(&self) -> bool {
        self.path.is_empty()
    }
}
