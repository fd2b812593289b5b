// file: src/registry/module.rs
// description: per-repository store of detected modules with exact and fuzzy lookup
// reference: internal registry structure

use crate::models::ModuleInfo;
use std::collections::BTreeMap;
use tracing::debug;

/// Modules keyed by repository id, then module id. Ordered maps keep lookups that
/// scan across repositories deterministic: repository id first, then module id.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: BTreeMap<String, BTreeMap<String, ModuleInfo>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, repo_id: &str, mut module: ModuleInfo) {
        module.repo_id = repo_id.to_string();
        self.modules
            .entry(repo_id.to_string())
            .or_default()
            .insert(module.id.clone(), module);
    }

    /// Swaps out the full module set of a repository.
    pub fn replace_repository(&mut self, repo_id: &str, modules: Vec<ModuleInfo>) {
        self.modules.remove(repo_id);
        for module in modules {
            self.register(repo_id, module);
        }
        debug!(
            "Repository '{}' now has {} modules",
            repo_id,
            self.modules.get(repo_id).map_or(0, BTreeMap::len)
        );
    }

    pub fn get_by_repo(&self, repo_id: &str) -> Vec<ModuleInfo> {
        self.modules
            .get(repo_id)
            .map(|modules| modules.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn get_by_id(&self, module_id: &str, repo_id: &str) -> Option<&ModuleInfo> {
        self.modules.get(repo_id)?.get(module_id)
    }

    /// Searches every repository in three tiers, stopping at the first tier with a hit:
    /// exact id, exact name or id, then case-insensitive substring of name or id. A blank
    /// name matches nothing.
    pub fn get_by_name(&self, name: &str) -> Option<&ModuleInfo> {
        if name.trim().is_empty() {
            return None;
        }

        if let Some(module) = self.all().find(|m| m.id == name) {
            return Some(module);
        }

        if let Some(module) = self.all().find(|m| m.name == name || m.id == name) {
            return Some(module);
        }

        let needle = name.to_lowercase();
        self.all().find(|m| {
            m.name.to_lowercase().contains(&needle) || m.id.to_lowercase().contains(&needle)
        })
    }

    /// The module with the longest path containing `relative_path`, matched on whole
    /// segments. The catch-all module contains everything.
    pub fn module_for_path(&self, repo_id: &str, relative_path: &str) -> Option<&ModuleInfo> {
        let relative = relative_path.trim_matches('/');
        self.modules
            .get(repo_id)?
            .values()
            .filter(|m| {
                m.is_catch_all()
                    || relative == m.path
                    || relative.starts_with(&format!("{}/", m.path))
            })
            .max_by_key(|m| m.path.len())
    }

    pub fn all(&self) -> impl Iterator<Item = &ModuleInfo> {
        self.modules.values().flat_map(|modules| modules.values())
    }

    pub fn len(&self) -> usize {
        self.modules.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModuleType;
    use pretty_assertions::assert_eq;

    fn module(id: &str) -> ModuleInfo {
        ModuleInfo::new(id, id, ModuleType::Service, "typescript")
    }

    #[test]
    fn test_register_stamps_repo_id() {
        let mut registry = ModuleRegistry::new();
        registry.register("demo", module("api"));

        let stored = registry.get_by_id("api", "demo").unwrap();
        assert_eq!(stored.repo_id, "demo");
        assert!(registry.get_by_id("api", "other").is_none());
    }

    #[test]
    fn test_register_overwrites_same_id() {
        let mut registry = ModuleRegistry::new();
        registry.register("demo", module("api"));
        registry.register(
            "demo",
            ModuleInfo::new("api", "api", ModuleType::Api, "go"),
        );

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get_by_id("api", "demo").unwrap().language, "go");
    }

    #[test]
    fn test_exact_id_beats_substring() {
        let mut registry = ModuleRegistry::new();
        registry.register("demo", module("api-gateway"));
        registry.register("demo", module("api"));

        assert_eq!(registry.get_by_name("api").unwrap().id, "api");
    }

    #[test]
    fn test_exact_id_in_later_repository_beats_substring_in_earlier() {
        let mut registry = ModuleRegistry::new();
        registry.register("alpha", module("web-api"));
        registry.register("beta", module("api"));

        let found = registry.get_by_name("api").unwrap();
        assert_eq!(found.repo_id, "beta");
        assert_eq!(found.id, "api");
    }

    #[test]
    fn test_name_match_and_fuzzy_fallback() {
        let mut registry = ModuleRegistry::new();
        registry.register("demo", module("svc").with_name("Billing"));
        registry.register("demo", module("frontend"));

        assert_eq!(registry.get_by_name("Billing").unwrap().id, "svc");
        assert_eq!(registry.get_by_name("BILL").unwrap().id, "svc");
        assert_eq!(registry.get_by_name("front").unwrap().id, "frontend");
        assert!(registry.get_by_name("nothing").is_none());
    }

    #[test]
    fn test_blank_name_matches_nothing() {
        let mut registry = ModuleRegistry::new();
        registry.register("demo", module("api"));

        assert!(registry.get_by_name("").is_none());
        assert!(registry.get_by_name("   ").is_none());
    }

    #[test]
    fn test_fuzzy_tie_breaks_by_repo_then_id() {
        let mut registry = ModuleRegistry::new();
        registry.register("beta", module("core-lib"));
        registry.register("alpha", module("web-lib"));
        registry.register("alpha", module("auth-lib"));

        let found = registry.get_by_name("lib").unwrap();
        assert_eq!((found.repo_id.as_str(), found.id.as_str()), ("alpha", "auth-lib"));
    }

    #[test]
    fn test_module_for_path() {
        let mut registry = ModuleRegistry::new();
        registry.register("demo", module("web"));
        registry.register("demo", module("web-admin"));

        assert_eq!(
            registry.module_for_path("demo", "web/src/app.tsx").unwrap().id,
            "web"
        );
        assert_eq!(
            registry.module_for_path("demo", "web-admin/index.ts").unwrap().id,
            "web-admin"
        );
        assert_eq!(registry.module_for_path("demo", "web").unwrap().id, "web");
        assert!(registry.module_for_path("demo", "docs/a.md").is_none());

        registry.register(
            "solo",
            ModuleInfo::new("root", "", ModuleType::Unknown, "go"),
        );
        assert_eq!(
            registry.module_for_path("solo", "cmd/main.go").unwrap().id,
            "root"
        );
    }

    #[test]
    fn test_replace_repository_drops_old_modules() {
        let mut registry = ModuleRegistry::new();
        registry.register("demo", module("old"));
        registry.register("other", module("keep"));

        registry.replace_repository("demo", vec![module("new-a"), module("new-b")]);

        let ids: Vec<String> = registry
            .get_by_repo("demo")
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["new-a", "new-b"]);
        assert_eq!(registry.len(), 3);
        assert!(registry.get_by_repo("missing").is_empty());
    }
}
