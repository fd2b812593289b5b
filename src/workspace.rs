// file: src/workspace.rs
// description: composition root owning the repository and module registries
// reference: coordinates repository registration and sequential module detection

use crate::config::Config;
use crate::detection::ModuleDetector;
use crate::error::{NavigatorError, Result};
use crate::models::ModuleInfo;
use crate::path::{PathResolver, ValidationResult, validate};
use crate::registry::{ModuleRegistry, RepositoryRegistry};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Registries are only mutated through `&mut self`; once [`initialize`](Self::initialize)
/// returns every registered repository has been scanned.
pub struct Workspace {
    repositories: RepositoryRegistry,
    modules: ModuleRegistry,
    detector: Arc<ModuleDetector>,
}

impl Workspace {
    pub fn new(repositories: RepositoryRegistry, detector: ModuleDetector) -> Self {
        Self {
            repositories,
            modules: ModuleRegistry::new(),
            detector: Arc::new(detector),
        }
    }

    pub async fn initialize(config: &Config) -> Result<Self> {
        let repositories = RepositoryRegistry::from_config(config)?;
        let mut workspace = Self::new(repositories, ModuleDetector::new(config.detection.clone()));
        workspace.detect_all().await;
        Ok(workspace)
    }

    /// Scans every repository, one at a time. A repository that fails is logged and keeps
    /// no modules. Returns the total number of modules registered.
    pub async fn detect_all(&mut self) -> usize {
        for repo_id in self.repositories.ids() {
            if let Err(e) = self.detect_repository(&repo_id).await {
                warn!("Module detection failed for '{}': {}", repo_id, e);
                self.modules.replace_repository(&repo_id, vec![]);
            }
        }

        info!(
            "Detected {} modules across {} repositories",
            self.modules.len(),
            self.repositories.len()
        );
        self.modules.len()
    }

    /// Replaces the module set of one repository with a fresh detection pass.
    pub async fn rescan(&mut self, repo_id: &str) -> Result<Vec<ModuleInfo>> {
        self.detect_repository(repo_id).await
    }

    async fn detect_repository(&mut self, repo_id: &str) -> Result<Vec<ModuleInfo>> {
        let repo_id = self.repositories.require(repo_id)?.id.clone();
        let root = self
            .repositories
            .use_as_working_directory(&repo_id)?
            .to_path_buf();

        let detector = Arc::clone(&self.detector);
        let detected = tokio::task::spawn_blocking(move || detector.detect(&root)).await;
        self.repositories.reset_working_directory();

        let modules = detected.map_err(|e| NavigatorError::Task(e.to_string()))??;
        self.modules.replace_repository(&repo_id, modules);
        Ok(self.modules.get_by_repo(&repo_id))
    }

    pub fn repositories(&self) -> &RepositoryRegistry {
        &self.repositories
    }

    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    pub fn resolver(&self) -> PathResolver<'_> {
        PathResolver::new(&self.repositories)
    }

    pub fn validate(&self, address: &str) -> ValidationResult {
        validate(address, &self.repositories)
    }

    pub fn resolve(&self, address: &str) -> Result<PathBuf> {
        self.resolver().resolve(address)
    }

    /// Module lookup by id in `repo_id`, or in the default repository when omitted.
    pub fn module(&self, module_id: &str, repo_id: Option<&str>) -> Option<&ModuleInfo> {
        let repo = self.repositories.get(repo_id)?;
        self.modules.get_by_id(module_id, &repo.id)
    }
}
