// file: src/registry/repository.rs
// description: repository id to root path registry with default and working directory tracking
// reference: workspace root mapping for a virtual multi-repository file system

use crate::config::Config;
use crate::error::{NavigatorError, Result};
use crate::models::RepositoryConfig;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

lazy_static! {
    static ref REPO_ID: Regex =
        Regex::new(r"^[a-z0-9][a-z0-9._-]*$").expect("REPO_ID regex is valid");
}

/// Lowercases a candidate id and checks it is a slug.
pub fn normalize_repo_id(id: &str) -> Result<String> {
    let id = id.trim().to_lowercase();
    if !REPO_ID.is_match(&id) {
        return Err(NavigatorError::InvalidRepositoryId(id));
    }
    Ok(id)
}

/// Derives a repository id from a directory name, replacing anything outside the slug
/// alphabet with `-`.
pub fn slug_from_path(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy().to_lowercase();
    let slug: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let slug = slug.trim_start_matches(['-', '_', '.']).to_string();
    (!slug.is_empty()).then_some(slug)
}

#[derive(Debug, Clone)]
pub struct RepositoryRegistry {
    base_dir: PathBuf,
    repositories: BTreeMap<String, RepositoryConfig>,
    default_id: Option<String>,
    working_directory: PathBuf,
}

impl RepositoryRegistry {
    /// `base_dir` is the fixed root that relative repository paths are joined onto and
    /// that the working directory is reset to.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            working_directory: base_dir.clone(),
            base_dir,
            repositories: BTreeMap::new(),
            default_id: None,
        }
    }

    /// Registers every configured repository, skipping (and logging) entries that fail,
    /// then applies the legacy default override.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut registry = Self::new(config.base_dir()?);

        for entry in &config.repositories {
            let repo = RepositoryConfig::new(entry.id.clone(), entry.path.clone())
                .with_display_name(entry.display_name.clone().unwrap_or_else(|| entry.id.clone()));
            if let Err(e) = registry.register(repo) {
                warn!("Skipping repository '{}': {}", entry.id, e);
            }
        }

        if let Some(path) = &config.default_repository {
            match registry.register_default_path(path) {
                Ok(id) => info!("Default repository forced to '{}'", id),
                Err(e) => warn!(
                    "Ignoring default repository override {}: {}",
                    path.display(),
                    e
                ),
            }
        }

        info!(
            "Registered {} repositories (default: {})",
            registry.len(),
            registry.default_id().unwrap_or("none")
        );
        Ok(registry)
    }

    pub fn register(&mut self, config: RepositoryConfig) -> Result<()> {
        let id = normalize_repo_id(&config.id)?;
        let root_path = self.absolute(&config.root_path);

        let metadata =
            fs::metadata(&root_path).map_err(|e| NavigatorError::file_system(&root_path, e))?;
        if !metadata.is_dir() {
            return Err(NavigatorError::NotADirectory(root_path));
        }

        if self.repositories.contains_key(&id) {
            debug!("Replacing registration for repository '{}'", id);
        }

        info!("Registered repository '{}' at {}", id, root_path.display());
        self.repositories.insert(
            id.clone(),
            RepositoryConfig {
                id: id.clone(),
                root_path,
                display_name: config.display_name,
            },
        );

        if self.default_id.is_none() {
            self.default_id = Some(id);
        }
        Ok(())
    }

    /// Looks up `id`, or the default repository when `id` is `None`.
    pub fn get(&self, id: Option<&str>) -> Option<&RepositoryConfig> {
        match id {
            Some(id) => self.repositories.get(&id.trim().to_lowercase()),
            None => self
                .default_id
                .as_ref()
                .and_then(|id| self.repositories.get(id)),
        }
    }

    /// Same as [`get`](Self::get) with a named repository, but an unknown id is an error.
    pub fn require(&self, id: &str) -> Result<&RepositoryConfig> {
        self.get(Some(id))
            .ok_or_else(|| NavigatorError::UnknownRepository {
                repo_id: id.to_string(),
                available: self.ids(),
            })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(Some(id)).is_some()
    }

    pub fn default_id(&self) -> Option<&str> {
        self.default_id.as_deref()
    }

    pub fn set_default(&mut self, id: &str) -> Result<()> {
        let id = self.require(id)?.id.clone();
        self.default_id = Some(id);
        Ok(())
    }

    pub fn ids(&self) -> Vec<String> {
        self.repositories.keys().cloned().collect()
    }

    pub fn repositories(&self) -> impl Iterator<Item = &RepositoryConfig> {
        self.repositories.values()
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Finds the repository whose root contains `path`. The deepest root wins when
    /// repositories are nested.
    pub fn find_by_root(&self, path: &Path) -> Option<&RepositoryConfig> {
        let path = self.absolute(path);
        self.repositories
            .values()
            .filter(|repo| path.starts_with(&repo.root_path))
            .max_by_key(|repo| repo.root_path.components().count())
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    pub fn reset_working_directory(&mut self) {
        self.working_directory = self.base_dir.clone();
    }

    /// Switches the working directory to a repository root. Always returns to the base
    /// directory first, so an unknown id leaves the working directory at the base.
    pub fn use_as_working_directory(&mut self, id: &str) -> Result<&Path> {
        self.reset_working_directory();
        let root = self.require(id)?.root_path.clone();
        debug!("Working directory -> {}", root.display());
        self.working_directory = root;
        Ok(&self.working_directory)
    }

    fn register_default_path(&mut self, path: &Path) -> Result<String> {
        let root = self.absolute(path);
        let root = root
            .canonicalize()
            .map_err(|e| NavigatorError::file_system(&root, e))?;

        let existing = self
            .repositories
            .values()
            .find(|repo| repo.root_path.canonicalize().ok().as_deref() == Some(root.as_path()))
            .map(|repo| repo.id.clone());

        let id = match existing {
            Some(id) => id,
            None => {
                let slug = slug_from_path(&root).unwrap_or_else(|| "default".to_string());
                let id = self.unused_id(&slug);
                if id != slug {
                    warn!(
                        "Repository id '{}' is taken, registering {} as '{}'",
                        slug,
                        root.display(),
                        id
                    );
                }
                self.register(RepositoryConfig::new(id.clone(), root))?;
                id
            }
        };

        self.set_default(&id)?;
        Ok(id)
    }

    /// `slug`, or `slug-2`, `slug-3`, ... when it is already registered.
    fn unused_id(&self, slug: &str) -> String {
        if !self.repositories.contains_key(slug) {
            return slug.to_string();
        }
        (2..)
            .map(|n| format!("{}-{}", slug, n))
            .find(|id| !self.repositories.contains_key(id))
            .unwrap_or_else(|| slug.to_string())
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}
