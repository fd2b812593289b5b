// file: src/path/resolver.rs
// description: maps repository-qualified addresses to real paths on disk and back
// reference: virtual file system path resolution

use crate::error::{NavigatorError, Result};
use crate::path::reference::PathReference;
use crate::registry::RepositoryRegistry;
use std::fs;
use std::path::{Component, Path, PathBuf};

pub struct PathResolver<'a> {
    repositories: &'a RepositoryRegistry,
}

impl<'a> PathResolver<'a> {
    pub fn new(repositories: &'a RepositoryRegistry) -> Self {
        Self { repositories }
    }

    /// Resolves an address to `<repository root>/<relative path>`. Callers are expected to
    /// have run [`validate`](crate::path::validate) first, so an unknown repository here is
    /// an error rather than a validation message.
    pub fn resolve(&self, address: &str) -> Result<PathBuf> {
        let reference = PathReference::parse(address)?;
        self.resolve_reference(&reference)
    }

    pub fn resolve_reference(&self, reference: &PathReference) -> Result<PathBuf> {
        let repo_id = reference
            .effective_repo_id(self.repositories.default_id())
            .ok_or_else(|| NavigatorError::UnknownRepository {
                repo_id: "(default)".to_string(),
                available: self.repositories.ids(),
            })?;
        let repo = self.repositories.require(repo_id)?;

        let relative = reference.relative_path();
        if relative.is_empty() {
            return Ok(repo.root_path.clone());
        }
        // Path::join replaces the base when handed an absolute path.
        if Path::new(relative)
            .components()
            .any(|c| matches!(c, Component::RootDir | Component::Prefix(_)))
        {
            return Err(NavigatorError::path_format(
                &reference.to_absolute(Some(&repo.id)),
                "relative path must not be absolute",
            ));
        }
        Ok(repo.root_path.join(relative))
    }

    /// Resolves and requires an existing regular file.
    pub fn resolve_file(&self, address: &str) -> Result<PathBuf> {
        let path = self.resolve(address)?;
        let metadata = fs::metadata(&path).map_err(|e| NavigatorError::file_system(&path, e))?;
        if !metadata.is_file() {
            return Err(NavigatorError::NotAFile(path));
        }
        Ok(path)
    }

    /// Resolves and requires an existing directory.
    pub fn resolve_directory(&self, address: &str) -> Result<PathBuf> {
        let path = self.resolve(address)?;
        let metadata = fs::metadata(&path).map_err(|e| NavigatorError::file_system(&path, e))?;
        if !metadata.is_dir() {
            return Err(NavigatorError::NotADirectory(path));
        }
        Ok(path)
    }

    /// Converts a real path inside a registered repository to its `/<repo>/<relative>`
    /// address.
    pub fn to_address(&self, real_path: &Path) -> Result<String> {
        let repo = self.repositories.find_by_root(real_path).ok_or_else(|| {
            NavigatorError::path_format(
                &real_path.display().to_string(),
                "not inside any registered repository",
            )
        })?;

        let absolute = if real_path.is_absolute() {
            real_path.to_path_buf()
        } else {
            self.repositories.base_dir().join(real_path)
        };
        let relative = absolute
            .strip_prefix(&repo.root_path)
            .unwrap_or(Path::new(""));

        let segments: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy().to_string()),
                _ => None,
            })
            .collect();

        Ok(format!("/{}/{}", repo.id, segments.join("/")))
    }
}
