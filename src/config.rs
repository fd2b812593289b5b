// file: src/config.rs
// description: application configuration management with toml and environment support
// reference: https://docs.rs/config

use crate::detection::DetectionRules;
use crate::error::{NavigatorError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const REPO_PATH_PREFIX: &str = "REPO_PATH_";
pub const REPO_NAME_PREFIX: &str = "REPO_NAME_";
pub const LEGACY_REPOSITORY_PATH: &str = "REPOSITORY_PATH";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Fixed root that relative repository paths are resolved against. Defaults to the
    /// process working directory at startup.
    pub base_dir: Option<PathBuf>,
    /// Repository forced to be the default regardless of registration order.
    pub default_repository: Option<PathBuf>,
    pub repositories: Vec<RepositoryEntry>,
    pub detection: DetectionRules,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RepositoryEntry {
    pub id: String,
    pub path: PathBuf,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
    pub instructions: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "repo_navigator".to_string(),
            instructions: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new("config/default.toml")).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("REPO_NAVIGATOR")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| NavigatorError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| NavigatorError::Config(e.to_string()))?;

        config.apply_env(std::env::vars());
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            base_dir: None,
            default_repository: None,
            repositories: vec![],
            detection: DetectionRules::default(),
            server: ServerConfig::default(),
        }
    }

    /// Merges `REPO_PATH_<ID>` / `REPO_NAME_<ID>` pairs and the legacy `REPOSITORY_PATH`
    /// override. Environment entries are appended in id order after file entries.
    pub fn apply_env<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut paths = BTreeMap::new();
        let mut names = BTreeMap::new();

        for (key, value) in vars {
            if let Some(id) = key.strip_prefix(REPO_PATH_PREFIX) {
                if id.is_empty() || value.trim().is_empty() {
                    warn!("Ignoring empty repository variable {}", key);
                    continue;
                }
                paths.insert(id.to_lowercase(), PathBuf::from(value.trim()));
            } else if let Some(id) = key.strip_prefix(REPO_NAME_PREFIX) {
                names.insert(id.to_lowercase(), value);
            } else if key == LEGACY_REPOSITORY_PATH && !value.trim().is_empty() {
                self.default_repository = Some(PathBuf::from(value.trim()));
            }
        }

        for (id, path) in paths {
            debug!("Repository '{}' from environment: {}", id, path.display());
            let display_name = names.remove(&id);
            self.repositories.push(RepositoryEntry {
                id,
                path,
                display_name,
            });
        }

        for id in names.keys() {
            warn!(
                "{}{} has no matching {}{}",
                REPO_NAME_PREFIX,
                id.to_uppercase(),
                REPO_PATH_PREFIX,
                id.to_uppercase()
            );
        }
    }

    /// The fixed root directory, made absolute against the process working directory.
    pub fn base_dir(&self) -> Result<PathBuf> {
        let cwd = std::env::current_dir()?;
        Ok(match &self.base_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => cwd.join(dir),
            None => cwd,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.server.name.trim().is_empty() {
            return Err(NavigatorError::Config(
                "server.name must not be empty".to_string(),
            ));
        }

        for entry in &self.repositories {
            if entry.id.trim().is_empty() {
                return Err(NavigatorError::Config(format!(
                    "repository entry for {} has an empty id",
                    entry.path.display()
                )));
            }
            if entry.path.as_os_str().is_empty() {
                return Err(NavigatorError::Config(format!(
                    "repository '{}' has an empty path",
                    entry.id
                )));
            }
        }

        Ok(())
    }
}
