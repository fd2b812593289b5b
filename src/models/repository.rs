// file: src/models/repository.rs
// description: registered repository record
// reference: internal data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub id: String,
    pub root_path: PathBuf,
    pub display_name: String,
}

impl RepositoryConfig {
    /// Builds a record whose display name defaults to the id.
    pub fn new(id: impl Into<String>, root_path: impl Into<PathBuf>) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            root_path: root_path.into(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }
}
