// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod detection;
pub mod error;
pub mod mcp;
pub mod models;
pub mod path;
pub mod registry;
pub mod utils;
pub mod workspace;

pub use config::{Config, RepositoryEntry, ServerConfig};
pub use detection::{DetectionRules, LanguageDetector, ModuleDetector};
pub use error::{NavigatorError, Result};
pub use models::{ModuleInfo, ModuleType, RepositoryConfig};
pub use path::{PathReference, PathResolver, ValidationResult, validate};
pub use registry::{ModuleRegistry, RepositoryRegistry};
pub use workspace::Workspace;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let config = Config::default_config();
        let detector = ModuleDetector::new(config.detection.clone());
        let workspace = Workspace::new(RepositoryRegistry::new("/srv"), detector);

        assert!(workspace.repositories().is_empty());
        assert!(workspace.modules().is_empty());
    }

    #[test]
    fn test_empty_workspace_initializes() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut config = Config::default_config();
        config.base_dir = Some(temp.path().to_path_buf());

        let workspace = tokio_test::block_on(Workspace::initialize(&config)).unwrap();
        assert!(workspace.modules().is_empty());
        assert!(!workspace.validate("/any/file.rs").is_valid);
    }
}
