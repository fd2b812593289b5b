// file: src/registry/mod.rs
// description: repository and module registry exports
// reference: internal module structure

pub mod module;
pub mod repository;

pub use module::ModuleRegistry;
pub use repository::{RepositoryRegistry, normalize_repo_id, slug_from_path};
