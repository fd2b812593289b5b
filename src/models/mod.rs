// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod module;
pub mod repository;

pub use module::{ModuleInfo, ModuleType};
pub use repository::RepositoryConfig;
