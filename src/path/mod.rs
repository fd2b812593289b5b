// file: src/path/mod.rs
// description: repository-qualified address parsing, validation and resolution
// reference: internal module structure

pub mod reference;
pub mod resolver;
pub mod validator;

pub use reference::PathReference;
pub use resolver::PathResolver;
pub use validator::{ValidationResult, validate};
