// file: src/detection/mod.rs
// description: module detection exports
// reference: internal module structure

pub mod detector;
pub mod language;
pub mod manifest;
pub mod rules;

pub use detector::{CATCH_ALL_MODULE_ID, ModuleDetector};
pub use language::{LanguageDetector, UNKNOWN_LANGUAGE};
pub use manifest::ManifestInfo;
pub use rules::{DetectionRules, ManifestKind, ManifestRule, TypeRule};
