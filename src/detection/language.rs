// file: src/detection/language.rs
// description: primary language detection by file extension frequency
// reference: https://docs.rs/walkdir

use crate::detection::rules::DetectionRules;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

pub const UNKNOWN_LANGUAGE: &str = "unknown";

pub struct LanguageDetector<'a> {
    rules: &'a DetectionRules,
}

impl<'a> LanguageDetector<'a> {
    pub fn new(rules: &'a DetectionRules) -> Self {
        Self { rules }
    }

    /// Most frequent language under `dir`. Ties go to the lexicographically smallest
    /// language name.
    pub fn detect(&self, dir: &Path) -> String {
        let counts = self.count(dir);

        let language = counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(language, _)| language.clone())
            .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string());

        debug!("Language of {}: {} ({:?})", dir.display(), language, counts);
        language
    }

    /// File counts per language, skipping ignored directories.
    pub fn count(&self, dir: &Path) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();

        for entry in WalkDir::new(dir)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !self.is_ignored(e))
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(extension) = entry.path().extension().and_then(|e| e.to_str()) else {
                continue;
            };

            if let Some(language) = self.rules.language_for_extension(extension) {
                *counts.entry(language.to_string()).or_insert(0) += 1;
            }
        }

        counts
    }

    fn is_ignored(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.rules.is_ignored_dir(name))
    }
}
