//! Template lookup
//!
//! Resolves a requested name against the index. Matching is
//! case-insensitive and literal: the name is never treated as a pattern.

use std::fs;

use super::error::TemplateError;
use super::index::{TemplateEntry, TemplateIndex};

impl TemplateIndex {
    /// Find the template whose file name equals `name` plus the suffix,
    /// ignoring case. The first entry in path order wins.
    pub fn find(&self, name: &str) -> Result<&TemplateEntry, TemplateError> {
        let wanted = name.to_lowercase();
        self.entries()
            .iter()
            .find(|entry| entry.name == wanted)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))
    }
}

impl TemplateEntry {
    /// Read the full file content as UTF-8 text
    pub fn read_content(&self) -> Result<String, TemplateError> {
        fs::read_to_string(&self.path).map_err(|source| TemplateError::Read {
            path: self.path.clone(),
            source,
        })
    }
}
