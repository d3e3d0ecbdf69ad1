//! Reference file loading.
//!
//! Glossary and bibliography files are only consulted for membership: an
//! item is known when its text occurs anywhere in the file.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading a reference file.
#[derive(Error, Debug)]
pub enum RefsError {
    #[error("failed to read '{}': {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Full text of a glossary or bibliography file.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceText {
    content: String,
}

impl ReferenceText {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// True when `item` occurs verbatim in the reference text.
    pub fn contains(&self, item: &str) -> bool {
        self.content.contains(item)
    }

    /// Returns the items not found in the reference text, in input order.
    pub fn missing(&self, items: &[String]) -> Vec<String> {
        items
            .iter()
            .filter(|item| !self.contains(item))
            .cloned()
            .collect()
    }
}

/// Loads a reference file as UTF-8 text.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn load_reference_text(path: &Path) -> Result<ReferenceText, RefsError> {
    let content = fs::read_to_string(path).map_err(|source| RefsError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ReferenceText::new(content))
}
