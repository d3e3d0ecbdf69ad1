//! Output generation for aggregated citations.
//!
//! Renders the flat citation list and the bibliography blocks and writes
//! them to their result files.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::aggregator::Aggregation;
use crate::template::Template;

/// Default name of the flat citation list file.
pub const FLAT_FILE: &str = "parse_result.txt";

/// Default name of the bibliography blocks file.
pub const BLOCKS_FILE: &str = "biblio_result.txt";

/// Errors that can occur when writing result files.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the two result files go.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub flat: PathBuf,
    pub blocks: PathBuf,
}

impl OutputPaths {
    /// Places both files with their default names in `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::named(dir, FLAT_FILE, BLOCKS_FILE)
    }

    /// Places both files with custom names in `dir`.
    pub fn named(dir: &Path, flat: &str, blocks: &str) -> Self {
        Self {
            flat: dir.join(flat),
            blocks: dir.join(blocks),
        }
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self::in_dir(Path::new("."))
    }
}

/// Renders the flat list: one tab-indented entry per line.
pub fn render_flat_list(aggregation: &Aggregation) -> String {
    aggregation
        .flat_citations()
        .iter()
        .map(|entry| format!("\t{}\n", entry))
        .collect()
}

/// Renders every bibliography block, concatenated in key order.
pub fn render_blocks(aggregation: &Aggregation, template: &Template) -> String {
    aggregation
        .entries()
        .iter()
        .map(|entry| template.block(&entry.key, &entry.references))
        .collect()
}

/// Writes both result files, creating or truncating them.
pub fn write_outputs(
    aggregation: &Aggregation,
    template: &Template,
    paths: &OutputPaths,
) -> Result<(), OutputError> {
    write_file(&paths.flat, &render_flat_list(aggregation))?;
    write_file(&paths.blocks, &render_blocks(aggregation, template))?;
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<(), OutputError> {
    fs::write(path, content).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = content.len(), "wrote result file");
    Ok(())
}
