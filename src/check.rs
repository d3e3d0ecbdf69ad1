//! Chapter checks.
//!
//! Verifies that every key term listed in a chapter is defined in the
//! glossary and that every bibliography link listed in a chapter exists in
//! the bibliography file. Chapter authors are collected so that a failing
//! report can name who should apply the fixes.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::aggregator::BIBLIO_LINK_RELATION;
use crate::markup;
use crate::refs::{load_reference_text, RefsError};

/// Relations whose lists hold the chapter's key terms.
pub const KEY_RELATIONS: [&str; 4] = [
    "ключевое понятие",
    "ключевое отношение",
    "ключевой знак",
    "ключевой параметр",
];

/// Relation whose list holds the chapter's authors.
pub const AUTHORS_RELATION: &str = "автор";

/// Returned by [`chapter_name`] when the chapter has no recognisable title.
pub const NO_CHAPTER_NAME: &str = "No chapter name";

static TERM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\scnitem\{([А-яЁёA-z0-9,.!?: *-]+)\}").unwrap());

static BIBLIO_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\scnitem\{\\scncite\{([A-z0-9]+)\}\}").unwrap());

static AUTHOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\scnitem\{([А-яЁё.~ ]+)\}").unwrap());

/// Errors that can occur while checking a chapter.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("failed to read chapter '{}': {source}", .path.display())]
    Chapter {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("glossary: {0}")]
    Glossary(#[source] RefsError),

    #[error("bibliography: {0}")]
    Bibliography(#[source] RefsError),
}

/// Outcome of checking one chapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub file: PathBuf,
    pub chapter: String,
    /// Key terms missing from the glossary
    pub terms_to_fix: Vec<String>,
    /// Bibliography links missing from the bibliography
    pub biblio_links_to_fix: Vec<String>,
    pub authors: Vec<String>,
}

impl CheckReport {
    pub fn passed(&self) -> bool {
        self.terms_to_fix.is_empty() && self.biblio_links_to_fix.is_empty()
    }
}

fn relation_items(text: &str, relations: &[&str], pattern: &Regex) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let blocks = markup::list_blocks(&lines, relations);
    markup::list_items(&lines, &blocks, pattern)
}

/// Key terms listed under any of the [`KEY_RELATIONS`].
pub fn key_terms(text: &str) -> Vec<String> {
    relation_items(text, &KEY_RELATIONS, &TERM_RE)
}

/// Citation keys listed in the bibliography-link relation list.
pub fn biblio_links(text: &str) -> Vec<String> {
    relation_items(text, &[BIBLIO_LINK_RELATION], &BIBLIO_LINK_RE)
}

/// Authors listed in the author relation list.
pub fn authors(text: &str) -> Vec<String> {
    relation_items(text, &[AUTHORS_RELATION], &AUTHOR_RE)
}

/// Title of the chapter, or [`NO_CHAPTER_NAME`].
pub fn chapter_name(text: &str) -> String {
    markup::chapter_title(text)
        .unwrap_or(NO_CHAPTER_NAME)
        .to_string()
}

/// Checks a chapter file against an optional glossary and bibliography.
///
/// A check whose reference file is not given is skipped and reported as
/// having nothing to fix.
pub fn check_chapter(
    file: &Path,
    glossary: Option<&Path>,
    bibliography: Option<&Path>,
) -> Result<CheckReport, CheckError> {
    let text = fs::read_to_string(file).map_err(|source| CheckError::Chapter {
        path: file.to_path_buf(),
        source,
    })?;

    let terms_to_fix = match glossary {
        Some(path) => {
            let glossary = load_reference_text(path).map_err(CheckError::Glossary)?;
            glossary.missing(&key_terms(&text))
        }
        None => {
            debug!("no glossary given, skipping key term check");
            Vec::new()
        }
    };

    let biblio_links_to_fix = match bibliography {
        Some(path) => {
            let bibliography = load_reference_text(path).map_err(CheckError::Bibliography)?;
            bibliography.missing(&biblio_links(&text))
        }
        None => {
            debug!("no bibliography given, skipping bibliography link check");
            Vec::new()
        }
    };

    Ok(CheckReport {
        file: file.to_path_buf(),
        chapter: chapter_name(&text),
        terms_to_fix,
        biblio_links_to_fix,
        authors: authors(&text),
    })
}
