//! SCn-TeX markup patterns.
//!
//! Line-level matchers for the markers used in chapter sources:
//! `\scncite{key}`, `\label{name}`, `\scnitem{...}`, `\chapter{...}` and the
//! `scnrelfromlist` environment that groups items under a relation.
//!
//! Nothing here builds a document tree. Every matcher looks at one line (or one
//! string) at a time.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

/// Opening of a relation list, without the `{relation}` argument.
pub const BEGIN_LIST: &str = "\\begin{scnrelfromlist}";

/// Closing of a relation list. Shared by every relation.
pub const END_LIST: &str = "\\end{scnrelfromlist}";

// Group 1: the citation key.
static CITE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\scncite\{([\w\-\d]+)\}").unwrap());

static LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\label\{([a-z0-9_]+)\}").unwrap());

static CHAPTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\chapter\{([А-яЁё ,:?!]+)\}").unwrap());

/// Extracts every citation key on a line, left to right.
///
/// # Examples
///
/// ```
/// use scn_biblio::markup::citation_keys;
///
/// let keys = citation_keys(r"See \scncite{smith2020} and \scncite{jones-2019}.");
/// assert_eq!(keys, vec!["smith2020", "jones-2019"]);
/// ```
pub fn citation_keys(line: &str) -> Vec<&str> {
    CITE_RE
        .captures_iter(line)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Returns the first `\label{...}` name declared on the line.
pub fn label(line: &str) -> Option<&str> {
    LABEL_RE
        .captures(line)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}

/// Returns the full begin marker of a relation list, e.g.
/// `\begin{scnrelfromlist}{автор}`.
pub fn list_begin_marker(relation: &str) -> String {
    format!("{}{{{}}}", BEGIN_LIST, relation)
}

/// True when the line opens a relation list for `relation`.
pub fn opens_list(line: &str, relation: &str) -> bool {
    line.contains(&list_begin_marker(relation))
}

/// True when the line closes a relation list (of any relation).
pub fn closes_list(line: &str) -> bool {
    line.contains(END_LIST)
}

/// Returns the title of the first `\chapter{...}` in the text.
pub fn chapter_title(text: &str) -> Option<&str> {
    CHAPTER_RE
        .captures(text)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}

/// Finds the relation-list blocks opened for any of `relations`.
///
/// Each returned range covers the item lines strictly between the begin line
/// and the end line. A begin marker seen while a block is open restarts the
/// block; a block that is never closed is dropped.
pub fn list_blocks(lines: &[&str], relations: &[&str]) -> Vec<Range<usize>> {
    let markers: Vec<String> = relations.iter().map(|r| list_begin_marker(r)).collect();

    let mut blocks = Vec::new();
    let mut open: Option<usize> = None;

    for (number, line) in lines.iter().enumerate() {
        if markers.iter().any(|m| line.contains(m.as_str())) {
            open = Some(number);
        }
        if let Some(begin) = open {
            if closes_list(line) {
                // Same-line begin and end yields an empty block.
                blocks.push(begin + 1..number.max(begin + 1));
                open = None;
            }
        }
    }

    blocks
}

/// Applies `pattern` to every item line of the given blocks and collects
/// capture group 1 of the first match on each line.
///
/// Item lines are trimmed before matching; lines without a match are skipped.
pub fn list_items(lines: &[&str], blocks: &[Range<usize>], pattern: &Regex) -> Vec<String> {
    blocks
        .iter()
        .flat_map(|block| lines[block.clone()].iter())
        .filter_map(|line| {
            pattern
                .captures(line.trim())
                .and_then(|cap| cap.get(1))
                .map(|m| m.as_str().to_string())
        })
        .collect()
}
