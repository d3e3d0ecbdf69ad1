//! Citation aggregation.
//!
//! Scans a chapter line by line, tracks the most recent `\label{...}` and
//! collects every `\scncite{...}` outside the bibliography-link relation list
//! into an insertion-ordered [`Aggregation`].

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::markup;
use crate::template::Template;

/// Relation whose lists are skipped while scanning: those citations are
/// already indexed in the chapter's back matter.
pub const BIBLIO_LINK_RELATION: &str = "библиографическая ссылка";

/// Substring that marks a label as anchoring a chapter.
pub const CHAPTER_MARKER: &str = "chapter";

/// Errors that can occur while scanning a source file.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Scan settings.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Substring that makes a label chapter-level.
    pub chapter_marker: String,
    /// Relation of the list whose citations are not aggregated.
    pub excluded_relation: String,
    /// Templates for flat entries and reference lines.
    pub template: Template,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            chapter_marker: CHAPTER_MARKER.to_string(),
            excluded_relation: BIBLIO_LINK_RELATION.to_string(),
            template: Template::default(),
        }
    }
}

/// One citation marker found outside an excluded block.
#[derive(Debug, Clone, PartialEq)]
pub struct CitationOccurrence {
    /// The citation key (e.g., "smith2020")
    pub key: String,
    /// The label active when the marker was read; empty before the first label
    pub label: String,
    /// Whether the label anchors a chapter
    pub chapter: bool,
}

/// All reference lines collected for one citation key.
#[derive(Debug, Clone, PartialEq)]
pub struct BibEntry {
    pub key: String,
    /// Unique rendered reference lines, in order of first appearance
    pub references: Vec<String>,
}

/// Result of a full scan.
///
/// Keys and their reference lines keep the order in which they were first
/// seen. Flat entries are deduplicated by their rendered text.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    flat: Vec<String>,
    entries: Vec<BibEntry>,
    positions: HashMap<String, usize>,
}

impl Aggregation {
    /// Records one occurrence, rendering its lines with `template`.
    pub fn record(&mut self, occurrence: &CitationOccurrence, template: &Template) {
        let flat = template.flat_entry(&occurrence.key);
        if !self.flat.contains(&flat) {
            self.flat.push(flat);
        }

        let reference = template.reference_line(&occurrence.label, occurrence.chapter);
        match self.positions.get(&occurrence.key) {
            Some(&index) => {
                let entry = &mut self.entries[index];
                if !entry.references.contains(&reference) {
                    entry.references.push(reference);
                }
            }
            None => {
                self.positions
                    .insert(occurrence.key.clone(), self.entries.len());
                self.entries.push(BibEntry {
                    key: occurrence.key.clone(),
                    references: vec![reference],
                });
            }
        }
    }

    /// Rendered flat-list entries, one per distinct key.
    pub fn flat_citations(&self) -> &[String] {
        &self.flat
    }

    /// Bibliography entries in order of first appearance.
    pub fn entries(&self) -> &[BibEntry] {
        &self.entries
    }

    /// Looks up the entry of a key.
    pub fn entry(&self, key: &str) -> Option<&BibEntry> {
        self.positions.get(key).map(|&index| &self.entries[index])
    }

    /// True when at least one citation was recorded.
    pub fn has_citations(&self) -> bool {
        !self.flat.is_empty()
    }
}

/// Scans a reader line by line and aggregates its citations.
///
/// A line opening the excluded relation list switches skipping on, unless
/// the same line also closes a list; while skipping, a line closing any
/// relation list switches it off. Marker lines and skipped lines contribute
/// neither labels nor citations. Nested lists are not tracked.
pub fn aggregate<R: BufRead>(reader: R, options: &ScanOptions) -> Result<Aggregation, ScanError> {
    let mut aggregation = Aggregation::default();
    let mut current_label = String::new();
    let mut excluded = false;

    for (number, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| ScanError::Line {
            line: number + 1,
            source,
        })?;

        if markup::opens_list(&line, &options.excluded_relation) {
            // A list opened and closed on one line leaves skipping off.
            excluded = !markup::closes_list(&line);
            debug!(line = number + 1, excluded, "entering excluded list");
            continue;
        }
        if excluded {
            if markup::closes_list(&line) {
                debug!(line = number + 1, "leaving excluded list");
                excluded = false;
            }
            continue;
        }

        if let Some(label) = markup::label(&line) {
            debug!(line = number + 1, label, "label");
            current_label = label.to_string();
        }

        let chapter = current_label.contains(options.chapter_marker.as_str());
        for key in markup::citation_keys(&line) {
            let occurrence = CitationOccurrence {
                key: key.to_string(),
                label: current_label.clone(),
                chapter,
            };
            aggregation.record(&occurrence, &options.template);
        }
    }

    Ok(aggregation)
}

/// Scans a file from disk.
pub fn aggregate_file(path: &Path, options: &ScanOptions) -> Result<Aggregation, ScanError> {
    let file = File::open(path).map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    aggregate(BufReader::new(file), options)
}

/// Scans in-memory text.
pub fn aggregate_str(text: &str, options: &ScanOptions) -> Aggregation {
    // Reading from a byte slice of valid UTF-8 cannot fail.
    aggregate(text.as_bytes(), options).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Aggregation {
        aggregate_str(text, &ScanOptions::default())
    }

    #[test]
    fn test_empty_text() {
        let agg = scan("");
        assert!(!agg.has_citations());
        assert!(agg.flat_citations().is_empty());
        assert!(agg.entries().is_empty());
    }

    #[test]
    fn test_no_citations() {
        let agg = scan("\\label{chapter_intro}\nПросто текст.\n");
        assert!(!agg.has_citations());
    }

    #[test]
    fn test_same_key_twice_on_one_line() {
        // Given: a line citing the same key twice
        let text = "\\label{sec_a}\nSee \\scncite{k1} and \\scncite{k1}.\n";

        // When: we aggregate
        let agg = scan(text);

        // Then: one flat entry and one reference line
        assert_eq!(agg.flat_citations(), &[r"\scnitem{\scncite{k1}}".to_string()]);
        assert_eq!(agg.entry("k1").unwrap().references.len(), 1);
    }

    #[test]
    fn test_chapter_label_gets_qualifier() {
        let agg = scan("\\label{chapter_intro}\n\\scncite{a}\n");
        assert_eq!(
            agg.entry("a").unwrap().references,
            vec![r"\scnitem{Глава~\ref{chapter_intro}}".to_string()]
        );
    }

    #[test]
    fn test_section_label_has_no_qualifier() {
        let agg = scan("\\label{sec_methods}\n\\scncite{a}\n");
        assert_eq!(
            agg.entry("a").unwrap().references,
            vec![r"\scnitem{\ref{sec_methods}}".to_string()]
        );
    }

    #[test]
    fn test_citation_before_any_label_has_empty_reference() {
        let agg = scan("\\scncite{early}\n");
        assert_eq!(
            agg.entry("early").unwrap().references,
            vec![r"\scnitem{\ref{}}".to_string()]
        );
    }

    #[test]
    fn test_label_and_citation_on_same_line() {
        // Given: a label declared on the line of the citation
        let agg = scan("\\label{sec_old}\n\\label{sec_new} \\scncite{a}\n");

        // Then: the citation uses the new label
        assert_eq!(
            agg.entry("a").unwrap().references,
            vec![r"\scnitem{\ref{sec_new}}".to_string()]
        );
    }

    #[test]
    fn test_label_persists_across_lines() {
        let agg = scan("\\label{sec_a}\nline\nmore\n\\scncite{a}\n");
        assert_eq!(agg.entry("a").unwrap().references[0], r"\scnitem{\ref{sec_a}}");
    }

    #[test]
    fn test_two_labels_give_two_references_in_order() {
        // Given: one key cited under two labels and again under the first
        let text = "\\label{sec_b}\n\\scncite{k}\n\\label{sec_a}\n\\scncite{k}\n\\label{sec_b}\n\\scncite{k}\n";

        // When: we aggregate
        let agg = scan(text);

        // Then: two distinct references in first-appearance order
        assert_eq!(
            agg.entry("k").unwrap().references,
            vec![
                r"\scnitem{\ref{sec_b}}".to_string(),
                r"\scnitem{\ref{sec_a}}".to_string(),
            ]
        );
    }

    #[test]
    fn test_reference_dedup_is_per_key() {
        // Given: two keys under the same label
        let agg = scan("\\label{sec_a}\n\\scncite{x} \\scncite{y}\n");

        // Then: each key gets its own copy of the reference line
        assert_eq!(agg.entry("x").unwrap().references.len(), 1);
        assert_eq!(agg.entry("y").unwrap().references.len(), 1);
    }

    #[test]
    fn test_entries_keep_first_appearance_order() {
        let agg = scan("\\scncite{z}\n\\scncite{a} \\scncite{m}\n\\scncite{a}\n");
        let keys: Vec<&str> = agg.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_excluded_list_is_skipped() {
        // Given: citations inside the bibliography-link list
        let text = "\\label{sec_a}\n\
                    \\scncite{used}\n\
                    \\begin{scnrelfromlist}{библиографическая ссылка}\n\
                    \\scnitem{\\scncite{listed}}\n\
                    \\end{scnrelfromlist}\n\
                    \\scncite{after}\n";

        // When: we aggregate
        let agg = scan(text);

        // Then: the listed key appears nowhere
        assert!(agg.entry("listed").is_none());
        assert_eq!(agg.flat_citations().len(), 2);
        assert!(agg.entry("after").is_some());
    }

    #[test]
    fn test_labels_inside_excluded_list_are_ignored() {
        let text = "\\label{sec_a}\n\
                    \\begin{scnrelfromlist}{библиографическая ссылка}\n\
                    \\label{sec_hidden}\n\
                    \\end{scnrelfromlist}\n\
                    \\scncite{k}\n";
        let agg = scan(text);
        assert_eq!(agg.entry("k").unwrap().references[0], r"\scnitem{\ref{sec_a}}");
    }

    #[test]
    fn test_other_relation_lists_are_scanned() {
        let text = "\\begin{scnrelfromlist}{ключевое понятие}\n\
                    \\scnitem{\\scncite{inside}}\n\
                    \\end{scnrelfromlist}\n";
        assert!(scan(text).entry("inside").is_some());
    }

    #[test]
    fn test_nested_list_closes_exclusion_early() {
        // Given: another list nested inside the excluded one
        let text = "\\begin{scnrelfromlist}{библиографическая ссылка}\n\
                    \\begin{scnrelfromlist}{автор}\n\
                    \\end{scnrelfromlist}\n\
                    \\scncite{leaked}\n\
                    \\end{scnrelfromlist}\n";

        // Then: the first end marker already ends the exclusion
        assert!(scan(text).entry("leaked").is_some());
    }

    #[test]
    fn test_one_line_excluded_list_does_not_swallow_rest() {
        // Given: an excluded list opened and closed on a single line
        let text = "\\label{sec_a}\n\
                    \\begin{scnrelfromlist}{библиографическая ссылка}\\scnitem{\\scncite{listed}}\\end{scnrelfromlist}\n\
                    Body \\scncite{after}.\n";

        // When: we aggregate
        let agg = scan(text);

        // Then: the listed key is skipped, the following citation is kept
        assert!(agg.entry("listed").is_none());
        assert_eq!(agg.flat_citations(), &[r"\scnitem{\scncite{after}}".to_string()]);
        assert_eq!(agg.entry("after").unwrap().references[0], r"\scnitem{\ref{sec_a}}");
    }

    #[test]
    fn test_citation_on_begin_line_is_skipped() {
        let text = "\\begin{scnrelfromlist}{библиографическая ссылка} \\scncite{on_begin}\n\
                    \\end{scnrelfromlist}\n\
                    \\scncite{after}\n";
        let agg = scan(text);
        assert!(agg.entry("on_begin").is_none());
        assert!(agg.entry("after").is_some());
    }

    #[test]
    fn test_citation_and_label_on_end_line_are_skipped() {
        // Given: a citation and a label sharing the line of the end marker
        let text = "\\label{sec_a}\n\
                    \\begin{scnrelfromlist}{библиографическая ссылка}\n\
                    \\scncite{on_end} \\label{sec_end}\\end{scnrelfromlist}\n\
                    \\scncite{after}\n";

        // When: we aggregate
        let agg = scan(text);

        // Then: neither is picked up, the earlier label stays active
        assert!(agg.entry("on_end").is_none());
        assert_eq!(agg.entry("after").unwrap().references[0], r"\scnitem{\ref{sec_a}}");
    }

    #[test]
    fn test_doubled_excluded_begin_is_closed_by_first_end() {
        // Given: the excluded list opened twice before being closed
        let text = "\\begin{scnrelfromlist}{библиографическая ссылка}\n\
                    \\begin{scnrelfromlist}{библиографическая ссылка}\n\
                    \\scncite{inner}\n\
                    \\end{scnrelfromlist}\n\
                    \\scncite{between}\n\
                    \\end{scnrelfromlist}\n";

        // When: we aggregate
        let agg = scan(text);

        // Then: the toggle does not count depth
        assert!(agg.entry("inner").is_none());
        assert!(agg.entry("between").is_some());
    }

    #[test]
    fn test_custom_chapter_marker() {
        let options = ScanOptions {
            chapter_marker: "ch_".to_string(),
            ..ScanOptions::default()
        };
        let agg = aggregate_str("\\label{ch_one}\n\\scncite{a}\n", &options);
        assert_eq!(
            agg.entry("a").unwrap().references[0],
            r"\scnitem{Глава~\ref{ch_one}}"
        );
    }

    #[test]
    fn test_aggregate_file_not_found() {
        let result = aggregate_file(
            Path::new("/nonexistent/chapter.tex"),
            &ScanOptions::default(),
        );
        match result {
            Err(ScanError::Read { source, .. }) => {
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound)
            }
            other => panic!("Expected ScanError::Read, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_utf8_reports_line() {
        let bytes: &[u8] = b"\\scncite{a}\n\xff\xfe\n";
        match aggregate(bytes, &ScanOptions::default()) {
            Err(ScanError::Line { line, .. }) => assert_eq!(line, 2),
            other => panic!("Expected ScanError::Line, got {:?}", other),
        }
    }
}
