//! scn-biblio: citation and key-term tooling for SCn-TeX chapters.
//!
//! This library provides functionality to:
//! - Match SCn-TeX markers (`\scncite`, `\label`, `scnrelfromlist` lists)
//! - Aggregate the citations of a chapter per key, with the labels citing them
//! - Render the flat citation list and the cross-referenced bibliography blocks
//! - Check chapter key terms against a glossary and bibliography links
//!   against a bibliography file

pub mod aggregator;
pub mod check;
pub mod logging;
pub mod markup;
pub mod output;
pub mod refs;
pub mod template;

pub use aggregator::{
    aggregate, aggregate_file, aggregate_str, Aggregation, BibEntry, CitationOccurrence,
    ScanError, ScanOptions,
};
pub use check::{
    authors, biblio_links, chapter_name, check_chapter, key_terms, CheckError, CheckReport,
};
pub use output::{render_blocks, render_flat_list, write_outputs, OutputError, OutputPaths};
pub use refs::{load_reference_text, ReferenceText, RefsError};
pub use template::{builtin_template, Template};
