//! Text templates for generated SCn-TeX fragments.
//!
//! A [`Template`] holds the macros used when rendering flat citation entries,
//! reference lines and bibliography blocks.

/// Macros used to render aggregator output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Macro wrapping each entry of a list.
    pub item_macro: &'static str,
    /// Macro citing a key by its short label.
    pub cite_macro: &'static str,
    /// Prefix put in front of `\ref{...}` when the label anchors a chapter.
    pub chapter_qualifier: &'static str,
    /// Macro heading each bibliography block.
    pub header_macro: &'static str,
    /// Macro printing the full bibliographic description of a key.
    pub full_cite_macro: &'static str,
    /// Relation of the list that holds a block's reference lines.
    pub reference_relation: &'static str,
}

/// Single source of truth for builtin templates: (name, template).
const BUILTIN_TEMPLATES: &[(&str, Template)] = &[("scn", SCN_TEMPLATE)];

/// Default template matching the OSTIS SCn-TeX macro set.
pub const SCN_TEMPLATE: Template = Template {
    item_macro: "scnitem",
    cite_macro: "scncite",
    chapter_qualifier: "Глава~",
    header_macro: "scnheader",
    full_cite_macro: "scnfullcite",
    reference_relation: "цитируется в",
};

impl Default for Template {
    fn default() -> Self {
        SCN_TEMPLATE
    }
}

impl Template {
    /// Renders the flat-list entry for a citation key.
    pub fn flat_entry(&self, key: &str) -> String {
        format!("\\{}{{\\{}{{{}}}}}", self.item_macro, self.cite_macro, key)
    }

    /// Renders one reference line pointing at `label`.
    ///
    /// An empty label renders as `\ref{}`.
    pub fn reference_line(&self, label: &str, chapter: bool) -> String {
        let qualifier = if chapter { self.chapter_qualifier } else { "" };
        format!("\\{}{{{}\\ref{{{}}}}}", self.item_macro, qualifier, label)
    }

    /// Renders the bibliography block of one key, including the trailing
    /// blank line that separates consecutive blocks.
    pub fn block(&self, key: &str, references: &[String]) -> String {
        format!(
            "\\{header}{{\\{cite}{{{key}}}}}\n\\{full}{{{key}}}\n\\begin{{scnrelfromlist}}{{{relation}}}\n{refs}\n\\end{{scnrelfromlist}}\n\n",
            header = self.header_macro,
            cite = self.cite_macro,
            full = self.full_cite_macro,
            relation = self.reference_relation,
            key = key,
            refs = references.join("\n"),
        )
    }
}

/// Returns a builtin template by name.
pub fn builtin_template(name: &str) -> Option<&'static Template> {
    BUILTIN_TEMPLATES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, template)| template)
}

/// Returns the list of available builtin template names.
pub fn builtin_template_names() -> Vec<&'static str> {
    BUILTIN_TEMPLATES.iter().map(|(n, _)| *n).collect()
}
