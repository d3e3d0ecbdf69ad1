//! Shared test constants and helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Chapter with a chapter-level label, a section label and a repeated key.
///
/// Scanning it yields `smith2020` under `chapter_intro` and `jones2019`
/// under `sec_methods`.
pub const ROUND_TRIP_CHAPTER: &str = "\\label{chapter_intro}\n\
See \\scncite{smith2020} and \\scncite{smith2020}.\n\
\\label{sec_methods}\n\
Also \\scncite{jones2019}.\n";

pub const ROUND_TRIP_FLAT: &str = "\t\\scnitem{\\scncite{smith2020}}\n\
\t\\scnitem{\\scncite{jones2019}}\n";

pub const ROUND_TRIP_BLOCKS: &str = "\\scnheader{\\scncite{smith2020}}\n\
\\scnfullcite{smith2020}\n\
\\begin{scnrelfromlist}{цитируется в}\n\
\\scnitem{Глава~\\ref{chapter_intro}}\n\
\\end{scnrelfromlist}\n\
\n\
\\scnheader{\\scncite{jones2019}}\n\
\\scnfullcite{jones2019}\n\
\\begin{scnrelfromlist}{цитируется в}\n\
\\scnitem{\\ref{sec_methods}}\n\
\\end{scnrelfromlist}\n\
\n";

/// Chapter carrying author, key-term and bibliography-link lists.
pub const CHECKED_CHAPTER: &str = r"\chapter{Смысловое пространство}
\label{chapter_sense}
\begin{scnrelfromlist}{автор}
    \scnitem{Иванов~И.~И.}
\end{scnrelfromlist}
\begin{scnrelfromlist}{ключевое понятие}
    \scnitem{знание}
    \scnitem{смысловое пространство}
\end{scnrelfromlist}
\begin{scnrelfromlist}{библиографическая ссылка}
    \scnitem{\scncite{Golenkov2001}}
    \scnitem{\scncite{Shunkevich2018}}
\end{scnrelfromlist}
";

/// Writes `content` to `dir/name` and returns the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}
