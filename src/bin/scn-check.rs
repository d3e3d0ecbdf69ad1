//! scn-check - Check the key terms and bibliography links of an SCn-TeX chapter.

use std::fmt;
use std::path::{self, PathBuf};
use std::process;

use clap::Parser;
use colored::Colorize;

use scn_biblio::{check_chapter, logging, CheckError, CheckReport};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// Check that chapter key terms are in the glossary and bibliography links
/// are in the bibliography
#[derive(Parser)]
#[command(name = "scn-check")]
#[command(version)]
#[command(after_help = "\
Examples:
  scn-check chapter.tex -g glossary.tex -b bibliography.tex
  scn-check chapter.tex -b bibliography.tex --json")]
struct Cli {
    /// Chapter TeX file to check
    file: PathBuf,

    /// Glossary TeX file
    #[arg(short = 'g', long = "glossary_file", visible_alias = "glossary-file")]
    glossary: Option<PathBuf>,

    /// Bibliography TeX file to check
    #[arg(short = 'b', long = "biblio_file", visible_alias = "biblio-file")]
    biblio: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Exit with status 1 when a check fails
    #[arg(long)]
    strict: bool,
}

// ---------------------------------------------------------------------------
// AppError — semantic exit codes
// ---------------------------------------------------------------------------

enum AppError {
    /// Exit 1 — checks failed under --strict
    ChecksFailed,
    /// Exit 10 — chapter file not found / unreadable
    InputFile(String),
    /// Exit 11 — glossary file not found / unreadable
    GlossaryFile(String),
    /// Exit 12 — bibliography file not found / unreadable
    BiblioFile(String),
    /// Exit 16 — report cannot be serialized
    Report(String),
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::ChecksFailed => 1,
            AppError::InputFile(_) => 10,
            AppError::GlossaryFile(_) => 11,
            AppError::BiblioFile(_) => 12,
            AppError::Report(_) => 16,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ChecksFailed => write!(f, "chapter checks failed"),
            AppError::InputFile(msg) => {
                write!(f, "{}\n  hint: verify the file path is correct", msg)
            }
            AppError::GlossaryFile(msg) => {
                write!(f, "{}\n  hint: pass the glossary with -g <file>", msg)
            }
            AppError::BiblioFile(msg) => {
                write!(f, "{}\n  hint: pass the bibliography with -b <file>", msg)
            }
            AppError::Report(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<CheckError> for AppError {
    fn from(e: CheckError) -> Self {
        match e {
            CheckError::Chapter { .. } => AppError::InputFile(e.to_string()),
            CheckError::Glossary(_) => AppError::GlossaryFile(e.to_string()),
            CheckError::Bibliography(_) => AppError::BiblioFile(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    logging::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let file = absolute(cli.file);
    let glossary = cli.glossary.map(absolute);
    let biblio = cli.biblio.map(absolute);

    let report = check_chapter(&file, glossary.as_deref(), biblio.as_deref())?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| AppError::Report(format!("failed to serialize report: {}", e)))?;
        println!("{}", json);
    } else {
        print_report(&report);
    }

    if cli.strict && !report.passed() {
        return Err(AppError::ChecksFailed);
    }
    Ok(())
}

fn absolute(path: PathBuf) -> PathBuf {
    path::absolute(&path).unwrap_or(path)
}

fn print_report(report: &CheckReport) {
    println!("\nCheck {}", report.file.display());
    println!("Chapter: {}", report.chapter);

    let result = if report.passed() {
        "Passed".green()
    } else {
        "Error".red()
    };
    println!("----------\nChecks result: {}", result);

    print_list("Need to add terms to glossary: ", &report.terms_to_fix);
    print_list(
        "Need to add biblio links to bibliography: ",
        &report.biblio_links_to_fix,
    );
    if !report.passed() {
        print_list("Please contact these authors to apply fixes: ", &report.authors);
    }
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{}", title);
    for item in items {
        println!("- {}", item);
    }
}
