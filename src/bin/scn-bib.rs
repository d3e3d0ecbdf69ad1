//! scn-bib - Collect the citations of an SCn-TeX chapter.
//!
//! Writes the flat citation list and the cross-referenced bibliography
//! blocks, then reports whether any citation was found.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::debug;

use scn_biblio::{
    aggregate_file, builtin_template, logging, output, template::builtin_template_names,
    write_outputs, OutputPaths, ScanOptions, Template,
};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// Collect the citations of an SCn-TeX chapter
#[derive(Parser)]
#[command(name = "scn-bib")]
#[command(version)]
#[command(after_help = "\
Examples:
  scn-bib chapter.tex
  scn-bib chapter.tex --output-dir build

Any number of input files other than one, or an unknown option, is ignored.")]
struct Cli {
    /// Chapter TeX file to scan
    inputs: Vec<PathBuf>,

    /// Directory the result files are written to
    #[arg(short = 'd', long, default_value = ".")]
    output_dir: PathBuf,

    /// Name of the flat citation list file
    #[arg(long, default_value = output::FLAT_FILE)]
    flat_file: String,

    /// Name of the bibliography blocks file
    #[arg(long, default_value = output::BLOCKS_FILE)]
    blocks_file: String,

    /// Builtin output template
    #[arg(long, default_value = "scn")]
    template: String,
}

// ---------------------------------------------------------------------------
// AppError — semantic exit codes
// ---------------------------------------------------------------------------

enum AppError {
    /// Exit 10 — input file not found / unreadable
    InputFile(String),
    /// Exit 13 — unknown builtin template
    Template(String),
    /// Exit 15 — cannot write output file
    OutputFile(String),
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::InputFile(_) => 10,
            AppError::Template(_) => 13,
            AppError::OutputFile(_) => 15,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InputFile(msg) => {
                write!(f, "{}\n  hint: verify the file path is correct", msg)
            }
            AppError::Template(msg) => {
                let names = builtin_template_names().join(", ");
                write!(f, "{}\n  available builtin templates: {}", msg, names)
            }
            AppError::OutputFile(msg) => {
                write!(
                    f,
                    "{}\n  hint: check that the output directory exists and is writable",
                    msg
                )
            }
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
    // Unusable arguments are a silent no-op, like a wrong input count.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            debug!(kind = ?e.kind(), "unusable arguments, nothing to do");
            return Ok(());
        }
    };

    let [input] = cli.inputs.as_slice() else {
        debug!(count = cli.inputs.len(), "expected exactly one input file, nothing to do");
        return Ok(());
    };

    let template = builtin_template(&cli.template)
        .ok_or_else(|| AppError::Template(format!("unknown template '{}'", cli.template)))?;
    let paths = OutputPaths::named(&cli.output_dir, &cli.flat_file, &cli.blocks_file);

    parse_command(input, template.clone(), &paths)
}

/// Scan one chapter and write both result files.
fn parse_command(
    input: &Path,
    template: Template,
    paths: &OutputPaths,
) -> Result<(), AppError> {
    let options = ScanOptions {
        template,
        ..ScanOptions::default()
    };

    let aggregation =
        aggregate_file(input, &options).map_err(|e| AppError::InputFile(e.to_string()))?;

    write_outputs(&aggregation, &options.template, paths)
        .map_err(|e| AppError::OutputFile(e.to_string()))?;

    println!("bibliography parsed {}", aggregation.has_citations());
    Ok(())
}
