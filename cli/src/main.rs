//! pagemill CLI - page splitting and positioned text extraction for PDFs
//!
//! Every invocation processes one command and writes exactly one JSON
//! envelope to stdout: `{"success": true, ...}` with the payload, or
//! `{"success": false, "error": ...}` followed by a non-zero exit. The
//! failure envelope also goes to stdout so that a supervising process can
//! parse it; progress notes go to stderr.

use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::json;

use pagemill::{DiagnosticSink, FnSink};

#[derive(Parser)]
#[command(name = "pagemill")]
#[command(version)]
#[command(about = "Split scanned PDF spreads and extract positioned text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[command(rename_all = "snake_case")]
enum Commands {
    /// Measure page geometry and flag double-page spreads
    Analyze {
        /// Input PDF file
        pdf_path: PathBuf,

        /// Output directory (analyze writes nothing, kept for a uniform
        /// call shape)
        #[allow(dead_code)]
        output_dir: PathBuf,
    },

    /// Produce PDF, PNG, JPG, and text layout for one source page
    ProcessPage {
        /// Input PDF file
        pdf_path: PathBuf,

        /// Output directory
        output_dir: PathBuf,

        /// Source page index (0-based)
        page_index: usize,

        /// Number assigned to the output page
        output_page_number: u32,
    },

    /// Split a double-page spread into two output pages
    ProcessDoublePage {
        /// Input PDF file
        pdf_path: PathBuf,

        /// Output directory
        output_dir: PathBuf,

        /// Source page index (0-based)
        page_index: usize,

        /// Number assigned to the left half; the right half gets the next
        start_page_number: u32,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::try_parse().unwrap_or_else(|err| {
        // --help and --version keep clap's native behavior.
        if matches!(
            err.kind(),
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
        ) {
            err.exit();
        }
        fail(&format!("{err}"));
    });

    match run(cli.command) {
        Ok(payload) => println!("{payload}"),
        Err(e) => fail(&e.to_string()),
    }
}

/// Emit the failure envelope and exit non-zero.
fn fail(message: &str) -> ! {
    println!("{}", json!({ "success": false, "error": message }));
    process::exit(1);
}

fn run(command: Commands) -> pagemill::Result<serde_json::Value> {
    match command {
        Commands::Analyze { pdf_path, .. } => {
            let mut sink = stderr_sink();
            let structure = pagemill::analyze_file(&pdf_path, &mut sink)?;
            Ok(json!({ "success": true, "page_structure": structure }))
        }
        Commands::ProcessPage {
            pdf_path,
            output_dir,
            page_index,
            output_page_number,
        } => {
            let result =
                pagemill::process_page(&pdf_path, &output_dir, page_index, output_page_number)?;
            Ok(json!({ "success": true, "result": result }))
        }
        Commands::ProcessDoublePage {
            pdf_path,
            output_dir,
            page_index,
            start_page_number,
        } => {
            let mut sink = stderr_sink();
            let results = pagemill::process_double_page(
                &pdf_path,
                &output_dir,
                page_index,
                start_page_number,
                &mut sink,
            )?;
            Ok(json!({ "success": true, "results": results }))
        }
    }
}

fn stderr_sink() -> impl DiagnosticSink {
    FnSink(|message: &str| eprintln!("  {}", message.dimmed()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_commands_use_snake_case_names() {
        let cli = Cli::try_parse_from([
            "pagemill",
            "process_double_page",
            "book.pdf",
            "out",
            "3",
            "7",
        ])
        .unwrap();
        match cli.command {
            Commands::ProcessDoublePage {
                page_index,
                start_page_number,
                ..
            } => {
                assert_eq!(page_index, 3);
                assert_eq!(start_page_number, 7);
            }
            _ => panic!("parsed into the wrong command"),
        }
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(Cli::try_parse_from(["pagemill", "explode", "book.pdf", "out"]).is_err());
    }

    #[test]
    fn test_failure_envelope_shape() {
        let envelope = json!({ "success": false, "error": "boom" });
        assert_eq!(envelope["success"], false);
        assert_eq!(envelope["error"], "boom");
    }
}
