//! CLI entrypoint for bracefmt conformance tooling.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use bracefmt_conformance::{
    builtin_fixture_set, render_report_markdown, run_fixture_set, FixtureSet,
};

/// CLI for running and exporting bracefmt conformance fixtures.
#[derive(Debug, Parser)]
#[command(name = "bracefmt-conformance")]
#[command(about = "Conformance tooling for the bracefmt engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Supported CLI subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Run a fixture set (the built-in table by default) and render reports.
    Run {
        /// Fixture JSON to run instead of the built-in table.
        #[arg(long)]
        fixtures: Option<PathBuf>,
        /// Output json report path.
        #[arg(long)]
        report_json: Option<PathBuf>,
        /// Output markdown report path.
        #[arg(long)]
        report_md: Option<PathBuf>,
    },
    /// Write the built-in fixture table to a JSON file.
    Emit {
        /// Output fixture path.
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> std::io::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            fixtures,
            report_json,
            report_md,
        } => {
            let set = match fixtures {
                Some(path) => {
                    let body = fs::read_to_string(path)?;
                    FixtureSet::from_json(&body).map_err(std::io::Error::other)?
                }
                None => builtin_fixture_set(),
            };
            let report = run_fixture_set(&set);
            if let Some(path) = report_json {
                fs::write(path, report.to_json().map_err(std::io::Error::other)?)?;
            }
            let markdown = render_report_markdown(&report);
            match report_md {
                Some(path) => fs::write(path, markdown)?,
                None => println!("{markdown}"),
            }
            if report.all_passed() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Emit { output } => {
            let set = builtin_fixture_set();
            fs::write(output, set.to_json().map_err(std::io::Error::other)?)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
