//! Implementation of the `loquat check` command.

use std::fs::read_to_string;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use serde::Serialize;

use crate::output::SyntaxDiagnostic;

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Files to check (.ftl)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output parsed resources as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for one checked file.
#[derive(Serialize)]
struct CheckResult {
    file: String,
    resource: loquat::parser::ast::Resource,
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> miette::Result<i32> {
    let mut failed = false;
    let mut results = Vec::new();

    for path in &args.files {
        let content = read_to_string(path)
            .map_err(|e| miette::miette!("Cannot read {}: {}", path.display(), e))?;
        let resource = loquat::parse(&content);

        if !resource.errors.is_empty() {
            failed = true;
        }
        if args.json {
            results.push(CheckResult {
                file: path.display().to_string(),
                resource,
            });
            continue;
        }

        if resource.errors.is_empty() {
            println!("{} {}", "OK".green().bold(), path.display());
        } else {
            println!(
                "{} {} ({} error{})",
                "FAIL".red().bold(),
                path.display(),
                resource.errors.len(),
                if resource.errors.len() == 1 { "" } else { "s" }
            );
            for error in &resource.errors {
                let report = miette::Report::new(SyntaxDiagnostic::from_parser_error(
                    path, &content, error,
                ));
                eprintln!("{report:?}");
            }
        }
    }

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&results).expect("JSON serialization should not fail")
        );
    }

    Ok(if failed { exitcode::DATAERR } else { exitcode::OK })
}
