//! traitgen CLI - usage-driven trait extraction for Rust projects.
//!
//! Derives a minimal trait for one named concrete type from how that
//! type is actually used, and writes the trait declaration as generated
//! source. Units are independent: a failure in one unit logs and skips
//! it, and the remaining units still run.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use traitgen_core::prelude::*;
use traitgen_core::logging::init_structured_logging;

#[derive(Parser, Debug)]
#[command(author, version, about = "Usage-driven trait extraction for Rust")]
pub struct Cli {
    /// Concrete type to extract a trait for, as module::TypeName
    #[arg(long = "type", value_name = "module::TypeName")]
    type_selector: String,

    /// Explicit trait name (default: derived agent noun, Bar -> Barer)
    #[arg(long)]
    name: Option<String>,

    /// Destination module for the generated declaration
    #[arg(long)]
    module: Option<String>,

    /// cfg predicate emitted as a build-tag line in the generated file
    #[arg(long)]
    tags: Option<String>,

    /// Output target: a path, or - for stdout
    #[arg(long)]
    output: Option<String>,

    /// Output the run summary in JSON format
    #[arg(long)]
    json: bool,

    /// Crate roots to process as independent units
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,
}

fn main() -> Result<()> {
    // Global panic guard
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] traitgen internal error: {}", info);
        eprintln!("[PANIC] The process will exit safely with code 2.");
    }));

    // Initialize structured logging (JSON to stderr, respects RUST_LOG)
    init_structured_logging();

    let cli = Cli::parse();
    let provenance = std::env::args().collect::<Vec<_>>().join(" ");

    let mut report = RunReport::default();
    for path in &cli.paths {
        let mut request = Traitgen::new(path, &cli.type_selector).provenance(&provenance);
        if let Some(name) = &cli.name {
            request = request.name(name);
        }
        if let Some(module) = &cli.module {
            request = request.module(module);
        }
        if let Some(tags) = &cli.tags {
            request = request.tags(tags);
        }
        if let Some(output) = &cli.output {
            request = request.output(output);
        }

        match request.run() {
            Ok(Some(synthesis)) => report.push(
                path.clone(),
                UnitOutcome::Generated {
                    trait_name: synthesis.trait_name,
                    methods: synthesis.methods,
                    destination: synthesis.destination.describe(),
                },
            ),
            Ok(None) => report.push(
                path.clone(),
                UnitOutcome::Skipped {
                    reason: format!("type {} not found", cli.type_selector),
                },
            ),
            Err(err) if err.is_recoverable() => {
                traitgen_core::logging::log_error(&err.to_string());
                report.push(
                    path.clone(),
                    UnitOutcome::Skipped {
                        reason: err.to_string(),
                    },
                );
            }
            Err(err) => return Err(err.into()),
        }
    }

    if cli.json {
        eprintln!("{}", report.render_json()?);
    } else {
        eprint!("{}", report.render_plain());
    }
    Ok(())
}
