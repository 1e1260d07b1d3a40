//! gmlref CLI
//!
//! Loads a JSON feature document, resolves its geometry references and
//! prints every feature together with the dangling references found.
//!
//! Usage:
//!   gmlref features.json
//!   gmlref --strict --crs EPSG:25832 -v features.json

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gmlref::readers::JsonReader;
use gmlref::{load_str, SessionConfig, Severity};

/// Resolve geometry references in a feature document
#[derive(Parser, Debug)]
#[command(name = "gmlref", version)]
struct Args {
    /// Document to load
    path: PathBuf,

    /// Fail when the document has dangling references
    #[arg(long)]
    strict: bool,

    /// Maximum number of references in the document
    #[arg(long, default_value_t = SessionConfig::default().max_references)]
    max_references: usize,

    /// CRS for inline geometries that do not name one
    #[arg(long, default_value_t = SessionConfig::default().default_crs.to_string())]
    crs: String,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let source = fs::read_to_string(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;

    let config = SessionConfig::new()
        .with_max_references(args.max_references)
        .with_default_crs(args.crs.as_str())
        .with_dangling_severity(if args.strict {
            Severity::Error
        } else {
            Severity::Warning
        });

    let document = load_str(&JsonReader::new(), &source, config)
        .with_context(|| format!("failed to load {}", args.path.display()))?;

    for feature in &document.features {
        println!("{}", feature.id);
        for (name, geometry) in &feature.geometries {
            match geometry.envelope() {
                Ok(envelope) => println!(
                    "  {}: {} {:?}..{:?} ({})",
                    name,
                    geometry.geometry_type()?,
                    envelope.min(),
                    envelope.max(),
                    envelope.crs()
                ),
                Err(err) => println!("  {}: {}", name, err),
            }
        }
    }

    let outcome = document.outcome;
    println!(
        "{} reference(s) resolved, {} dangling",
        outcome.resolved,
        outcome.dangling.len()
    );
    for dangling in &outcome.dangling {
        println!("  #{} ({} occurrence(s))", dangling.id, dangling.occurrences);
    }

    if args.strict {
        outcome.into_result()?;
    }
    Ok(())
}
