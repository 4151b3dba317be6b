//! Wall packing CLI - runs `pack_wall` over a config file and prints a
//! cut-list summary.
//!
//! Usage:
//!   wallpack pack --config wall.toml
//!   wallpack pack --config wall.json --format json

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use wallpack::config::WallConfig;
use wallpack::pack_wall;

#[derive(Parser)]
#[command(name = "wallpack")]
#[command(about = "Bill-of-materials packing engine for modular block walls")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack a wall from a config file and print the result
    Pack {
        /// Path to a TOML or JSON WallConfig
        #[arg(long)]
        config: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Summary,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match args.command {
        Commands::Pack { config, format } => run_pack(&config, format),
    }
}

fn run_pack(path: &PathBuf, format: OutputFormat) -> Result<()> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: WallConfig = if path.extension().and_then(|e| e.to_str()) == Some("json") {
        serde_json::from_str(&text).context("parsing config as JSON")?
    } else {
        toml::from_str(&text).context("parsing config as TOML")?
    };

    let result = pack_wall(&config, None).context("pack_wall failed")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Summary => print_summary(&result),
    }
    Ok(())
}

fn print_summary(result: &wallpack::PackResult) {
    use std::collections::BTreeMap;

    let mut by_width: BTreeMap<i64, usize> = BTreeMap::new();
    for b in &result.placed {
        *by_width.entry(b.width).or_default() += 1;
    }

    println!("Standard blocks: {}", result.placed.len());
    for (width, count) in by_width.iter().rev() {
        println!("  {width}mm x {count}");
    }

    let total_waste: i64 = result.customs.iter().map(|c| c.waste).sum();
    println!("Custom pieces: {} (total waste {total_waste}mm)", result.customs.len());

    if result.warnings.is_empty() {
        println!("Warnings: none");
    } else {
        println!("Warnings:");
        for w in &result.warnings {
            println!("  [{:?}] {}", w.kind, w.details);
        }
    }
}
