//! Kunitori - who owns how much of the map?
//!
//! Samples the history of a git repository, attributes every line to its
//! author and hands out the areas of a region in proportion to the lines
//! each author owns.
//!
//! # Usage
//! ```bash
//! kunitori generate --path .                                # Local repository
//! kunitori generate --url https://github.com/owner/repo     # Clone first
//! kunitori generate --path . --filters '\.rs$' --authors 'me=@example\.com$'
//! ```

mod analysis;
mod config;
mod error;
mod git;
mod identity;
mod models;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{CountLinesOptions, GenerateOptions, RepositorySource, SearchCommitsOptions};

const OUTPUT_FILE_NAME: &str = "generate.json";

/// Kunitori - map git line ownership onto the areas of a region
#[derive(Parser)]
#[command(name = "kunitori")]
#[command(about = "Allocate the areas of a region to repository authors by line count", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample commits and write the allocation report as JSON
    Generate(GenerateArgs),
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Repository URL to clone (wins over --path)
    #[arg(long)]
    url: Option<String>,

    /// Path to a local repository
    #[arg(long)]
    path: Option<PathBuf>,

    /// Region whose areas are allocated
    #[arg(long, default_value = "JP")]
    region: String,

    /// Only commits after this time (RFC 3339)
    #[arg(long, value_parser = parse_time)]
    since: Option<DateTime<Utc>>,

    /// Only commits before this time (RFC 3339)
    #[arg(long, value_parser = parse_time)]
    until: Option<DateTime<Utc>>,

    /// Minimum spacing between sampled commits, e.g. 30d or 1d12h
    #[arg(long, default_value = "30d")]
    interval: String,

    /// Number of commits to sample
    #[arg(long, default_value_t = 12)]
    limit: i64,

    /// Path filters (regex); every file when omitted
    #[arg(long, num_args = 1..)]
    filters: Vec<String>,

    /// Author merge rules as label=regex, first match wins
    #[arg(long, num_args = 1..)]
    authors: Vec<String>,

    /// Directory the report is written to
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

fn parse_time(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|e| format!("invalid time {}: {}", value, e))
}

impl GenerateArgs {
    fn into_options(self) -> anyhow::Result<(GenerateOptions, PathBuf)> {
        let source = RepositorySource::resolve(self.url, self.path)?;
        let search = SearchCommitsOptions {
            since: self.since,
            until: self.until,
            interval: config::parse_duration(&self.interval)?,
            limit: self.limit,
        };
        let count_lines = CountLinesOptions::parse(&self.filters, &self.authors)?;

        let options = GenerateOptions {
            source,
            region: self.region,
            search,
            count_lines,
        };
        Ok((options, self.out))
    }
}

fn run_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let (options, out_dir) = args.into_options()?;

    if !out_dir.is_dir() {
        anyhow::bail!("output directory does not exist: {}", out_dir.display());
    }

    let resolver = identity::resolver_from_env();
    let result = analysis::generate(&options, resolver.as_ref()).context("Failed to generate")?;

    let out_path = out_dir.join(OUTPUT_FILE_NAME);
    let json = serde_json::to_string(&result)?;
    fs::write(&out_path, json)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    tracing::info!("Report written: path={}, commits={}", out_path.display(), result.commits.len());
    println!("{}", out_path.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing (quiet unless RUST_LOG says otherwise)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Generate(args) => run_generate(args),
    }
}
