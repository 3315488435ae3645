mod config;
mod local_store;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::CliConfig;
use filing_diff_core::{ComparisonService, ComparedDocument, FilingComparer, FilingParser};
use local_store::{DirectoryFetcher, DirectoryRepository};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "filing-diff")]
#[command(about = "Section-by-section comparison of 10-K and 10-Q filings", long_about = None)]
struct Cli {
    /// JSON file with optional "parser" and "comparer" settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the table of contents and sections of one filing
    Parse {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },
    /// Compare two filing documents
    Compare {
        #[arg(long)]
        old: PathBuf,

        #[arg(long)]
        new: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print statistics instead of the full comparison
        #[arg(long)]
        summary: bool,
    },
    /// Compare two filings by id from a local directory store
    Filings {
        #[arg(short, long)]
        dir: PathBuf,

        #[arg(long)]
        new: String,

        #[arg(long)]
        old: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse { file, json } => cmd_parse(&file, json, &config),
        Commands::Compare {
            old,
            new,
            output,
            summary,
        } => cmd_compare(&old, &new, output.as_deref(), summary, &config),
        Commands::Filings { dir, new, old, output } => cmd_filings(&dir, &new, &old, output.as_deref(), &config),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_markup(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn cmd_parse(file: &Path, json: bool, config: &CliConfig) -> Result<()> {
    let parsed = FilingParser::parse(&read_markup(file)?, Some(&config.parser))
        .with_context(|| format!("parsing {}", file.display()))?;
    let outline = parsed.outline();

    if json {
        println!("{}", serde_json::to_string_pretty(&outline)?);
        return Ok(());
    }

    println!("Table of contents ({} entries):", outline.table_of_contents.len());
    for entry in &outline.table_of_contents {
        println!(
            "  {}{} (page {}, {})",
            "  ".repeat(entry.depth as usize),
            entry.title,
            entry.starting_page,
            entry.id
        );
    }
    println!("Sections ({}):", outline.sections.len());
    for section in &outline.sections {
        println!(
            "  {}{} [pages {}-{}, {} fragments]",
            "  ".repeat(section.depth as usize),
            section.title,
            section.page_start,
            section.page_end,
            section.fragment_count
        );
    }
    Ok(())
}

fn cmd_compare(old: &Path, new: &Path, output: Option<&Path>, summary: bool, config: &CliConfig) -> Result<()> {
    let parsed_old = FilingParser::parse(&read_markup(old)?, Some(&config.parser))
        .with_context(|| format!("parsing {}", old.display()))?;
    let parsed_new = FilingParser::parse(&read_markup(new)?, Some(&config.parser))
        .with_context(|| format!("parsing {}", new.display()))?;

    let comparison = FilingComparer::compare(&parsed_new, &parsed_old, Some(&config.comparer))?;
    if summary {
        println!("{}", serde_json::to_string_pretty(&comparison.statistics())?);
        return Ok(());
    }
    write_comparison(&comparison, output)
}

fn cmd_filings(dir: &Path, new: &str, old: &str, output: Option<&Path>, config: &CliConfig) -> Result<()> {
    let repository = DirectoryRepository::open(dir).with_context(|| format!("opening store {}", dir.display()))?;
    let service = ComparisonService::new(repository, DirectoryFetcher::new(dir))
        .with_parser_settings(config.parser.clone())
        .with_comparer_settings(config.comparer.clone());

    let result = service.compare_filings(new, old)?;
    info!(new = %result.new.url, old = %result.old.url, "resolved filings");
    write_comparison(&result.comparison, output)
}

fn write_comparison(comparison: &ComparedDocument, output: Option<&Path>) -> Result<()> {
    let stats = comparison.statistics();
    info!(
        matched = stats.sections_matched,
        inserted = stats.sections_inserted,
        deleted = stats.sections_deleted,
        added = stats.runs_added,
        removed = stats.runs_removed,
        changed = stats.runs_changed,
        unchanged = stats.runs_unchanged,
        "comparison statistics"
    );

    let json = comparison.to_json()?;
    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "wrote comparison");
        }
        None => println!("{}", json),
    }
    Ok(())
}
