use std::fs;
use std::path::PathBuf;

use adapters::{decode_onchain_trades, generate_demo_trades, parse_trades_csv, OnChainEnv};
use analytics::{MetricsEngine, MetricsOptions, MetricsReport};
use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use configuration::{load_config, Config};
use filters::{filter_trades, TradeFilters};
use insights::{InsightsEngine, InsightsOptions, InsightsReport};
use journal::{AnnotationStore, JournalEntry, JournalStore};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cache;

use cache::{CacheKey, MetricsCache, DEFAULT_CACHE_CAPACITY};

/// The main entry point for the Derivision analytics CLI.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config()?;

    match &cli.command {
        Commands::Demo(_) | Commands::Csv(_) | Commands::Decode(_) => {
            handle_analysis(&cli, &config)
        }
        Commands::Journal(args) => handle_journal(args, &config),
        Commands::Annotate(args) => handle_annotate(args, &config),
    }
}

/// Runs the full pipeline for one of the trade sources: adapter -> filter ->
/// metrics (through the bounded cache) -> insights -> JSON document.
fn handle_analysis(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    // 1. Source: every adapter yields the same validated batch shape.
    let trades = match &cli.command {
        Commands::Demo(args) => {
            let count = args.count.unwrap_or(config.demo.count);
            let seed = args.seed.unwrap_or(config.demo.seed);
            generate_demo_trades(count, seed)
        }
        Commands::Csv(args) => {
            let text = fs::read_to_string(&args.file)
                .with_context(|| format!("reading {}", args.file.display()))?;
            parse_trades_csv(&text)?
        }
        Commands::Decode(args) => {
            let env = OnChainEnv {
                rpc_url: config.onchain.rpc_url.clone(),
                program_id: config.onchain.program_id.clone(),
                version: config.onchain.version,
            };
            let text = fs::read_to_string(&args.file)
                .with_context(|| format!("reading {}", args.file.display()))?;
            decode_onchain_trades(&env, &text)?
        }
        Commands::Journal(_) | Commands::Annotate(_) => {
            anyhow::bail!("not an analysis command")
        }
    };

    // 2. Filter.
    let utc_offset = config.analytics.utc_offset();
    let trade_filters = TradeFilters {
        symbol: cli.filters.symbol.clone(),
        from: cli.filters.from,
        to: cli.filters.to,
        utc_offset,
    };
    let filtered = filter_trades(&trades, &trade_filters);
    info!(total = trades.len(), kept = filtered.len(), "batch filtered");

    // 3. Metrics, through the calling layer's bounded cache. The engines
    // stay pure; memoization lives here.
    let options = MetricsOptions {
        starting_equity: cli
            .filters
            .starting_equity
            .unwrap_or(config.analytics.starting_equity),
        utc_offset,
    };
    let mut metrics_cache = MetricsCache::new(DEFAULT_CACHE_CAPACITY);
    let key = CacheKey::new(1, &trade_filters);
    let engine = MetricsEngine::new();
    let metrics = metrics_cache
        .get_or_compute(key, || engine.compute(&filtered, &options))
        .clone();

    // 4. Insights on top of the metrics report.
    let insights =
        InsightsEngine::new().compute(&filtered, &metrics, &InsightsOptions { utc_offset });

    // 5. Render.
    let document = AnalysisDocument { metrics, insights };
    let rendered = serde_json::to_string_pretty(&document)?;
    match &cli.filters.output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

fn handle_journal(args: &JournalArgs, config: &Config) -> anyhow::Result<()> {
    let mut store = JournalStore::open(&config.journal.journal_path);
    match &args.action {
        JournalAction::List => {
            let rendered = serde_json::to_string_pretty(store.entries())?;
            println!("{rendered}");
        }
        JournalAction::Add(add) => {
            let mut entry = JournalEntry::new(add.title.clone(), Utc::now());
            entry.symbols = add.symbols.clone();
            entry.tags = add.tags.clone();
            if let Some(notes) = &add.notes {
                entry.notes = notes.clone();
            }
            if let Some(confidence) = add.confidence {
                entry.confidence = confidence;
            }
            let id = entry.id.clone();
            store.upsert(entry);
            store.save()?;
            info!(id = %id, "journal entry added");
        }
        JournalAction::Remove(remove) => {
            if store.remove(&remove.id) {
                store.save()?;
                info!(id = %remove.id, "journal entry removed");
            } else {
                anyhow::bail!("no journal entry with id {}", remove.id);
            }
        }
    }
    Ok(())
}

fn handle_annotate(args: &AnnotateArgs, config: &Config) -> anyhow::Result<()> {
    let mut store = AnnotationStore::open(&config.journal.annotations_path);
    let mut annotation = store.get(&args.trade_id).cloned().unwrap_or_default();
    if let Some(notes) = &args.notes {
        annotation.notes = notes.clone();
    }
    if !args.tags.is_empty() {
        annotation.tags = args.tags.clone();
    }
    if args.reviewed {
        annotation.reviewed = true;
    }
    store.upsert(args.trade_id.clone(), annotation);
    store.save()?;
    info!(trade_id = %args.trade_id, "trade annotation saved");
    Ok(())
}

/// Trading analytics over normalized trade batches: performance metrics and
/// behavioral insights from demo, CSV, or on-chain sources, plus the local
/// trade journal.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    filters: CommonArgs,
}

#[derive(Args)]
struct CommonArgs {
    /// Restrict the analysis to a single symbol (exact match).
    #[arg(long, global = true)]
    symbol: Option<String>,

    /// First calendar day to include (YYYY-MM-DD).
    #[arg(long, global = true)]
    from: Option<NaiveDate>,

    /// Last calendar day to include, end-of-day inclusive (YYYY-MM-DD).
    #[arg(long, global = true)]
    to: Option<NaiveDate>,

    /// Overrides the configured starting-equity baseline.
    #[arg(long, global = true)]
    starting_equity: Option<Decimal>,

    /// Write the JSON report here instead of stdout.
    #[arg(long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a deterministic demo batch.
    Demo(DemoArgs),
    /// Import and analyze a CSV trade export.
    Csv(FileArgs),
    /// Decode and analyze on-chain program event logs (JSON lines).
    Decode(FileArgs),
    /// Inspect or edit the trade journal.
    Journal(JournalArgs),
    /// Attach notes to a trade by id.
    Annotate(AnnotateArgs),
}

#[derive(Args)]
struct DemoArgs {
    /// Number of generated trades.
    #[arg(long)]
    count: Option<usize>,

    /// Generator seed.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct FileArgs {
    /// Input file path.
    #[arg(long)]
    file: PathBuf,
}

#[derive(Args)]
struct JournalArgs {
    #[command(subcommand)]
    action: JournalAction,
}

#[derive(Subcommand)]
enum JournalAction {
    /// Print all journal entries, newest first.
    List,
    /// Add a new entry.
    Add(JournalAddArgs),
    /// Remove an entry by id.
    Remove(JournalRemoveArgs),
}

#[derive(Args)]
struct JournalAddArgs {
    #[arg(long)]
    title: String,

    /// Symbols this entry covers.
    #[arg(long, value_delimiter = ',')]
    symbols: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,

    #[arg(long)]
    notes: Option<String>,

    /// Conviction 1-10.
    #[arg(long)]
    confidence: Option<u8>,
}

#[derive(Args)]
struct JournalRemoveArgs {
    #[arg(long)]
    id: String,
}

#[derive(Args)]
struct AnnotateArgs {
    #[arg(long)]
    trade_id: String,

    #[arg(long)]
    notes: Option<String>,

    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,

    /// Mark the trade as reviewed.
    #[arg(long)]
    reviewed: bool,
}

/// The document printed (or written) for one analysis run.
#[derive(Serialize)]
struct AnalysisDocument {
    metrics: MetricsReport,
    insights: InsightsReport,
}
