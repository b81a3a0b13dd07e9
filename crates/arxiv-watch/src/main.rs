//! arXiv Watch - Entry Point
//!
//! Runs one discovery pass and prints the new papers to stdout. Logs go to
//! stderr so the output can be piped.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use arxiv_watch::formatters::{format_records_json_lines, format_report_markdown, run_summary_json};
use arxiv_watch::{Config, SearchTerm, Watcher};

#[derive(Parser, Debug)]
#[command(name = "arxiv-watch")]
#[command(about = "Report arXiv papers that have not been seen in earlier runs")]
#[command(version)]
struct Cli {
    /// Comma-separated search terms; the first is ANDed, the rest ORed
    /// [default: $SEARCH_TERMS, else "fraud detection"]
    #[arg(long)]
    terms: Option<String>,

    /// Directory holding the seen-set file [default: $ARXIV_WATCH_CACHE_DIR, else .cache]
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Search endpoint [default: $ARXIV_WATCH_SEARCH_URL, else arXiv advanced search]
    #[arg(long)]
    search_url: Option<String>,

    /// Output format for new papers
    #[arg(long, default_value = "json")]
    format: OutputFormat,

    /// Fetch and print, but do not update the seen-set
    #[arg(long)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Markdown digest
    Markdown,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let mut config = Config::from_env()?;
    if let Some(terms) = cli.terms.as_deref() {
        config.search_terms = SearchTerm::parse_list(terms);
    }
    if let Some(cache_dir) = cli.cache_dir {
        config.cache_dir = cache_dir;
    }
    if let Some(search_url) = cli.search_url {
        config.search_url = search_url;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        cache_dir = %config.cache_dir.display(),
        terms = config.search_terms.len(),
        dry_run = cli.dry_run,
        "Starting arXiv watch"
    );

    let watcher = Watcher::from_config(&config)?.dry_run(cli.dry_run);

    let report = match watcher.run_once().await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, corrupt_state = e.is_corrupt_state(), "Run failed");
            let message = e.to_user_message();
            return Err(anyhow::Error::new(e).context(message));
        }
    };

    tracing::info!(summary = %run_summary_json(&report), "Run complete");

    let output = match cli.format {
        OutputFormat::Json => format_records_json_lines(&report.records)?,
        OutputFormat::Markdown => format_report_markdown(&report),
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(())
}
