mod echo;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use lexiscore_core::fetch::is_remote;
use lexiscore_core::{
    BatchConfig, FetchConfig, Fetcher, InputTable, Lexicons, PageFetcher, analyze_text, clean_text,
    extract_article_text, run_batch, write_output_path,
};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use crate::echo::{
    format_metrics, format_size, print_banner, print_batch_summary, print_detail, print_info, print_step,
    print_success, print_timing, print_warning,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for single-document metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: text, json", s)),
        }
    }
}

/// Score web articles for readability and sentiment
#[derive(Parser, Debug)]
#[command(name = "lexiscore")]
#[command(author = "Lexiscore Contributors")]
#[command(version)]
#[command(about = "Readability and sentiment metrics for web articles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and score every URL of an input table
    Batch(BatchArgs),
    /// Score a single URL, text file, HTML file, or stdin ("-")
    Analyze(AnalyzeArgs),
    /// Generate a shell completion script
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Word list locations
#[derive(Args, Debug)]
struct LexiconArgs {
    /// Positive word list (one word per line, `;` comments)
    #[arg(long, default_value = "MasterDictionary/positive-words.txt", value_name = "FILE")]
    positive: PathBuf,

    /// Negative word list (one word per line, `;` comments)
    #[arg(long, default_value = "MasterDictionary/negative-words.txt", value_name = "FILE")]
    negative: PathBuf,

    /// Directory of stopword lists; every file is used
    #[arg(long, default_value = "StopWords", value_name = "DIR")]
    stopwords: PathBuf,
}

impl LexiconArgs {
    fn load(&self) -> anyhow::Result<Lexicons> {
        Lexicons::load(&self.positive, &self.negative, &self.stopwords).context("Failed to load word lists")
    }
}

/// HTTP settings
#[derive(Args, Debug)]
struct FetchArgs {
    /// HTTP timeout per request in seconds
    #[arg(long, default_value = "10", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,
}

impl FetchArgs {
    fn config(&self) -> FetchConfig {
        let defaults = FetchConfig::default();
        FetchConfig { timeout: self.timeout, user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent) }
    }
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Input CSV with URL_ID and URL columns
    #[arg(short, long, default_value = "Input.csv", value_name = "FILE")]
    input: PathBuf,

    /// Output CSV
    #[arg(short, long, default_value = "Output.csv", value_name = "FILE")]
    output: PathBuf,

    /// Directory for the cleaned text of each article
    #[arg(long, default_value = "articles", value_name = "DIR")]
    articles_dir: PathBuf,

    /// Do not save cleaned article text
    #[arg(long)]
    no_save_articles: bool,

    /// Maximum number of articles fetched at once
    #[arg(short = 'j', long, default_value = "4", value_name = "NUM")]
    concurrency: usize,

    #[command(flatten)]
    lexicon: LexiconArgs,

    #[command(flatten)]
    fetch: FetchArgs,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// URL to fetch, local file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,

    /// Treat a file or stdin as HTML and extract the article text
    #[arg(long)]
    html: bool,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    #[command(flatten)]
    lexicon: LexiconArgs,

    #[command(flatten)]
    fetch: FetchArgs,
}

fn init_tracing(verbose: bool) {
    let default_filter =
        if verbose { "lexiscore=debug,lexiscore_core=debug" } else { "lexiscore=warn,lexiscore_core=warn" };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(io::stderr)
        .init();
}

fn looks_like_html(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "html" | "htm" | "xhtml"))
}

async fn batch(args: BatchArgs, verbose: bool) -> anyhow::Result<()> {
    let started = Instant::now();

    if verbose {
        print_step(1, 4, "Loading word lists");
    }
    let lexicons = args.lexicon.load()?;
    if verbose {
        print_detail("Positive", &lexicons.positive.len().to_string());
        print_detail("Negative", &lexicons.negative.len().to_string());
        print_detail("Stopwords", &lexicons.stopwords.len().to_string());
        eprintln!();
        print_step(2, 4, &format!("Reading {}", args.input.display().bright_white()));
    }

    let table = InputTable::from_path(&args.input)
        .with_context(|| format!("Failed to read input table: {}", args.input.display()))?;

    if verbose {
        print_detail("Rows", &table.len().to_string());
        eprintln!();
        print_step(3, 4, &format!("Scoring {} articles", table.len()));
    }

    let fetcher = Arc::new(PageFetcher::new(args.fetch.config()).context("Failed to build HTTP client")?);
    let mut config = BatchConfig::builder().concurrency(args.concurrency);
    if !args.no_save_articles {
        config = config.articles_dir(&args.articles_dir);
    }

    let outcome = run_batch(&table, fetcher, Arc::new(lexicons), &config.build())
        .await
        .context("Batch run failed")?;

    if verbose {
        print_step(4, 4, "Writing output");
    }
    write_output_path(&args.output, &table.headers, &outcome.rows)
        .with_context(|| format!("Failed to write output table: {}", args.output.display()))?;

    if verbose {
        print_batch_summary(&outcome.summary);
        print_timing("Elapsed", started.elapsed());
    }
    if outcome.summary.failed > 0 {
        print_warning(&format!(
            "{} of {} articles could not be fetched; their metrics are empty",
            outcome.summary.failed, outcome.summary.total
        ));
    }
    print_success(&format!("Output written to {}", args.output.display().bright_white()));

    Ok(())
}

async fn analyze(args: AnalyzeArgs, verbose: bool) -> anyhow::Result<()> {
    if verbose {
        print_step(1, 3, "Loading word lists");
    }
    let lexicons = args.lexicon.load()?;

    let text = if args.input == "-" {
        if verbose {
            print_step(2, 3, "Reading from stdin");
        }
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        if args.html {
            extract_article_text(&buffer).context("Failed to extract article text")?
        } else {
            clean_text(&buffer)
        }
    } else if is_remote(&args.input) {
        if verbose {
            print_step(2, 3, &format!("Fetching from {}", args.input.bright_white().underline()));
        }
        let fetcher = PageFetcher::new(args.fetch.config()).context("Failed to build HTTP client")?;
        fetcher.fetch(&args.input).await.context("Failed to fetch URL")?
    } else {
        if verbose {
            print_step(2, 3, &format!("Reading from file {}", args.input.bright_white()));
        }
        let content =
            fs::read_to_string(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?;
        if args.html || looks_like_html(Path::new(&args.input)) {
            extract_article_text(&content).context("Failed to extract article text")?
        } else {
            clean_text(&content)
        }
    };

    if verbose {
        print_detail("Size", &format_size(text.len()));
        eprintln!();
        print_step(3, 3, "Computing metrics");
    }

    let metrics = analyze_text(&text, &lexicons);

    let output = match args.format {
        OutputFormat::Text => format_metrics(&metrics),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&metrics).context("Failed to serialize metrics")?;
            json.push('\n');
            json
        }
    };

    match args.output {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Metrics written to {}", path.display().bright_white()));
        }
        None => print!("{}", output),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!(command = ?cli.command, "parsed arguments");

    if cli.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    match cli.command {
        Command::Batch(args) => batch(args, cli.verbose).await,
        Command::Analyze(args) => analyze(args, cli.verbose).await,
        Command::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "lexiscore", &mut io::stdout());
            Ok(())
        }
    }
}
