//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use logocrawler_core::{LogoPipeline, Orchestrator, PipelineOptions};
use logocrawler_crawler::{HttpOptions, build_http_client};
use logocrawler_discovery::{ExtractorOptions, ImageRules};
use logocrawler_report::{RunStats, default_report_path, write_html_report, write_json_report};
use logocrawler_shared::{
    AppConfig, DEFAULT_CONFIG_FILE, OrganizationResult, init_config, load_config_from,
    read_organizations,
};
use tracing::{info, warn};

use crate::browser::open_in_browser;
use crate::progress::CliProgress;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// LogoCrawler: discover, validate, and rank organization logos.
#[derive(Parser)]
#[command(
    name = "logocrawler",
    version,
    about = "Discover, validate, and rank logos for a list of organizations.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Crawl logos for every organization in an input file.
    Run {
        /// File with one organization name or domain per line.
        #[arg(short, long, env = "PUBLISHER_FILE_PATH")]
        input: PathBuf,

        /// TOML config with the preferred logo size.
        #[arg(short, long, env = "CONFIG_FILE_PATH")]
        config: PathBuf,

        /// Concurrent organizations (defaults to config, then min(cpus, 10)).
        #[arg(short, long, env = "MAX_WORKERS")]
        workers: Option<usize>,

        /// HTML report path (defaults to reports/logo-crawler-report-<timestamp>.html).
        #[arg(short, long, env = "HTML_OUTPUT_PATH")]
        output: Option<PathBuf>,

        /// Also export the results as JSON to this path.
        #[arg(long)]
        json: Option<PathBuf>,

        /// Do not open the report in a browser.
        #[arg(long)]
        no_open: bool,
    },

    /// Run the pipeline for a single organization and print every scored logo.
    Probe {
        /// Organization name, domain, or URL.
        name: String,

        /// TOML config (built-in defaults when omitted and no logocrawler.toml exists).
        #[arg(short, long, env = "CONFIG_FILE_PATH")]
        config: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a config file with defaults.
    Init {
        /// Where to write the file.
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },
    /// Show resolved configuration.
    Show {
        /// Config file to resolve (defaults to ./logocrawler.toml).
        #[arg(short, long, env = "CONFIG_FILE_PATH")]
        config: Option<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "logocrawler=info",
        1 => "logocrawler=debug",
        _ => "logocrawler=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run {
            input,
            config,
            workers,
            output,
            json,
            no_open,
        } => {
            let args = RunArgs {
                input,
                config,
                workers,
                output,
                json,
                no_open,
            };
            cmd_run(&args).await
        }
        Command::Probe { name, config } => cmd_probe(&name, config.as_deref()).await,
        Command::Config { action } => match action {
            ConfigAction::Init { path } => cmd_config_init(&path),
            ConfigAction::Show { config } => cmd_config_show(config.as_deref()),
        },
    }
}

// ---------------------------------------------------------------------------
// Shared setup
// ---------------------------------------------------------------------------

/// Build the pipeline from loaded config and the default transport settings.
fn build_pipeline(config: &AppConfig) -> Result<LogoPipeline> {
    let client = build_http_client(&HttpOptions::default())?;

    let rules = ImageRules::default().extended(
        &config.heuristics.logo_keywords,
        &config.heuristics.exclude_keywords,
    );
    let options = PipelineOptions {
        extractor: ExtractorOptions {
            rules,
            ..ExtractorOptions::default()
        },
        ..PipelineOptions::default()
    };

    Ok(LogoPipeline::new(&client, options))
}

/// Explicit path, else `./logocrawler.toml` if present, else defaults.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = path {
        return Ok(load_config_from(path)?);
    }

    let local = Path::new(DEFAULT_CONFIG_FILE);
    if local.exists() {
        Ok(load_config_from(local)?)
    } else {
        Ok(AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

struct RunArgs {
    input: PathBuf,
    config: PathBuf,
    workers: Option<usize>,
    output: Option<PathBuf>,
    json: Option<PathBuf>,
    no_open: bool,
}

async fn cmd_run(args: &RunArgs) -> Result<()> {
    let config = load_config_from(&args.config)?;
    let organizations = read_organizations(&args.input)?;
    if organizations.is_empty() {
        return Err(eyre!(
            "no organizations found in {}",
            args.input.display()
        ));
    }

    let workers = match args.workers {
        Some(0) => return Err(eyre!("--workers must be at least 1")),
        Some(n) => n,
        None => config.max_workers(),
    };
    let prefs = config.preferred;

    info!(
        organizations = organizations.len(),
        workers,
        min_width = prefs.min_width,
        min_height = prefs.min_height,
        "starting logo crawl"
    );
    println!(
        "Loaded {} organizations, crawling with {workers} workers",
        organizations.len()
    );

    let pipeline = build_pipeline(&config)?;
    let orchestrator = Orchestrator::new(Arc::new(pipeline), workers);

    let start = Instant::now();
    let reporter = CliProgress::new();
    let results = orchestrator.run(&organizations, prefs, &reporter).await;
    let elapsed = start.elapsed();

    let stats = RunStats::from_results(&results, elapsed);
    print_results(&results);
    print_stats(&stats);

    let report_path = args.output.clone().unwrap_or_else(default_report_path);
    write_html_report(&report_path, &results, elapsed)?;
    println!("  Report: {}", report_path.display());

    if let Some(json_path) = &args.json {
        write_json_report(json_path, &results, elapsed)?;
        println!("  JSON:   {}", json_path.display());
    }
    println!();

    if !args.no_open {
        if let Err(e) = open_in_browser(&report_path) {
            warn!(error = %e, "could not open report");
        }
    }

    Ok(())
}

fn print_results(results: &[OrganizationResult]) {
    for result in results {
        println!();
        if let Some(error) = &result.error {
            println!(
                "  {} ({:.2?}) ERROR: {error}",
                result.organization, result.duration
            );
            continue;
        }

        println!("  {} ({:.2?})", result.organization, result.duration);
        if result.logos.is_empty() {
            println!("    no valid logos found");
            continue;
        }
        for logo in &result.logos {
            let marker = if result.is_best(logo) { "*" } else { " " };
            println!(
                "  {marker} {} ({}x{})",
                logo.url(),
                logo.width(),
                logo.height()
            );
        }
    }
}

fn print_stats(stats: &RunStats) {
    println!();
    println!("  Crawl complete!");
    println!("  Organizations: {}", stats.total);
    println!("  With logos:    {}", stats.with_logos);
    println!("  Errors:        {}", stats.errors);
    println!("  Total logos:   {}", stats.total_logos);
    println!("  Success rate:  {:.1}%", stats.success_rate);
    println!(
        "  Time:          {:.1}s (avg {:.2?} per organization)",
        stats.total_duration.as_secs_f64(),
        stats.average_duration
    );
    println!();
}

// ---------------------------------------------------------------------------
// probe
// ---------------------------------------------------------------------------

async fn cmd_probe(name: &str, config: Option<&Path>) -> Result<()> {
    let config = resolve_config(config)?;
    let prefs = config.preferred;
    let pipeline = build_pipeline(&config)?;

    let start = Instant::now();
    let found = pipeline.fetch_logos(name, &prefs).await;

    println!();
    println!("  Input:  {name}");
    println!("  Domain: {}", found.domain);
    println!("  Time:   {:.2?}", start.elapsed());
    println!();

    if found.logos.is_empty() {
        println!("  No valid logos found");
        println!();
        return Ok(());
    }

    for (logo, score) in pipeline.selector().scored(&found.logos, &prefs) {
        let marker = if found.best.as_ref().is_some_and(|b| b.url() == logo.url()) {
            "*"
        } else {
            " "
        };
        println!(
            "  {marker} {score:>4}  {:>5}x{:<5} {}",
            logo.width(),
            logo.height(),
            logo.url()
        );
    }
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

fn cmd_config_init(path: &Path) -> Result<()> {
    let path = init_config(path)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: Option<&Path>) -> Result<()> {
    let config = resolve_config(config)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    println!("# effective max_workers = {}", config.max_workers());
    Ok(())
}
