//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use sitekb_core::{BuildResult, ProgressReporter, build_knowledge_base};
use sitekb_crawler::FetchOptions;
use sitekb_shared::{CrawlConfig, CrawlOptions, config_file_path, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// sitekb — turn a website into a business knowledge base.
#[derive(Parser)]
#[command(
    name = "sitekb",
    version,
    about = "Crawl a website and extract contact data, opening hours, services, and text.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
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
    /// Crawl a website and export its knowledge base.
    Build {
        /// Start URL ("https://" is assumed when the scheme is omitted).
        url: String,

        /// Maximum link-following depth (overrides config).
        #[arg(long)]
        max_depth: Option<u32>,

        /// Maximum number of pages to crawl (overrides config).
        #[arg(long)]
        max_pages: Option<usize>,

        /// Output directory (defaults to the configured output_dir).
        #[arg(short, long)]
        out: Option<String>,

        /// Also write a readable plain-text rendering next to the JSON.
        #[arg(long)]
        text: bool,
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
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "sitekb=info",
        1 => "sitekb=debug",
        _ => "sitekb=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build {
            url,
            max_depth,
            max_pages,
            out,
            text,
        } => cmd_build(&url, max_depth, max_pages, out.as_deref(), text).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

/// Prepend `https://` when the URL carries no scheme.
fn ensure_protocol(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

async fn cmd_build(
    url: &str,
    max_depth: Option<u32>,
    max_pages: Option<usize>,
    out: Option<&str>,
    text: bool,
) -> Result<()> {
    let config = load_config()?;
    let crawl_config = CrawlConfig::from(&config);

    let start_url = ensure_protocol(url);

    let options = CrawlOptions {
        max_depth: max_depth.unwrap_or(crawl_config.options.max_depth),
        max_pages: max_pages.unwrap_or(crawl_config.options.max_pages),
    };
    let fetch = FetchOptions {
        timeout_secs: crawl_config.timeout_secs,
        max_redirects: crawl_config.max_redirects,
        user_agent: crawl_config.user_agent.clone(),
    };

    let output_dir = match out {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(&config.defaults.output_dir),
    };

    info!(
        url = %start_url,
        max_depth = options.max_depth,
        max_pages = options.max_pages,
        "building knowledge base"
    );

    let reporter = CliProgress::new();
    let result = build_knowledge_base(&start_url, options, &fetch, &reporter).await?;

    if result.knowledge_base.pages.is_empty() {
        return Err(eyre!(
            "no pages crawled from '{start_url}' ({} fetch errors) — is the site reachable?",
            result.errors.len()
        ));
    }

    let stamp = Utc::now().timestamp_millis();
    let json_path = output_dir.join(format!("kb-{stamp}.json"));
    sitekb_core::write_json_file(&result.knowledge_base, &json_path)?;

    let text_path = if text {
        let path = output_dir.join(format!("kb-{stamp}.txt"));
        sitekb_core::write_text_file(&result.knowledge_base, &path)?;
        Some(path)
    } else {
        None
    };

    print_summary(&result, &json_path, text_path.as_deref());
    Ok(())
}

fn print_summary(result: &BuildResult, json_path: &std::path::Path, text_path: Option<&std::path::Path>) {
    let kb = &result.knowledge_base;
    println!();
    println!("  Knowledge base built!");
    println!("  Pages:    {}", kb.pages.len());
    println!("  Errors:   {}", result.errors.len());
    println!(
        "  Contact:  {}",
        if kb.contact.is_some() { "found" } else { "none" }
    );
    println!("  Hours:    {}", kb.opening_hours.len());
    println!("  Services: {}", kb.services.len());
    println!("  JSON:     {}", json_path.display());
    if let Some(path) = text_path {
        println!("  Text:     {}", path.display());
    }
    println!("  Time:     {:.1}s", result.elapsed.as_secs_f64());
    println!();

    for error in &result.errors {
        println!("  warning: {} — {}", error.url, error.message);
    }
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config written to {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let path = config_file_path()?;
    println!("# {}", path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _result: &BuildResult) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_defaults_to_https() {
        assert_eq!(ensure_protocol("muster.de"), "https://muster.de");
        assert_eq!(ensure_protocol("  muster.de/kontakt "), "https://muster.de/kontakt");
        assert_eq!(ensure_protocol("http://muster.de"), "http://muster.de");
        assert_eq!(ensure_protocol("https://muster.de"), "https://muster.de");
    }
}
