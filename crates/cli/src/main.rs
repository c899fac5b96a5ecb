use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use rovat_core::{
    Article, ConfigLoader, ConfigLoaderBuilder, Digest, Extractor, ExtractorConfig, JsonConfig, JsonFormatter,
    JunkClassifier, MarkdownConfig, MarkdownFormatter, TextConfig, TextFormatter, fetch_file,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format of the digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Markdown,
    Json,
    Text,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "text" | "txt" => Ok(Self::Text),
            _ => Err(format!("Invalid format: {}. Valid options: markdown, json, text", s)),
        }
    }
}

/// Build a weekly news digest from article URLs or saved HTML pages
#[derive(Parser, Debug)]
#[command(name = "rovat")]
#[command(version)]
#[command(about = "Build a weekly news digest from article URLs", long_about = None)]
struct Args {
    /// Article URLs or local HTML files; "-" reads URLs from stdin, one per line
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<String>,

    /// Rovat (section) label shown in the digest header
    #[arg(short, long, default_value = "Hírek")]
    rovat: String,

    /// Week label shown under the header
    #[arg(short, long, default_value = "")]
    week: String,

    /// Output format (markdown, json, text)
    #[arg(short, long, default_value = "markdown", value_name = "FORMAT")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Include TOML frontmatter (Markdown only)
    #[arg(long)]
    frontmatter: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "25", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Maximum number of articles fetched at once
    #[arg(long, default_value = "8", value_name = "NUM")]
    concurrency: usize,

    /// Junk pattern file replacing the bundled list (one regex per line)
    #[arg(long, value_name = "FILE")]
    junk_patterns: Option<PathBuf>,

    /// Directory of site rule files (default: ~/.config/rovat/sites)
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rovat_core={level},rovat={level}")));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}

/// Expands "-" into the URL list read from stdin. Blank and `#` lines are skipped.
fn read_inputs(inputs: &[String]) -> anyhow::Result<Vec<String>> {
    let mut expanded = Vec::with_capacity(inputs.len());
    for input in inputs {
        if input != "-" {
            expanded.push(input.clone());
            continue;
        }
        for line in io::stdin().lock().lines() {
            let line = line.context("Failed to read URL list from stdin")?;
            let line = line.trim();
            if !line.is_empty() && !line.starts_with('#') {
                expanded.push(line.to_string());
            }
        }
    }
    debug!(count = expanded.len(), "resolved inputs");
    Ok(expanded)
}

fn is_local_file(input: &str) -> bool {
    !input.starts_with("http://") && !input.starts_with("https://") && Path::new(input).is_file()
}

fn build_extractor(args: &Args) -> anyhow::Result<Extractor> {
    let mut builder = ExtractorConfig::builder().timeout(args.timeout).concurrency(args.concurrency);
    if let Some(user_agent) = &args.user_agent {
        builder = builder.user_agent(user_agent);
    }

    let mut extractor = Extractor::new(builder.build()).context("Failed to set up the HTTP client")?;

    if let Some(path) = &args.junk_patterns {
        let junk = JunkClassifier::from_file(path)
            .with_context(|| format!("Failed to load junk patterns from {}", path.display()))?;
        extractor = extractor.with_junk(Arc::new(junk));
    }

    let loader = match &args.config_dir {
        Some(dir) => ConfigLoaderBuilder::new().custom_dir(dir).build(),
        None => ConfigLoader::default(),
    };
    let rules = loader.load().context("Failed to load site rules")?;
    Ok(extractor.with_site_rules(Arc::new(rules)))
}

/// Extracts every input, keeping input order. Local files skip the fetch step.
async fn extract_inputs(extractor: &Extractor, inputs: &[String]) -> Vec<Article> {
    let local: Vec<bool> = inputs.iter().map(|input| is_local_file(input)).collect();
    let urls: Vec<String> =
        inputs.iter().zip(&local).filter(|(_, is_file)| !**is_file).map(|(input, _)| input.clone()).collect();
    let mut fetched = extractor.extract_all(&urls).await.into_iter();

    inputs
        .iter()
        .zip(local)
        .map(|(input, is_file)| {
            if !is_file {
                return fetched.next().unwrap_or_else(|| Article::empty(input.as_str()));
            }
            debug!(path = %input, "extracting local file");
            match fetch_file(input) {
                Ok(html) => extractor.extract_html(input, &html),
                Err(e) => {
                    echo::print_warning(&format!("Skipping {}: {}", input, e));
                    Article::empty(input.as_str())
                }
            }
        })
        .collect()
}

fn render(digest: &Digest, args: &Args) -> anyhow::Result<String> {
    let output = match args.format {
        OutputFormat::Markdown => {
            MarkdownFormatter::new(MarkdownConfig { include_frontmatter: args.frontmatter }).convert(digest)
        }
        OutputFormat::Json => JsonFormatter::new(JsonConfig { pretty: args.pretty }).convert(digest),
        OutputFormat::Text => TextFormatter::new(TextConfig { line_width: 80 }).convert(digest),
    };
    output.with_context(|| format!("Failed to render the digest as {:?}", args.format))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    if args.verbose {
        echo::print_step(1, 4, "Loading configuration");
    }
    let extractor = build_extractor(&args)?;
    let inputs = read_inputs(&args.inputs)?;
    if args.verbose {
        eprintln!("  {} {}", "Inputs:".dimmed(), inputs.len().to_string().bright_white());
        let rules = extractor.site_rules();
        eprintln!(
            "  {} {} {}",
            "Site rules:".dimmed(),
            rules.len().to_string().bright_white(),
            format!("({})", rules.hosts().join(", ")).dimmed()
        );
        eprintln!();
        echo::print_step(2, 4, "Extracting articles");
    }

    let started = Instant::now();
    let articles = extract_inputs(&extractor, &inputs).await;
    if args.verbose {
        echo::print_timing("Extraction", started.elapsed());
        eprintln!();
        echo::print_step(3, 4, "Building digest");
    }

    let digest = Digest::new(&args.rovat, &args.week, articles, extractor.config().lead_cap);
    if args.verbose {
        echo::print_digest_details(&digest);
    }
    if digest.empty_articles() > 0 {
        echo::print_warning(&format!("{} of {} articles came back empty", digest.empty_articles(), digest.len()));
    }

    let output = render(&digest, &args)?;

    if args.verbose {
        echo::print_step(4, 4, "Writing output");
        eprintln!("  {} {}", "Format:".dimmed(), format!("{:?}", args.format).bright_white());
        eprintln!("  {} {}", "Size:".dimmed(), echo::format_size(output.len()).bright_white());
        eprintln!();
    }

    match &args.output {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Digest written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    Ok(())
}
