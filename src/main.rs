//! tsubuyaki: Command-line interface for tagged tokenization of social-media text

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde_json::json;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tsubuyaki::config::{path_resolver, AppConfig};
use tsubuyaki::loader::{collect_input_files, JsonlLoader, LineLoader, LoadedPost, StructuredPost};
use tsubuyaki::patterns::{EmojiPatternSource, PatternLibrary};
use tsubuyaki::pipeline::{InputSource, Pipeline};
use tsubuyaki::tokenizer::{LinderaAnalyzer, MorphAnalyzer};
use tsubuyaki::TokenizeError;

// ============================================================================
// CLI Definition
// ============================================================================

/// tsubuyaki: entity extraction and tagged tokenization for Japanese posts
#[derive(Parser)]
#[command(name = "tsubuyaki")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize tsubuyaki configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
    /// Tokenize text or posts, one JSON object per item on stdout
    Tokenize {
        #[command(flatten)]
        source: SourceArgs,

        /// Emit lemmas instead of surface forms (structured posts only)
        #[arg(long)]
        lemma: bool,
    },
    /// Emit retweet/reply/exclude features only
    Features {
        #[command(flatten)]
        source: SourceArgs,
    },
}

/// Where items come from and how to read them
#[derive(Args)]
struct SourceArgs {
    /// Text to process; reads inputs or stdin when omitted
    text: Option<String>,

    /// Input file(s) or directory(s) - can be specified multiple times
    #[arg(short, long, action = ArgAction::Append)]
    input: Vec<String>,

    /// Treat input lines as platform post JSON
    #[arg(short, long)]
    structured: bool,

    /// Path to a config file (default: XDG config dir)
    #[arg(short, long)]
    config: Option<String>,

    /// Keyword to merge and filter by - can be specified multiple times
    #[arg(short, long, action = ArgAction::Append)]
    keyword: Vec<String>,

    /// Accept input without kana or kanji
    #[arg(long)]
    all_scripts: bool,
}

/// Which output each item produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    TokensAndFeatures,
    FeaturesOnly,
}

/// One unit of work, with where it came from for error reports
struct Item {
    origin: String,
    input: std::result::Result<InputSource, TokenizeError>,
}

// ============================================================================
// Configuration and Setup
// ============================================================================

/// Defaults < config file < environment < CLI flags
fn load_config(source: &SourceArgs, lemma: bool) -> Result<AppConfig> {
    let file_config = match &source.config {
        Some(path) => AppConfig::from_file(&path_resolver::resolve_path(path)?)?,
        None => {
            let default_path = path_resolver::get_default_config_path();
            if default_path.exists() {
                AppConfig::from_file(&default_path)?
            } else {
                AppConfig::default()
            }
        }
    };

    let mut config = file_config.merge_with(&AppConfig::from_env());
    if !source.keyword.is_empty() {
        config = config.with_keywords(source.keyword.clone());
    }
    if source.all_scripts {
        config = config.with_japanese_only(false);
    }
    if lemma {
        config = config.with_output_lemma(true);
    }

    config.validate()?;
    Ok(config)
}

fn build_pipeline(config: &AppConfig) -> Result<Pipeline<LinderaAnalyzer>> {
    let emoji = match config.emoji_pattern_file()? {
        Some(path) => EmojiPatternSource::from_file(&path)?,
        None => EmojiPatternSource::bundled(),
    };
    let patterns = PatternLibrary::new(&emoji).context("Failed to compile recognizers")?;
    let analyzer = LinderaAnalyzer::with_dictionary(&config.dictionary_source()?)?;
    Ok(Pipeline::new(
        Arc::new(patterns),
        analyzer,
        config.pipeline_options(),
    ))
}

// ============================================================================
// Input Collection
// ============================================================================

fn post_items(origin: &str, posts: Vec<LoadedPost>) -> Vec<Item> {
    posts
        .into_iter()
        .map(|loaded| Item {
            origin: format!("{}:{}", origin, loaded.line_number),
            input: loaded.post.map(InputSource::Post),
        })
        .collect()
}

fn line_items(origin: &str, lines: Vec<String>) -> Vec<Item> {
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| Item {
            origin: format!("{}:{}", origin, i + 1),
            input: Ok(InputSource::Text(line)),
        })
        .collect()
}

fn collect_items(source: &SourceArgs) -> Result<Vec<Item>> {
    if let Some(text) = &source.text {
        let input = if source.structured {
            StructuredPost::from_json(text).map(InputSource::Post)
        } else {
            Ok(InputSource::text(text.as_str()))
        };
        return Ok(vec![Item {
            origin: "arg".to_string(),
            input,
        }]);
    }

    if source.input.is_empty() {
        let stdin = std::io::stdin().lock();
        return Ok(if source.structured {
            post_items("stdin", JsonlLoader::load_from_reader(stdin)?)
        } else {
            line_items("stdin", LineLoader::load_from_reader(stdin)?)
        });
    }

    let inputs = source
        .input
        .iter()
        .map(|i| path_resolver::resolve_path(i))
        .collect::<Result<Vec<PathBuf>>>()?;

    let mut items = Vec::new();
    for file in collect_input_files(&inputs)? {
        let origin = file.display().to_string();
        if source.structured {
            items.extend(post_items(&origin, JsonlLoader::load_from_file(&file)?));
        } else {
            items.extend(line_items(&origin, LineLoader::load_from_file(&file)?));
        }
    }
    tracing::info!(items = items.len(), "Collected input items");
    Ok(items)
}

// ============================================================================
// Processing
// ============================================================================

fn process_item<A: MorphAnalyzer>(
    pipeline: &Pipeline<A>,
    item: &Item,
    mode: OutputMode,
) -> serde_json::Value {
    let input = match &item.input {
        Ok(input) => input,
        Err(e) => {
            tracing::warn!(origin = item.origin.as_str(), error = %e, "Skipping unreadable item");
            return json!({ "source": item.origin, "error": e.to_string() });
        }
    };

    let features = match pipeline.features(input) {
        Ok(features) => features,
        Err(e) => return json!({ "source": item.origin, "error": e.to_string() }),
    };

    if mode == OutputMode::FeaturesOnly {
        return json!({ "features": features });
    }

    match pipeline.tokenize(input) {
        Ok(tokens) => json!({ "tokens": tokens, "features": features }),
        Err(e) => {
            tracing::warn!(origin = item.origin.as_str(), error = %e, "Failed to tokenize item");
            json!({ "source": item.origin, "error": e.to_string() })
        }
    }
}

fn run(source: &SourceArgs, lemma: bool, mode: OutputMode) -> Result<()> {
    let config = load_config(source, lemma)?;
    let pipeline = build_pipeline(&config)?;
    let items = collect_items(source)?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut failures = 0usize;

    for item in &items {
        let record = process_item(&pipeline, item, mode);
        if record.get("error").is_some() {
            failures += 1;
        }
        serde_json::to_writer(&mut out, &record)?;
        writeln!(out)?;
    }
    out.flush()?;

    if failures > 0 {
        eprintln!("{} of {} item(s) failed", failures, items.len());
    }
    Ok(())
}

fn init_config(force: bool) -> Result<()> {
    let config_dir = path_resolver::get_config_dir();
    let config_path = config_dir.join("config.toml");

    eprintln!("Initializing tsubuyaki configuration...");
    eprintln!("Config directory: {}", config_dir.display());

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        eprintln!("Created config directory");
    }

    if config_path.exists() && !force {
        eprintln!("Configuration file already exists: {}", config_path.display());
        eprintln!("Use --force to overwrite");
        return Ok(());
    }

    write_default_config(&config_path)?;

    eprintln!("Created configuration file: {}", config_path.display());
    eprintln!("Edit {} to customize settings.", config_path.display());
    Ok(())
}

fn write_default_config(path: &Path) -> Result<()> {
    let toml_content = AppConfig::default().to_toml()?;
    std::fs::write(path, &toml_content)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries JSON lines
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Init { force } => init_config(force),
        Commands::Tokenize { source, lemma } => run(&source, lemma, OutputMode::TokensAndFeatures),
        Commands::Features { source } => run(&source, false, OutputMode::FeaturesOnly),
    }
}
