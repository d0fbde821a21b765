//! MapSearch-RS: an incremental map search engine
//!
//! Reads one query per line from stdin and prints the results of the latest
//! search as soon as they are installed.

use anyhow::{Context, Result};
use mapsearch_rs::{
    config::Settings,
    providers::ProviderLoader,
    ResultCollection, SearchCore,
};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::{Arc, Weak};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let mut config_path = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                config_path = Some(PathBuf::from(args.next().context("--config needs a path")?));
            }
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            "-V" | "--version" => {
                println!("mapsearch-rs {}", mapsearch_rs::VERSION);
                return Ok(());
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                std::process::exit(2);
            }
        }
    }

    // Load configuration
    let (settings, source) = load_settings(config_path)?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.general.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    info!("Starting MapSearch-RS v{}", mapsearch_rs::VERSION);
    match &source {
        Some(path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }

    // Load providers
    let registry = ProviderLoader::load(&settings);
    if registry.is_empty() {
        warn!("No providers configured; searches will return nothing");
    }

    let core = Arc::new(SearchCore::from_settings(&settings));
    core.initialize(registry)?;

    let weak: Weak<SearchCore> = Arc::downgrade(&core);
    core.set_on_results_complete(move || {
        if let Some(core) = weak.upgrade() {
            print_collection(&core.current_search_result());
        }
    });
    core.start()?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim_end();

        if let Some(index) = line.strip_prefix(":select") {
            select(&core, index.trim());
        } else if line == ":reset" {
            core.reset_phrase();
            println!("(phrase reset)");
        } else if line == ":stats" {
            print_stats(&core);
        } else if line == ":quit" {
            break;
        } else {
            let quick = core.search(line, None);
            if !quick.is_empty() {
                println!("~ {} quick results", quick.len());
            }
        }
    }

    core.shutdown();
    Ok(())
}

/// Commit the N-th (1-based) result of the current collection and search again
fn select(core: &SearchCore, index: &str) {
    let current = core.current_search_result();
    let Some(result) = index
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| current.results().get(i))
    else {
        println!("(no result {:?}, {} available)", index, current.len());
        return;
    };

    let phrase = core.select_search_result(result.clone());
    println!("(selected {}: {})", result.object_type, result.locale_name);
    core.search(phrase.text(), None);
}

fn print_collection(collection: &ResultCollection) {
    println!("== '{}': {} results", collection.phrase(), collection.len());
    for (i, result) in collection.iter().enumerate() {
        match &result.location {
            Some(location) => println!(
                "{:>3}. [{}] {} ({})",
                i + 1,
                result.object_type,
                result.locale_name,
                location
            ),
            None => println!("{:>3}. [{}] {}", i + 1, result.object_type, result.locale_name),
        }
    }
}

fn print_stats(core: &SearchCore) {
    let metrics = core.metrics();
    println!(
        "searches: {}, completed: {}, superseded: {}",
        metrics.get_total_searches(),
        metrics.get_completed_jobs(),
        metrics.get_superseded_jobs()
    );
    let mut stats: Vec<_> = metrics.get_provider_stats().into_iter().collect();
    stats.sort_by(|a, b| a.0.cmp(&b.0));
    for (name, stat) in stats {
        println!(
            "  {}: {} runs, {} errors, avg {} ms, {:.1}% reliable",
            name,
            stat.runs,
            stat.errors,
            stat.avg_response_time.unwrap_or(0),
            stat.reliability
        );
    }
}

/// Load settings from file or use defaults
fn load_settings(explicit: Option<PathBuf>) -> Result<(Settings, Option<PathBuf>)> {
    let env_path = std::env::var("MAPSEARCH_SETTINGS_PATH").ok().map(PathBuf::from);

    if let Some(path) = explicit {
        let mut settings = Settings::from_file(&path)
            .with_context(|| format!("loading {}", path.display()))?;
        settings.merge_env();
        return Ok((settings, Some(path)));
    }

    let paths = [
        env_path,
        Some(PathBuf::from("settings.yml")),
        Some(PathBuf::from("config/settings.yml")),
        dirs::config_dir().map(|p| p.join("mapsearch-rs/settings.yml")),
    ];

    // Try each path in order
    for path in paths.into_iter().flatten() {
        if path.exists() {
            let mut settings = Settings::from_file(&path)
                .with_context(|| format!("loading {}", path.display()))?;
            settings.merge_env();
            return Ok((settings, Some(path)));
        }
    }

    // Use defaults
    let mut settings = Settings::default();
    settings.merge_env();
    Ok((settings, None))
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
MapSearch-RS v{}
An incremental map search engine

USAGE:
    mapsearch-rs [OPTIONS]

OPTIONS:
    -c, --config <FILE>    Path to configuration file
    -h, --help             Print help information
    -V, --version          Print version information

COMMANDS (stdin):
    <text>                 Search for text
    :select <N>            Commit result N as a resolved word
    :reset                 Clear the phrase
    :stats                 Print provider statistics
    :quit                  Exit

ENVIRONMENT VARIABLES:
    MAPSEARCH_SETTINGS_PATH     Path to settings.yml
    MAPSEARCH_LOG               Log filter (overridden by RUST_LOG)
    MAPSEARCH_LANG              Search language
    MAPSEARCH_SETTLE_DELAY_MS   Pause before a search runs
    MAPSEARCH_QUEUE_CAPACITY    Background queue size
    MAPSEARCH_TOTAL_LIMIT       Maximum retained results (0 = unlimited)
"#,
        mapsearch_rs::VERSION
    );
}
