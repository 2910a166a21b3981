use anyhow::{anyhow, Result};
use clap::Parser;
use fluxstyle_config::storage::JsonStorageAdapter;
use fluxstyle_config::{config, config_store, config_store_write};
use fluxstyle_cssom::memory::{MemoryCssom, MemoryDocument};
use fluxstyle_rules::declarative::apply_str;
use fluxstyle_rules::{ManagerConfig, StyleSheetRegistry};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

/// Builds a style sheet from one or more declarative json files and prints the resulting css
#[derive(Debug, Parser)]
#[clap(name = "Style-Builder", version = "0.1.0", author = "Fluxstyle")]
struct Cli {
    /// Declarative style files, applied in order
    #[clap(required = true)]
    files: Vec<PathBuf>,

    /// Id of the style element to build into (defaults to stylesheet.default_id)
    #[clap(short = 's', long = "sheet-id")]
    sheet_id: Option<String>,

    /// Settings file (json) to read the stylesheet.* settings from
    #[clap(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[clap(short = 'd', long = "debug")]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    if let Some(path) = &args.config {
        let storage = JsonStorageAdapter::try_from(path.as_path())?;
        config_store_write().set_storage(Box::new(storage));
    }

    let level = if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::from_str(&config!(string "cli.log_level")).unwrap_or(LevelFilter::Warn)
    };
    SimpleLogger::new().with_level(level).init()?;

    let config = ManagerConfig::from_store(&config_store());
    let mut registry = StyleSheetRegistry::<MemoryCssom>::new(MemoryDocument::new(), config);
    let manager = match &args.sheet_id {
        Some(id) => registry.get_or_create(id)?,
        None => registry.default_manager()?,
    };

    for file in &args.files {
        let json = fs::read_to_string(file).map_err(|err| anyhow!("cannot read {}: {err}", file.display()))?;
        apply_str(&manager, &json).map_err(|err| anyhow!("{}: {err}", file.display()))?;
        info!("applied {}", file.display());
    }

    info!(
        "sheet '{}' has {} rules, {} media blocks",
        manager.id(),
        manager.rule_count(),
        manager.media_block_count()
    );
    println!("{}", registry.document().css_text());

    Ok(())
}
