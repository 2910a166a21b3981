use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use derive_more::Display;
use fluxstyle_config::settings::Setting;
use fluxstyle_config::storage::{JsonStorageAdapter, MemoryStorageAdapter};
use fluxstyle_config::{config_store, config_store_write, StorageAdapter};
use std::mem;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Inspects and edits the settings used by the style sheet tools (`stylesheet.*`, `cli.*`)
#[derive(Debug, Parser)]
#[clap(name = "Config-Store", version = "0.1.0", author = "Fluxstyle")]
struct Cli {
    /// Where settings are kept
    #[clap(short = 'e', long = "engine", global = true, default_value = "json")]
    engine: Engine,

    /// Settings file for the json engine
    #[clap(short = 'p', long = "path", global = true, default_value = "settings.json")]
    path: PathBuf,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Lists every setting; overridden values are marked with `*`
    List,
    /// Shows value, default and description of one setting
    View { key: String },
    /// Lists settings whose key matches a wildcard pattern (ie: `stylesheet.*`)
    Search { pattern: String },
    /// Stores a value, given with its type prefix (ie: `s:rem`, `b:false`)
    Set { key: String, value: String },
    /// Stores the default value of a setting again
    Reset { key: String },
}

#[derive(Clone, Copy, Debug, Display, clap::ValueEnum)]
enum Engine {
    #[display("json")]
    Json,
    #[display("memory")]
    Memory,
}

fn open_storage(engine: Engine, path: &Path) -> Result<Box<dyn StorageAdapter>> {
    Ok(match engine {
        Engine::Json => Box::new(
            JsonStorageAdapter::try_from(path)
                .map_err(|err| anyhow!("cannot open {engine} storage at {}: {err}", path.display()))?,
        ),
        Engine::Memory => Box::new(MemoryStorageAdapter::new()),
    })
}

/// Current value and default of a known setting
fn lookup(key: &str) -> Result<(Setting, Setting)> {
    let store = config_store();
    let info = store.get_info(key).ok_or_else(|| anyhow!("unknown setting '{key}'"))?;
    let value = store.get(key).unwrap_or_else(|| info.default.clone());
    Ok((value, info.default))
}

fn print_rows(keys: &[String]) -> Result<()> {
    if keys.is_empty() {
        println!("No settings found");
    }

    for key in keys {
        let (value, default) = lookup(key)?;
        let marker = if value == default { ' ' } else { '*' };
        println!("{marker} {key:36} {value}");
    }
    Ok(())
}

fn store_value(key: &str, value: Setting) -> Result<()> {
    let (_, default) = lookup(key)?;
    if mem::discriminant(&value) != mem::discriminant(&default) {
        bail!("'{key}' expects a value like '{default}', got '{value}'");
    }

    config_store().set(key, value.clone());
    println!("{key} = {value}");
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    config_store_write().set_storage(open_storage(args.engine, &args.path)?);

    match args.command {
        Command::List => {
            let keys = config_store().find("*");
            print_rows(&keys)?;
        }
        Command::Search { pattern } => {
            let keys = config_store().find(&pattern);
            print_rows(&keys)?;
        }
        Command::View { key } => {
            let (value, default) = lookup(&key)?;
            let description = config_store()
                .get_info(&key)
                .map(|info| info.description)
                .unwrap_or_default();

            println!("Key         : {key}");
            println!("Value       : {value}");
            println!("Default     : {default}");
            println!("Description : {description}");
        }
        Command::Set { key, value } => {
            let setting = Setting::from_str(&value).map_err(|err| anyhow!("incorrect value '{value}': {err}"))?;
            store_value(&key, setting)?;
        }
        Command::Reset { key } => {
            let (_, default) = lookup(&key)?;
            store_value(&key, default)?;
        }
    }

    Ok(())
}
