//! LevelDB Viewer - Entry Point

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use ldbv::config::{self, CliOverrides};
use ldbv::model::AppError;
use ldbv::store::LevelDbStore;

/// LevelDB Viewer - browse, inspect, and export LevelDB databases
#[derive(Parser, Debug)]
#[command(name = "ldbv")]
#[command(version)]
#[command(about = "TUI browser for LevelDB databases")]
pub struct Args {
    /// Path to the LevelDB database directory
    #[arg(value_name = "DB_PATH")]
    pub db: PathBuf,

    /// Keys per page (default 100)
    #[arg(short, long)]
    pub page_size: Option<usize>,

    /// Directory for exported files (default leveldb_dump/)
    #[arg(long)]
    pub dump_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Path to the log file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Precedence chain: defaults → config file → env vars → CLI flags.
    let config = {
        let config_file = config::load_config_with_precedence(args.config.clone())?;
        let merged = config::merge_config(config_file);
        let with_env = config::apply_env_overrides(merged);
        config::apply_cli_overrides(
            with_env,
            CliOverrides {
                page_size: args.page_size,
                dump_dir: args.dump_dir.clone(),
                log_file: args.log_file.clone(),
            },
        )
    };

    ldbv::logging::init(&config.log_file_path)?;
    info!(config = ?config, db = %args.db.display(), "configuration resolved");

    // Fatal: a browser over a database it cannot open has nothing to show.
    let store = LevelDbStore::open(&args.db).map_err(AppError::Store)?;

    ldbv::view::run_with_store(store, &config)?;
    Ok(())
}
