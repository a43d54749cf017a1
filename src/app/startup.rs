//! Application startup and command dispatch
//!
//! Engine and store code returns errors; this module is the process
//! boundary that logs them and decides the exit code.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::cli::{Args, Command};
use crate::core::env::getopt;
use crate::core::hash::sha256_of_file;
use crate::core::logging::init_logging;
use crate::engine::{self, license, update, EngineConfig, ScanReport};
use crate::report::render_markdown_table;
use crate::store::callback::{post_callback, ENDPOINT_VAR, PROXY_VAR};
use crate::store::{ElasticStore, PluginResultRecord};

/// Environment variable overriding the content-hash scan ID.
const SCANID_VAR: &str = "MALICE_SCANID";

/// Parse arguments, run the selected command and terminate non-zero on any
/// unrecoverable error.
pub async fn startup() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    if let Err(e) = init_logging(level) {
        eprintln!("failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let config = EngineConfig::from_env();

    let outcome = match &args.command {
        Some(Command::Update) => update::update_definitions(&config).await.map_err(Into::into),
        Some(Command::Web) => crate::web::serve(config).await,
        None => run_scan(&args, &config).await,
    };

    if let Err(e) = outcome {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// The default action: scan one file and emit/persist the result.
async fn run_scan(args: &Args, config: &EngineConfig) -> Result<(), Box<dyn std::error::Error>> {
    let target = match &args.file {
        Some(file) => absolute_target(file)?,
        None => return Err("please supply a file to scan".into()),
    };

    config.check_binaries()?;

    if license::is_expired(&config.license_file())? {
        log::error!("Ikarus license has expired");
        log::error!("please get a new one here: https://www.ikarussecurity.com/");
    }

    let mut results =
        engine::scan(config, &target, Duration::from_secs(args.timeout)).await?;
    results.markdown = Some(render_markdown_table(&results));

    let scan_id = getopt(SCANID_VAR, &sha256_of_file(&target)?);

    if let Some(url) = args.elasticsearch.as_deref().filter(|u| !u.is_empty()) {
        let store = ElasticStore::new(url)?;
        store.init().await?;
        let record = PluginResultRecord::new(scan_id.clone(), results.clone());
        store.store(&record).await?;
    }

    if args.table {
        print!("{}", results.markdown.take().unwrap_or_default());
        return Ok(());
    }

    // The markdown copy only travels to the store, not to stdout/webhooks.
    results.markdown = None;
    let report = ScanReport { results };
    if env_enabled(args.callback, ENDPOINT_VAR) {
        post_callback(&report, &scan_id, env_enabled(args.proxy, PROXY_VAR)).await?;
    } else {
        println!("{}", serde_json::to_string(&report)?);
    }
    Ok(())
}

/// A boolean flag is on when passed on the command line or when its backing
/// environment variable is set non-empty.
fn env_enabled(flag: bool, var: &str) -> bool {
    flag || !getopt(var, "").is_empty()
}

/// Resolve the scan target to an absolute path, requiring it to exist.
fn absolute_target(file: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    file.canonicalize()
        .map_err(|e| format!("{}: {}", file.display(), e).into())
}
