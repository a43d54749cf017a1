//! Definition updates and the last-updated timestamp

use chrono::Local;
use std::time::Duration;

use super::config::{EngineConfig, UPDATE_BINARY};
use super::error::{EngineError, EngineResult};
use super::invoker;

/// Wall-clock budget for one definitions update run.
const UPDATE_TIMEOUT: Duration = Duration::from_secs(600);

/// Run the external updater, then record today's date in the UPDATED file.
pub async fn update_definitions(config: &EngineConfig) -> EngineResult<()> {
    println!("Updating Ikarus...");

    log::debug!("running {}", UPDATE_BINARY);
    let binary = config.update_binary();
    let (output, err) = invoker::invoke(&binary, &["-update"], UPDATE_TIMEOUT).await;
    println!("{}", output);
    if let Some(err) = err {
        return Err(err);
    }

    write_updated_date(config).await
}

/// Persist today's date (YYYYMMDD) as the last successful update.
pub async fn write_updated_date(config: &EngineConfig) -> EngineResult<()> {
    let wrap = |e: std::io::Error| EngineError::Io {
        path: config.updated_file().display().to_string(),
        cause: e.to_string(),
    };

    tokio::fs::create_dir_all(&config.work_dir).await.map_err(wrap)?;
    let stamp = Local::now().format("%Y%m%d").to_string();
    tokio::fs::write(config.updated_file(), stamp).await.map_err(wrap)
}

/// The recorded last-update date, falling back to the build date when no
/// UPDATED file has been written yet.
pub async fn updated_date(config: &EngineConfig) -> String {
    match tokio::fs::read_to_string(config.updated_file()).await {
        Ok(contents) => contents.trim().to_string(),
        Err(_) => crate::BUILD_TIME.to_string(),
    }
}
