//! Ikarus Engine Component
//!
//! Orchestrates the external IKARUS t3scan engine: process invocation with a
//! hard timeout, strict parsing of the scanner's text output, license expiry
//! checks and definition updates. Nothing in this module terminates the
//! process; every failure is returned to the command or request boundary.

pub mod config;
pub mod error;
pub mod invoker;
pub mod license;
pub mod parser;
pub mod types;
pub mod update;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use types::{ScanReport, ScanResult};

use std::path::Path;
use std::time::Duration;

/// Run one antivirus scan against `target` and parse the outcome.
///
/// The target path is threaded through every hop as an explicit parameter so
/// concurrent web requests never share scan state.
///
/// A detection exit from the scanner is part of a successful scan; any other
/// invocation failure that survived the retry is returned as `Err` so the
/// command or request boundary can fail the calling flow. Only parse
/// inconsistencies travel onwards as error-carrying results.
pub async fn scan(
    config: &EngineConfig,
    target: &Path,
    timeout: Duration,
) -> EngineResult<ScanResult> {
    let updated = update::updated_date(config).await;

    log::debug!("running {} against {}", config::SCAN_BINARY, target.display());
    let binary = config.scan_binary();
    let target_arg = target.display().to_string();
    let (output, invocation_error) = invoker::invoke(&binary, &[target_arg.as_str()], timeout).await;
    log::debug!("scanner output for {}:\n{}", target.display(), output);

    match invocation_error {
        Some(err) if !err.is_detection() => Err(err),
        invocation_error => Ok(parser::parse(&output, invocation_error.as_ref(), &updated)),
    }
}
