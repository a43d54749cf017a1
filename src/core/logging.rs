//! Logger initialization built on flexi_logger

use flexi_logger::{DeferredNow, Logger, LoggerHandle};
use std::sync::OnceLock;

// Keep the handle alive for the lifetime of the process; dropping it would
// shut the logger down.
static LOGGER_HANDLE: OnceLock<LoggerHandle> = OnceLock::new();

/// Initialize logging at `level` ("debug", "info", ...). A `RUST_LOG`-style
/// filter in the environment takes precedence. Called once at startup.
pub fn init_logging(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let handle = Logger::try_with_env_or_str(level)?
        .format(simple_format)
        .start()?;
    let _ = LOGGER_HANDLE.set(handle);
    Ok(())
}

fn simple_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{}[{}][{}] {}",
        now.format("%H:%M:%S"),
        record.target(),
        record.level(),
        record.args()
    )
}
