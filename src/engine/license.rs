//! License key inspection

use chrono::{Local, NaiveDate};
use std::path::Path;

use super::error::{EngineError, EngineResult};

/// Whether the license key at `path` has passed its end date.
///
/// The key file is line-oriented; the first line containing `enddate`
/// carries the expiry as `YYYY-MM-DD`. A missing file is an error. A file
/// without an `enddate` line logs an error and reports not-expired;
/// expiry enforcement then rests with the scanner itself.
pub fn is_expired(path: &Path) -> EngineResult<bool> {
    if !path.exists() {
        return Err(EngineError::LicenseMissing {
            path: path.display().to_string(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|e| EngineError::Io {
        path: path.display().to_string(),
        cause: e.to_string(),
    })?;

    for line in content.lines() {
        if line.is_empty() || !line.contains("enddate") {
            continue;
        }
        let value = line.trim().trim_start_matches("enddate").trim();
        let end = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
            EngineError::LicenseDate {
                value: value.to_string(),
                cause: e.to_string(),
            }
        })?;
        let expired = end < Local::now().date_naive();
        log::debug!("license expires {} (expired: {})", end, expired);
        return Ok(expired);
    }

    log::error!("could not find expiration date in license file");
    Ok(false)
}
