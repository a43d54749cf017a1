//! Scanner output parsing and validation
//!
//! The t3scan output is semi-structured free text with no machine-readable
//! mode. Parsing is deliberately strict and fails closed: the engine version
//! and VDB identifier must sit at their fixed line positions, and the count
//! of signature lines must agree with the "1 file infected" summary (exactly
//! one when infected, zero when clean). Any deviation yields an
//! error-carrying result instead of a best-effort verdict, because a
//! silently wrong "not infected" answer is the worst failure mode for a
//! scanner wrapper.

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::EngineError;
use super::types::ScanResult;

static RE_ENGINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s+Engine version:\s+([0-9.]+)\s*$").unwrap());
static RE_VDB: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+VDB:\s+(.*)$").unwrap());
static RE_SIGNATURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Signature \d+\s+'([^']*)'\s+found").unwrap());
static RE_INFECTED: Lazy<Regex> = Lazy::new(|| Regex::new(r"1 file infected").unwrap());

/// Error reported when the output fails structural validation.
const PARSE_ERROR: &str = "unable to parse output";

/// Convert raw scanner output into a [`ScanResult`].
///
/// A non-detection `invocation_error` short-circuits to an error result
/// carrying the error's message; no text parsing is attempted. `updated` is
/// the externally supplied definitions date (UPDATED file or build date).
pub fn parse(raw: &str, invocation_error: Option<&EngineError>, updated: &str) -> ScanResult {
    if let Some(err) = invocation_error {
        if !err.is_detection() {
            return ScanResult::from_error(err.to_string());
        }
    }

    let lines: Vec<&str> = raw.split('\n').collect();

    // Version metadata sits at fixed positions below the banner line.
    let engine = lines
        .get(1)
        .and_then(|line| RE_ENGINE.captures(line))
        .map(|caps| caps[1].to_string());
    let database = lines
        .get(2)
        .and_then(|line| RE_VDB.captures(line))
        .map(|caps| caps[1].to_string());

    let mut virus_found = false;
    let mut signatures = 0usize;
    let mut signature = String::new();
    for line in &lines {
        if !line.is_empty() {
            if let Some(caps) = RE_SIGNATURE.captures(line) {
                signature = caps[1].trim().to_string();
                signatures += 1;
            }
        }
        if RE_INFECTED.is_match(line) {
            virus_found = true;
        }
    }

    let counts_consistent =
        (signatures == 0 && !virus_found) || (signatures == 1 && virus_found);

    match (engine, database) {
        (Some(engine), Some(database)) if counts_consistent => ScanResult {
            infected: virus_found,
            result: signature,
            engine,
            database,
            updated: updated.to_string(),
            markdown: None,
            error: None,
        },
        _ => {
            log::error!("failed to extract scan results from scanner output");
            log::error!("output was:\n{}", raw);
            ScanResult::from_error(PARSE_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "IKARUS - T3SCAN v1\n  Engine version: 1.2.3\n  VDB: 2023-01-01\n";
    const UPDATED: &str = "20230101";

    fn infected_output() -> String {
        format!("{}Signature 1 'Trojan.Generic' found\n1 file infected\n", HEADER)
    }

    #[test]
    fn clean_output_yields_not_infected() {
        let result = parse(HEADER, None, UPDATED);

        assert!(!result.infected);
        assert_eq!(result.result, "");
        assert_eq!(result.engine, "1.2.3");
        assert_eq!(result.database, "2023-01-01");
        assert_eq!(result.updated, UPDATED);
        assert!(result.error.is_none());
    }

    #[test]
    fn single_signature_with_summary_yields_infected() {
        let result = parse(&infected_output(), None, UPDATED);

        assert!(result.infected);
        assert_eq!(result.result, "Trojan.Generic");
        assert_eq!(result.engine, "1.2.3");
        assert_eq!(result.database, "2023-01-01");
        assert!(result.error.is_none());
    }

    #[test]
    fn signature_label_is_trimmed() {
        let raw = format!("{}Signature 12 '  Worm.Mydoom '  found\n1 file infected\n", HEADER);
        let result = parse(&raw, None, UPDATED);

        assert!(result.infected);
        assert_eq!(result.result, "Worm.Mydoom");
    }

    #[test]
    fn two_signatures_fail_closed() {
        let raw = format!(
            "{}Signature 1 'Trojan.A' found\nSignature 2 'Trojan.B' found\n1 file infected\n",
            HEADER
        );
        let result = parse(&raw, None, UPDATED);

        assert_eq!(result.error.as_deref(), Some("unable to parse output"));
        assert!(!result.infected);
        assert!(result.result.is_empty());
        assert!(result.engine.is_empty());
        assert!(result.database.is_empty());
    }

    #[test]
    fn signature_without_infected_summary_fails_closed() {
        let raw = format!("{}Signature 1 'Trojan.A' found\n", HEADER);
        let result = parse(&raw, None, UPDATED);

        assert_eq!(result.error.as_deref(), Some("unable to parse output"));
    }

    #[test]
    fn infected_summary_without_signature_fails_closed() {
        let raw = format!("{}1 file infected\n", HEADER);
        let result = parse(&raw, None, UPDATED);

        assert_eq!(result.error.as_deref(), Some("unable to parse output"));
    }

    #[test]
    fn missing_engine_version_line_fails_closed() {
        let raw = "IKARUS - T3SCAN v1\n  VDB: 2023-01-01\n";
        let result = parse(raw, None, UPDATED);

        assert_eq!(result.error.as_deref(), Some("unable to parse output"));
    }

    #[test]
    fn missing_vdb_line_fails_closed() {
        let raw = "IKARUS - T3SCAN v1\n  Engine version: 1.2.3\n";
        let result = parse(raw, None, UPDATED);

        assert_eq!(result.error.as_deref(), Some("unable to parse output"));
    }

    #[test]
    fn empty_output_fails_closed() {
        let result = parse("", None, UPDATED);

        assert_eq!(result.error.as_deref(), Some("unable to parse output"));
    }

    #[test]
    fn detection_exit_status_is_parsed_normally() {
        let err = EngineError::ExitStatus { code: 1 };
        let result = parse(&infected_output(), Some(&err), UPDATED);

        assert!(result.infected);
        assert_eq!(result.result, "Trojan.Generic");
        assert!(result.error.is_none());
    }

    #[test]
    fn other_exit_status_short_circuits_without_parsing() {
        let err = EngineError::ExitStatus { code: 2 };
        let result = parse(&infected_output(), Some(&err), UPDATED);

        assert_eq!(result.error.as_deref(), Some("exit status 2"));
        assert!(!result.infected);
        assert!(result.engine.is_empty());
    }

    #[test]
    fn timeout_error_short_circuits() {
        let err = EngineError::Timeout { seconds: 120 };
        let result = parse(&infected_output(), Some(&err), UPDATED);

        assert_eq!(result.error.as_deref(), Some("scan timed out after 120s"));
    }
}
