//! Scan result data model

use serde::{Deserialize, Serialize};

/// Structured verdict for one scanned file.
///
/// Exactly one of two shapes holds: a populated result (version metadata,
/// verdict, optional signature name) or an error-carrying result with all
/// informational fields empty. The parser never emits a mix of the two.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub infected: bool,
    /// Detected signature name, empty when the file is clean
    pub result: String,
    /// Scanner engine version
    pub engine: String,
    /// Detection database (VDB) identifier
    pub database: String,
    /// Last definitions update, YYYYMMDD
    pub updated: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScanResult {
    /// A result carrying only an error; informational fields stay empty.
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Envelope matching the plugin's JSON shape on stdout, webhooks and the
/// web service: `{"ikarus": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    #[serde(rename = "ikarus")]
    pub results: ScanResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_serializes_under_plugin_key() {
        let report = ScanReport {
            results: ScanResult {
                infected: true,
                result: "Trojan.Generic".to_string(),
                engine: "1.2.3".to_string(),
                database: "2023-01-01".to_string(),
                updated: "20230101".to_string(),
                markdown: None,
                error: None,
            },
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["ikarus"]["infected"], true);
        assert_eq!(value["ikarus"]["result"], "Trojan.Generic");
        // Optional fields are omitted entirely when unset
        assert!(value["ikarus"].get("markdown").is_none());
        assert!(value["ikarus"].get("error").is_none());
    }

    #[test]
    fn error_result_keeps_informational_fields_empty() {
        let result = ScanResult::from_error("exit status 2");

        assert!(!result.infected);
        assert!(result.result.is_empty());
        assert!(result.engine.is_empty());
        assert!(result.database.is_empty());
        assert_eq!(result.error.as_deref(), Some("exit status 2"));
    }
}
