//! Webhook delivery of scan reports

use crate::engine::ScanReport;

/// Environment variable naming the webhook endpoint.
pub const ENDPOINT_VAR: &str = "MALICE_ENDPOINT";
/// Environment variable naming the proxy for webhook delivery.
pub const PROXY_VAR: &str = "MALICE_PROXY";

#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    #[error("{0} is not set")]
    MissingVar(&'static str),

    #[error("invalid proxy url: {0}")]
    Proxy(String),

    #[error("callback POST failed: {0}")]
    Http(String),
}

/// POST the final JSON report to the operator webhook, tagged with the scan
/// ID. The response body is printed to stdout so orchestration callers can
/// see the webhook's acknowledgement.
pub async fn post_callback(
    report: &ScanReport,
    scan_id: &str,
    use_proxy: bool,
) -> Result<(), CallbackError> {
    let endpoint = required_var(ENDPOINT_VAR)?;

    let mut builder = reqwest::Client::builder();
    if use_proxy {
        let proxy_url = required_var(PROXY_VAR)?;
        let proxy =
            reqwest::Proxy::all(&proxy_url).map_err(|e| CallbackError::Proxy(e.to_string()))?;
        builder = builder.proxy(proxy);
    }
    let client = builder
        .build()
        .map_err(|e| CallbackError::Http(e.to_string()))?;

    let response = client
        .post(&endpoint)
        .header("X-Malice-ID", scan_id)
        .json(report)
        .send()
        .await
        .map_err(|e| CallbackError::Http(e.to_string()))?;

    let body = response
        .text()
        .await
        .map_err(|e| CallbackError::Http(e.to_string()))?;
    println!("{}", body);
    Ok(())
}

fn required_var(var: &'static str) -> Result<String, CallbackError> {
    std::env::var(var)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(CallbackError::MissingVar(var))
}
