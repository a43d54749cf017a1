//! Environment variable helpers

/// Return the value of `var` when set and non-empty, otherwise `default`.
pub fn getopt(var: &str, default: &str) -> String {
    match std::env::var(var) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}
