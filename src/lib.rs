pub mod app;
pub mod core;
pub mod engine;
pub mod report;
pub mod store;
pub mod web;

include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// Plugin name used for log context and stored records
pub const PLUGIN_NAME: &str = "ikarus";
/// Plugin category within the malice taxonomy
pub const PLUGIN_CATEGORY: &str = "av";
