//! Result persistence and delivery

pub mod callback;
pub mod elastic;

pub use elastic::{ElasticStore, PluginResultRecord, StoreError};
