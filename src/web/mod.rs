//! HTTP upload-and-scan service

pub mod service;

pub use service::serve;
