//! Core services and infrastructure

pub mod env;
pub mod hash;
pub mod logging;
