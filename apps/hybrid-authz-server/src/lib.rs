#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Hybrid `AuthZ` server
//!
//! Binary crate wiring the hybrid authorizer to a relationship backend and
//! exposing resource management over HTTP.

pub mod api;
pub mod cli;
pub mod config;
pub mod logging;
pub mod server;
pub mod state;

pub use config::AppConfig;
pub use state::AppState;
