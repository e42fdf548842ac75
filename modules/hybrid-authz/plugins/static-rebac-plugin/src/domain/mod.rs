//! Domain layer for the static `ReBAC` plugin.

mod client;
pub mod service;

pub use service::Service;
