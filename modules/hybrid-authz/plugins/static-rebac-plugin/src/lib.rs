#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static `ReBAC` Plugin
//!
//! In-process relationship backend for development and testing. Tuples live
//! in memory and are evaluated with the reference authorization model:
//!
//! - `owner` and `editor` are direct relations only
//! - `viewer` is held directly, or through `editor` or `owner`
//!
//! ## Configuration
//!
//! ```yaml
//! static_rebac:
//!   tuples:
//!     - identity: bob@example.com
//!       relation: viewer
//!       resource: 7d0b1f9e-3c1e-4f4e-9a53-0f4c1a2b3c4d
//! ```

pub mod config;
pub mod domain;

pub use config::StaticRebacConfig;
pub use domain::Service;
