#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `OpenFGA` Backend Plugin
//!
//! Production [`hybrid_authz_sdk::RelationshipBackendClient`] talking to an
//! `OpenFGA`-compatible server over HTTP/JSON.
//!
//! - `check` maps to `POST /stores/{store}/check`
//! - `write` and `delete` map to `POST /stores/{store}/write`
//! - `batch_check` maps to `POST /stores/{store}/batch-check`, chunked to the
//!   server's batch limit and reassembled in request order
//!
//! Every call runs under a per-call deadline. Transport errors, non-success
//! statuses, malformed bodies and exceeded deadlines all surface as
//! [`hybrid_authz_sdk::BackendUnavailable`].
//!
//! Bootstrap helpers create a store, write the reference authorization model
//! and read back the latest model id.
//!
//! ## Configuration
//!
//! ```yaml
//! openfga:
//!   api_url: "http://localhost:8080"
//!   store_id: "01HXYZ..."
//!   authorization_model_id: "01HXYZ..."
//!   request_timeout_ms: 5000
//! ```

pub mod config;
pub mod domain;

pub use config::OpenFgaConfig;
pub use domain::{OpenFgaClient, reference_model};
