//! PEP (Policy Enforcement Point) helpers.
//!
//! - [`EnforcementGate`] - wraps a protected operation: validate → decide → run or reject
//! - [`EnforcerError`] - gate rejections, convertible into [`crate::AuthzError`]

pub mod enforcer;

pub use enforcer::{EnforcementGate, EnforcerError};
