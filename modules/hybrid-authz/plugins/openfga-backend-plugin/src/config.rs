//! Configuration for the `OpenFGA` backend plugin.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

/// Plugin configuration.
///
/// `Debug` never prints the API token.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpenFgaConfig {
    /// Base URL of the `OpenFGA` HTTP API. Plain `http` only.
    pub api_url: String,

    /// Store holding the relationship tuples. Required for every tuple
    /// operation; only store creation works without it.
    pub store_id: Option<String>,

    /// Model to evaluate against. The server's latest model when unset.
    pub authorization_model_id: Option<String>,

    /// Pre-shared key sent as a bearer token.
    #[serde(deserialize_with = "deserialize_secret")]
    pub api_token: Option<SecretString>,

    /// Per-call deadline in milliseconds.
    pub request_timeout_ms: u64,

    /// Largest number of checks sent in one batch-check request.
    pub max_batch_size: usize,
}

impl Default for OpenFgaConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_owned(),
            store_id: None,
            authorization_model_id: None,
            api_token: None,
            request_timeout_ms: 5000,
            max_batch_size: 50,
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|token| !token.is_empty())
        .map(SecretString::from))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn defaults() {
        let cfg = OpenFgaConfig::default();
        assert_eq!(cfg.api_url, "http://localhost:8080");
        assert_eq!(cfg.request_timeout_ms, 5000);
        assert_eq!(cfg.max_batch_size, 50);
        assert!(cfg.store_id.is_none());
    }

    #[test]
    fn token_is_read_but_never_printed() {
        let cfg: OpenFgaConfig = serde_json::from_value(serde_json::json!({
            "store_id": "01STORE",
            "api_token": "s3cr3t-token"
        }))
        .unwrap();

        assert_eq!(
            cfg.api_token.as_ref().map(|t| t.expose_secret()),
            Some("s3cr3t-token")
        );
        assert!(!format!("{cfg:?}").contains("s3cr3t-token"));
    }

    #[test]
    fn empty_token_means_none() {
        let cfg: OpenFgaConfig =
            serde_json::from_value(serde_json::json!({ "api_token": "" })).unwrap();
        assert!(cfg.api_token.is_none());
    }

    #[test]
    fn rejects_unknown_fields() {
        let res = serde_json::from_value::<OpenFgaConfig>(serde_json::json!({ "apiUrl": "x" }));
        assert!(res.is_err());
    }
}
