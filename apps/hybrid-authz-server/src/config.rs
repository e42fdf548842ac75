//! Server configuration: YAML file overlaid with `HYBRID_AUTHZ__*` variables.

use std::fmt;
use std::path::Path;

use anyhow::{Context, bail};
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use hybrid_authz::HybridAuthzConfig;
use openfga_backend_plugin::OpenFgaConfig;
use serde::Deserialize;
use static_rebac_plugin::StaticRebacConfig;

/// Prefix of environment overrides. Nested keys are separated by `__`, for
/// example `HYBRID_AUTHZ__OPENFGA__STORE_ID`.
pub const ENV_PREFIX: &str = "HYBRID_AUTHZ__";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub backend: BackendKind,
    pub hybrid_authz: HybridAuthzConfig,
    pub openfga: OpenFgaConfig,
    pub static_rebac: StaticRebacConfig,
}

impl AppConfig {
    /// Load configuration from an optional YAML file plus the environment.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing or malformed, or if the merged
    /// configuration does not deserialize.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            if !path.is_file() {
                bail!("config file {} not found", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }

    /// Cross-field checks that serde cannot express.
    ///
    /// # Errors
    ///
    /// Describes the first inconsistency found.
    pub fn validate(&self) -> anyhow::Result<()> {
        let cors = &self.server.cors;
        if cors.enabled && cors.allow_credentials && cors.allowed_origins.iter().any(|o| o == "*") {
            bail!("server.cors: credentials cannot be combined with a wildcard origin");
        }
        if self.backend == BackendKind::Openfga && self.openfga.store_id.is_none() {
            bail!("openfga.store_id is required when backend is 'openfga' (see the setup-fga command)");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Identity assumed when a request carries no `x-user-email` header.
    pub default_identity: String,
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8087".to_owned(),
            default_identity: "alice@example.com".to_owned(),
            cors: CorsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    pub enabled: bool,
    /// Allowed origins: `["*"]` means any
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_origins: vec!["*".to_owned()],
            allow_credentials: false,
            max_age_seconds: 600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Which relationship backend answers `ReBAC` checks.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// In-process tuple store. Nothing survives a restart.
    #[default]
    Static,
    Openfga,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Static => "static",
            Self::Openfga => "openfga",
        })
    }
}
