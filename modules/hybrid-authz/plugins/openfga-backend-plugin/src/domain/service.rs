//! HTTP transport and store bootstrap for the `OpenFGA` backend.

use std::time::Duration;

use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request, StatusCode};
use http_body_util::{BodyExt, Full};
use hybrid_authz_sdk::BackendUnavailable;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::wire::{
    CreateStoreRequest, CreateStoreResponse, ReadAuthorizationModelsResponse,
    WriteAuthorizationModelResponse, reference_model,
};
use crate::config::OpenFgaConfig;

/// Longest slice of an error body kept in fault messages.
const ERROR_BODY_LIMIT: usize = 256;

/// `OpenFGA` HTTP client.
///
/// Stateless apart from the pooled connections; cheap to share behind an
/// `Arc`.
pub struct OpenFgaClient {
    http: Client<HttpConnector, Full<Bytes>>,
    api_url: String,
    store_id: Option<String>,
    model_id: Option<String>,
    token: Option<SecretString>,
    timeout: Duration,
    pub(super) max_batch_size: usize,
}

impl OpenFgaClient {
    /// Build a client from configuration. No network traffic happens here.
    #[must_use]
    pub fn new(cfg: OpenFgaConfig) -> Self {
        let http = Client::builder(TokioExecutor::new()).build_http();
        Self {
            http,
            api_url: cfg.api_url.trim_end_matches('/').to_owned(),
            store_id: cfg.store_id.filter(|s| !s.is_empty()),
            model_id: cfg.authorization_model_id.filter(|s| !s.is_empty()),
            token: cfg.api_token,
            timeout: Duration::from_millis(cfg.request_timeout_ms),
            max_batch_size: cfg.max_batch_size.max(1),
        }
    }

    #[must_use]
    pub fn store_id(&self) -> Option<&str> {
        self.store_id.as_deref()
    }

    #[must_use]
    pub fn authorization_model_id(&self) -> Option<&str> {
        self.model_id.as_deref()
    }

    /// Same client, pointed at another store and model.
    #[must_use]
    pub fn with_store(mut self, store_id: String, model_id: Option<String>) -> Self {
        self.store_id = Some(store_id);
        self.model_id = model_id;
        self
    }

    /// Create a store and return its id.
    ///
    /// # Errors
    ///
    /// [`BackendUnavailable`] on any transport or protocol failure.
    #[tracing::instrument(skip(self))]
    pub async fn create_store(&self, name: &str) -> Result<String, BackendUnavailable> {
        let resp: CreateStoreResponse = self
            .call(Method::POST, "/stores", Some(&CreateStoreRequest { name }))
            .await?;
        tracing::info!(store_id = %resp.id, "store created");
        Ok(resp.id)
    }

    /// Write the reference authorization model to the configured store and
    /// return the new model id.
    ///
    /// # Errors
    ///
    /// [`BackendUnavailable`] on any transport or protocol failure, or if no
    /// store is configured.
    #[tracing::instrument(skip(self))]
    pub async fn write_authorization_model(&self) -> Result<String, BackendUnavailable> {
        let path = self.store_path("authorization-models")?;
        let resp: WriteAuthorizationModelResponse = self
            .call(Method::POST, &path, Some(&reference_model()))
            .await?;
        tracing::info!(model_id = %resp.authorization_model_id, "authorization model written");
        Ok(resp.authorization_model_id)
    }

    /// Id of the newest authorization model in the configured store, if any.
    ///
    /// Cheap enough to double as a readiness check.
    ///
    /// # Errors
    ///
    /// [`BackendUnavailable`] on any transport or protocol failure, or if no
    /// store is configured.
    #[tracing::instrument(skip(self))]
    pub async fn read_latest_authorization_model(
        &self,
    ) -> Result<Option<String>, BackendUnavailable> {
        let path = self.store_path("authorization-models?page_size=1")?;
        let resp: ReadAuthorizationModelsResponse =
            self.call::<(), _>(Method::GET, &path, None).await?;
        Ok(resp.authorization_models.into_iter().next().map(|m| m.id))
    }

    pub(super) fn store_path(&self, endpoint: &str) -> Result<String, BackendUnavailable> {
        let store = self
            .store_id
            .as_deref()
            .ok_or_else(|| BackendUnavailable::new("no OpenFGA store configured"))?;
        Ok(format!("/stores/{store}/{endpoint}"))
    }

    /// One request/response exchange under the per-call deadline.
    pub(super) async fn call<B, R>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<R, BackendUnavailable>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.build_request(method, path, body)?;
        let (status, bytes) = tokio::time::timeout(self.timeout, self.exchange(request))
            .await
            .map_err(|_| {
                BackendUnavailable::new(format!(
                    "{path}: no response within {}ms",
                    self.timeout.as_millis()
                ))
            })??;

        if !status.is_success() {
            return Err(BackendUnavailable::new(format!(
                "{path}: HTTP {status}: {}",
                truncate(&String::from_utf8_lossy(&bytes))
            )));
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| BackendUnavailable::new(format!("{path}: malformed response: {e}")))
    }

    fn build_request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Request<Full<Bytes>>, BackendUnavailable>
    where
        B: Serialize + ?Sized,
    {
        let payload = match body {
            Some(body) => serde_json::to_vec(body)
                .map_err(|e| BackendUnavailable::new(format!("encode request: {e}")))?,
            None => Vec::new(),
        };

        let mut builder = Request::builder()
            .method(method)
            .uri(format!("{}{path}", self.api_url))
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = &self.token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()));
        }

        builder
            .body(Full::new(Bytes::from(payload)))
            .map_err(|e| BackendUnavailable::new(format!("build request: {e}")))
    }

    async fn exchange(
        &self,
        request: Request<Full<Bytes>>,
    ) -> Result<(StatusCode, Bytes), BackendUnavailable> {
        let response = self
            .http
            .request(request)
            .await
            .map_err(|e| BackendUnavailable::new(format!("request failed: {e}")))?;
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| BackendUnavailable::new(format!("read body: {e}")))?
            .to_bytes();
        Ok((status, bytes))
    }
}

impl std::fmt::Debug for OpenFgaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenFgaClient")
            .field("api_url", &self.api_url)
            .field("store_id", &self.store_id)
            .field("model_id", &self.model_id)
            .field("token", &self.token)
            .field("timeout", &self.timeout)
            .field("max_batch_size", &self.max_batch_size)
            .finish_non_exhaustive()
    }
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(ERROR_BODY_LIMIT) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
