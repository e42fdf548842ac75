//! Client implementation for the `OpenFGA` backend plugin.

use async_trait::async_trait;
use futures::future::try_join_all;
use http::Method;
use hybrid_authz_sdk::{BackendUnavailable, Identity, Relation, RelationshipBackendClient, ResourceRef};

use super::service::OpenFgaClient;
use super::wire::{
    BatchCheckItem, BatchCheckRequest, BatchCheckResponse, CheckRequest, CheckResponse, Empty,
    TupleKey, TupleKeys, WriteRequest,
};

impl OpenFgaClient {
    async fn write_tuples(&self, request: WriteRequest<'_>) -> Result<(), BackendUnavailable> {
        let path = self.store_path("write")?;
        let _: Empty = self.call(Method::POST, &path, Some(&request)).await?;
        Ok(())
    }

    /// One batch-check request. Correlation ids are global indexes starting
    /// at `offset`, so answers land back in request order.
    async fn batch_chunk(
        &self,
        identity: &Identity,
        relation: Relation,
        chunk: &[ResourceRef],
        offset: usize,
    ) -> Result<Vec<bool>, BackendUnavailable> {
        let path = self.store_path("batch-check")?;
        let request = BatchCheckRequest {
            checks: chunk
                .iter()
                .enumerate()
                .map(|(i, resource)| BatchCheckItem {
                    tuple_key: TupleKey::new(identity, relation, resource),
                    correlation_id: (offset + i).to_string(),
                })
                .collect(),
            authorization_model_id: self.authorization_model_id(),
        };
        let response: BatchCheckResponse = self.call(Method::POST, &path, Some(&request)).await?;

        let mut answers: Vec<Option<bool>> = vec![None; chunk.len()];
        for (correlation_id, item) in response.result {
            let slot = correlation_id
                .parse::<usize>()
                .ok()
                .and_then(|idx| idx.checked_sub(offset))
                .filter(|idx| *idx < chunk.len())
                .ok_or_else(|| {
                    BackendUnavailable::new(format!(
                        "batch-check: unexpected correlation id '{correlation_id}'"
                    ))
                })?;
            if let Some(error) = item.error {
                return Err(BackendUnavailable::new(format!(
                    "batch-check: item {correlation_id} failed: {error}"
                )));
            }
            let Some(allowed) = item.allowed else {
                return Err(BackendUnavailable::new(format!(
                    "batch-check: item {correlation_id} has neither allowed nor error"
                )));
            };
            answers[slot] = Some(allowed);
        }

        answers
            .into_iter()
            .enumerate()
            .map(|(i, answer)| {
                answer.ok_or_else(|| {
                    BackendUnavailable::new(format!("batch-check: no answer for item {}", offset + i))
                })
            })
            .collect()
    }
}

#[async_trait]
impl RelationshipBackendClient for OpenFgaClient {
    #[tracing::instrument(skip_all, fields(identity = %identity, relation = %relation, resource = %resource))]
    async fn check(
        &self,
        identity: &Identity,
        relation: Relation,
        resource: &ResourceRef,
    ) -> Result<bool, BackendUnavailable> {
        let path = self.store_path("check")?;
        let request = CheckRequest {
            tuple_key: TupleKey::new(identity, relation, resource),
            authorization_model_id: self.authorization_model_id(),
        };
        let response: CheckResponse = self.call(Method::POST, &path, Some(&request)).await?;
        tracing::debug!(allowed = response.allowed, "check answered");
        Ok(response.allowed)
    }

    #[tracing::instrument(skip_all, fields(identity = %identity, relation = %relation, resource = %resource))]
    async fn write(
        &self,
        identity: &Identity,
        relation: Relation,
        resource: &ResourceRef,
    ) -> Result<(), BackendUnavailable> {
        self.write_tuples(WriteRequest {
            writes: Some(TupleKeys {
                tuple_keys: vec![TupleKey::new(identity, relation, resource)],
            }),
            deletes: None,
            authorization_model_id: self.authorization_model_id(),
        })
        .await
    }

    #[tracing::instrument(skip_all, fields(identity = %identity, relation = %relation, resource = %resource))]
    async fn delete(
        &self,
        identity: &Identity,
        relation: Relation,
        resource: &ResourceRef,
    ) -> Result<(), BackendUnavailable> {
        self.write_tuples(WriteRequest {
            writes: None,
            deletes: Some(TupleKeys {
                tuple_keys: vec![TupleKey::new(identity, relation, resource)],
            }),
            authorization_model_id: self.authorization_model_id(),
        })
        .await
    }

    #[tracing::instrument(skip_all, fields(identity = %identity, relation = %relation, count = resources.len()))]
    async fn batch_check(
        &self,
        identity: &Identity,
        relation: Relation,
        resources: &[ResourceRef],
    ) -> Result<Vec<bool>, BackendUnavailable> {
        if resources.is_empty() {
            return Ok(Vec::new());
        }

        let size = self.max_batch_size;
        let chunks = resources
            .chunks(size)
            .enumerate()
            .map(|(n, chunk)| self.batch_chunk(identity, relation, chunk, n * size));
        let answers = try_join_all(chunks).await?;

        Ok(answers.into_iter().flatten().collect())
    }
}
