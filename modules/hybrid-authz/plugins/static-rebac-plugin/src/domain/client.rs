//! Client implementation for the static `ReBAC` plugin.

use async_trait::async_trait;
use hybrid_authz_sdk::{
    BackendUnavailable, Identity, PermissionTuple, Relation, RelationshipBackendClient,
    ResourceRef,
};

use super::service::Service;

#[async_trait]
impl RelationshipBackendClient for Service {
    async fn check(
        &self,
        identity: &Identity,
        relation: Relation,
        resource: &ResourceRef,
    ) -> Result<bool, BackendUnavailable> {
        Ok(Self::check(self, identity, relation, resource))
    }

    async fn write(
        &self,
        identity: &Identity,
        relation: Relation,
        resource: &ResourceRef,
    ) -> Result<(), BackendUnavailable> {
        let tuple = PermissionTuple::new(identity.clone(), relation, resource.clone());
        if !Self::write(self, tuple) {
            tracing::debug!(%identity, %relation, %resource, "tuple already present");
        }
        Ok(())
    }

    async fn delete(
        &self,
        identity: &Identity,
        relation: Relation,
        resource: &ResourceRef,
    ) -> Result<(), BackendUnavailable> {
        let tuple = PermissionTuple::new(identity.clone(), relation, resource.clone());
        if !Self::delete(self, &tuple) {
            tracing::debug!(%identity, %relation, %resource, "tuple already absent");
        }
        Ok(())
    }

    async fn batch_check(
        &self,
        identity: &Identity,
        relation: Relation,
        resources: &[ResourceRef],
    ) -> Result<Vec<bool>, BackendUnavailable> {
        Ok(resources
            .iter()
            .map(|resource| Self::check(self, identity, relation, resource))
            .collect())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn plugin_trait_round_trips_tuples() {
        let service = Service::new();
        let plugin: &dyn RelationshipBackendClient = &service;
        let alice = Identity::new("alice@example.com").unwrap();
        let r1 = ResourceRef::new("r1").unwrap();

        plugin.write(&alice, Relation::Owner, &r1).await.unwrap();
        assert!(plugin.check(&alice, Relation::Viewer, &r1).await.unwrap());

        plugin.delete(&alice, Relation::Owner, &r1).await.unwrap();
        assert!(!plugin.check(&alice, Relation::Viewer, &r1).await.unwrap());
    }

    #[tokio::test]
    async fn batch_check_answers_in_request_order() {
        let service = Service::new();
        let alice = Identity::new("alice").unwrap();
        let refs: Vec<ResourceRef> = ["r1", "r2", "r3"]
            .into_iter()
            .map(|r| ResourceRef::new(r).unwrap())
            .collect();
        assert!(service.write(PermissionTuple::new(alice.clone(), Relation::Owner, refs[0].clone())));
        assert!(service.write(PermissionTuple::new(alice.clone(), Relation::Owner, refs[2].clone())));

        let plugin: &dyn RelationshipBackendClient = &service;
        let out = plugin
            .batch_check(&alice, Relation::Viewer, &refs)
            .await
            .unwrap();

        assert_eq!(out, vec![true, false, true]);
    }
}
