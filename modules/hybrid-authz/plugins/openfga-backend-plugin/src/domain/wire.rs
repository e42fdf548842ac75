//! Request and response bodies of the `OpenFGA` HTTP API.
//!
//! Only the fields this client sends or reads are modelled; unknown response
//! fields are ignored.

use std::collections::HashMap;

use hybrid_authz_sdk::{Identity, PermissionTuple, Relation, ResourceRef};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TupleKey {
    pub user: String,
    pub relation: &'static str,
    pub object: String,
}

impl TupleKey {
    #[must_use]
    pub fn new(identity: &Identity, relation: Relation, resource: &ResourceRef) -> Self {
        let tuple = PermissionTuple::new(identity.clone(), relation, resource.clone());
        Self {
            user: tuple.user_key(),
            relation: relation.as_str(),
            object: tuple.object_key(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckRequest<'a> {
    pub tuple_key: TupleKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_model_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct CheckResponse {
    pub allowed: bool,
}

#[derive(Debug, Serialize)]
pub struct TupleKeys {
    pub tuple_keys: Vec<TupleKey>,
}

#[derive(Debug, Serialize)]
pub struct WriteRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writes: Option<TupleKeys>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletes: Option<TupleKeys>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_model_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct BatchCheckItem {
    pub tuple_key: TupleKey,
    pub correlation_id: String,
}

#[derive(Debug, Serialize)]
pub struct BatchCheckRequest<'a> {
    pub checks: Vec<BatchCheckItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_model_id: Option<&'a str>,
}

/// Results keyed by correlation id, in no particular order.
#[derive(Debug, Deserialize)]
pub struct BatchCheckResponse {
    #[serde(default)]
    pub result: HashMap<String, BatchCheckSingleResult>,
}

/// Either `allowed` or `error` is set.
#[derive(Debug, Deserialize)]
pub struct BatchCheckSingleResult {
    pub allowed: Option<bool>,
    pub error: Option<serde_json::Value>,
}

/// Empty acknowledgement body returned by write endpoints.
#[derive(Debug, Deserialize)]
pub struct Empty {}

#[derive(Debug, Serialize)]
pub struct CreateStoreRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct CreateStoreResponse {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct WriteAuthorizationModelResponse {
    pub authorization_model_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthorizationModel {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct ReadAuthorizationModelsResponse {
    #[serde(default)]
    pub authorization_models: Vec<AuthorizationModel>,
}

/// Schema 1.1 model: `owner` and `editor` are direct, `viewer` is direct or
/// computed from `editor` and `owner`.
#[must_use]
pub fn reference_model() -> serde_json::Value {
    let direct_user = serde_json::json!({ "directly_related_user_types": [{ "type": "user" }] });
    serde_json::json!({
        "schema_version": "1.1",
        "type_definitions": [
            { "type": "user", "relations": {} },
            {
                "type": "resource",
                "relations": {
                    "owner": { "this": {} },
                    "editor": { "this": {} },
                    "viewer": {
                        "union": {
                            "child": [
                                { "this": {} },
                                { "computedUserset": { "relation": "editor" } },
                                { "computedUserset": { "relation": "owner" } }
                            ]
                        }
                    }
                },
                "metadata": {
                    "relations": {
                        "owner": direct_user,
                        "editor": direct_user,
                        "viewer": direct_user
                    }
                }
            }
        ]
    })
}
