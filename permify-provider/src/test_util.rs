//! In-memory Permify fake for unit and integration tests.
//!
//! Pages the tenant list with tokens `tok2`, `tok3`, ... naming the page they
//! lead to, records calls, and injects failures and delays per bundle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use permify_client::proto::{
    BundleReadResponse, BundleWriteRequest, DataBundle, EntityDefinition, SchemaDefinition,
    SchemaReadResponse, Tenant, TenantListResponse,
};
use permify_client::PermifyApi;
use tonic::Status;

use crate::models::{BundleModel, OperationModel};

/// Fixed creation time handed out by the fake: 2024-01-01T00:00:00Z.
pub const CREATED_AT_SECONDS: i64 = 1_704_067_200;

/// A small bundle named `name` with one argument and one operation.
pub fn bundle(name: &str) -> BundleModel {
    BundleModel {
        name: name.to_string(),
        arguments: vec!["userID".to_string()],
        operations: vec![OperationModel {
            relationships_write: vec![format!("{name}:{{{{.userID}}}}#owner@user:{{{{.userID}}}}")],
            ..Default::default()
        }],
    }
}

#[derive(Default)]
struct FakeState {
    tenants: Vec<Tenant>,
    list_tokens: Vec<String>,
    list_failures: HashMap<usize, Status>,
    tenant_delete_failure: Option<(Status, bool)>,

    schemas: HashMap<String, Vec<(String, String)>>,
    schema_read_failure: Option<Status>,
    next_version: u64,

    bundles: HashMap<(String, String), DataBundle>,
    bundle_write_failure: Option<Status>,
    bundle_read_failures: HashMap<String, Status>,
    bundle_delete_failures: HashMap<String, Status>,
    bundle_delays: HashMap<String, Duration>,
    bundle_write_calls: usize,
    bundle_read_calls: usize,
    bundle_delete_calls: usize,
    in_flight: usize,
    max_in_flight: usize,
}

/// Shared in-memory stand-in for the Permify API. Clones share state.
#[derive(Clone, Default)]
pub struct FakePermify {
    state: Arc<Mutex<FakeState>>,
}

impl FakePermify {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    // --- tenants -------------------------------------------------------------

    pub fn add_tenant(&self, id: &str, name: &str) {
        self.state().tenants.push(Tenant {
            id: id.to_string(),
            name: name.to_string(),
            created_at: Some(prost_types::Timestamp {
                seconds: CREATED_AT_SECONDS,
                nanos: 0,
            }),
        });
    }

    pub fn add_tenants(&self, ids: impl IntoIterator<Item = String>) {
        for id in ids {
            let name = format!("{id} name");
            self.add_tenant(&id, &name);
        }
    }

    pub fn has_tenant(&self, id: &str) -> bool {
        self.state().tenants.iter().any(|t| t.id == id)
    }

    /// Tokens passed to each list call, in call order.
    pub fn list_tokens(&self) -> Vec<String> {
        self.state().list_tokens.clone()
    }

    /// Make the `call`-th list call (1-based) fail.
    pub fn fail_list_at(&self, call: usize, status: Status) {
        self.state().list_failures.insert(call, status);
    }

    /// Make tenant deletes fail. With `apply` the tenant is removed anyway.
    pub fn fail_tenant_delete(&self, status: Status, apply: bool) {
        self.state().tenant_delete_failure = Some((status, apply));
    }

    // --- schemas -------------------------------------------------------------

    /// Versions written for `tenant_id`, oldest first, as (version, text).
    pub fn schema_versions(&self, tenant_id: &str) -> Vec<(String, String)> {
        self.state()
            .schemas
            .get(tenant_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn fail_schema_read(&self, status: Status) {
        self.state().schema_read_failure = Some(status);
    }

    // --- bundles -------------------------------------------------------------

    pub fn put_bundles(&self, tenant_id: &str, bundles: impl IntoIterator<Item = BundleModel>) {
        let mut state = self.state();
        for bundle in bundles {
            state.bundles.insert(
                (tenant_id.to_string(), bundle.name.clone()),
                DataBundle::from(&bundle),
            );
        }
    }

    pub fn stored_bundle(&self, tenant_id: &str, name: &str) -> Option<BundleModel> {
        self.state()
            .bundles
            .get(&(tenant_id.to_string(), name.to_string()))
            .cloned()
            .map(BundleModel::from)
    }

    pub fn fail_bundle_write(&self, status: Status) {
        self.state().bundle_write_failure = Some(status);
    }

    pub fn fail_bundle_read(&self, name: &str, status: Status) {
        self.state()
            .bundle_read_failures
            .insert(name.to_string(), status);
    }

    pub fn fail_bundle_delete(&self, name: &str, status: Status) {
        self.state()
            .bundle_delete_failures
            .insert(name.to_string(), status);
    }

    /// Delay reads and deletes of `name`.
    pub fn delay_bundle(&self, name: &str, delay: Duration) {
        self.state().bundle_delays.insert(name.to_string(), delay);
    }

    pub fn bundle_write_calls(&self) -> usize {
        self.state().bundle_write_calls
    }

    pub fn bundle_read_calls(&self) -> usize {
        self.state().bundle_read_calls
    }

    pub fn bundle_delete_calls(&self) -> usize {
        self.state().bundle_delete_calls
    }

    /// Highest number of bundle reads/deletes observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.state().max_in_flight
    }

    async fn enter_bundle_call(&self, name: &str) {
        let delay = {
            let mut state = self.state();
            state.in_flight += 1;
            state.max_in_flight = state.max_in_flight.max(state.in_flight);
            state.bundle_delays.get(name).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn leave_bundle_call(&self) {
        self.state().in_flight -= 1;
    }
}

#[async_trait]
impl PermifyApi for FakePermify {
    async fn list_tenants(
        &self,
        page_size: u32,
        continuous_token: String,
    ) -> Result<TenantListResponse, Status> {
        let mut state = self.state();
        state.list_tokens.push(continuous_token.clone());
        let call = state.list_tokens.len();
        if let Some(status) = state.list_failures.remove(&call) {
            return Err(status);
        }

        let page = match continuous_token.as_str() {
            "" => 1,
            token => token
                .strip_prefix("tok")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| Status::invalid_argument("invalid continuous token"))?,
        };
        let size = page_size.max(1) as usize;
        let start = (page - 1) * size;
        let tenants: Vec<Tenant> = state.tenants.iter().skip(start).take(size).cloned().collect();
        let continuous_token = if start + size < state.tenants.len() {
            format!("tok{}", page + 1)
        } else {
            String::new()
        };
        Ok(TenantListResponse {
            tenants,
            continuous_token,
        })
    }

    async fn create_tenant(&self, id: &str, name: &str) -> Result<Tenant, Status> {
        if self.has_tenant(id) {
            return Err(Status::already_exists(format!("tenant {id} already exists")));
        }
        self.add_tenant(id, name);
        Ok(Tenant {
            id: id.to_string(),
            name: name.to_string(),
            created_at: Some(prost_types::Timestamp {
                seconds: CREATED_AT_SECONDS,
                nanos: 0,
            }),
        })
    }

    async fn delete_tenant(&self, id: &str) -> Result<(), Status> {
        let mut state = self.state();
        match state.tenant_delete_failure.clone() {
            Some((status, apply)) => {
                if apply {
                    state.tenants.retain(|t| t.id != id);
                }
                Err(status)
            }
            None => {
                state.tenants.retain(|t| t.id != id);
                Ok(())
            }
        }
    }

    async fn write_schema(&self, tenant_id: &str, schema: &str) -> Result<String, Status> {
        let mut state = self.state();
        state.next_version += 1;
        let version = format!("v{}", state.next_version);
        state
            .schemas
            .entry(tenant_id.to_string())
            .or_default()
            .push((version.clone(), schema.to_string()));
        Ok(version)
    }

    async fn read_schema(
        &self,
        tenant_id: &str,
        schema_version: &str,
    ) -> Result<SchemaReadResponse, Status> {
        let state = self.state();
        if let Some(status) = state.schema_read_failure.clone() {
            return Err(status);
        }
        let versions = state
            .schemas
            .get(tenant_id)
            .ok_or_else(|| Status::not_found("schema not found"))?;
        let (_, text) = if schema_version.is_empty() {
            versions.last()
        } else {
            versions.iter().find(|(v, _)| v == schema_version)
        }
        .ok_or_else(|| Status::not_found("schema not found"))?;

        // Entity names are the word after each `entity` keyword.
        let entity_definitions = text
            .split_whitespace()
            .collect::<Vec<_>>()
            .windows(2)
            .filter(|w| w[0] == "entity")
            .map(|w| {
                (
                    w[1].to_string(),
                    EntityDefinition {
                        name: w[1].to_string(),
                    },
                )
            })
            .collect();
        Ok(SchemaReadResponse {
            schema: Some(SchemaDefinition { entity_definitions }),
        })
    }

    async fn write_bundles(&self, request: BundleWriteRequest) -> Result<Vec<String>, Status> {
        let mut state = self.state();
        state.bundle_write_calls += 1;
        if let Some(status) = state.bundle_write_failure.clone() {
            return Err(status);
        }
        let mut names = Vec::with_capacity(request.bundles.len());
        for bundle in request.bundles {
            names.push(bundle.name.clone());
            state
                .bundles
                .insert((request.tenant_id.clone(), bundle.name.clone()), bundle);
        }
        Ok(names)
    }

    async fn read_bundle(&self, tenant_id: &str, name: &str) -> Result<BundleReadResponse, Status> {
        self.state().bundle_read_calls += 1;
        self.enter_bundle_call(name).await;
        let result = {
            let state = self.state();
            match state.bundle_read_failures.get(name) {
                Some(status) => Err(status.clone()),
                None => state
                    .bundles
                    .get(&(tenant_id.to_string(), name.to_string()))
                    .cloned()
                    .map(|bundle| BundleReadResponse {
                        bundle: Some(bundle),
                    })
                    .ok_or_else(|| Status::not_found(format!("bundle {name} not found"))),
            }
        };
        self.leave_bundle_call();
        result
    }

    async fn delete_bundle(&self, tenant_id: &str, name: &str) -> Result<(), Status> {
        self.state().bundle_delete_calls += 1;
        self.enter_bundle_call(name).await;
        let result = {
            let mut state = self.state();
            match state.bundle_delete_failures.get(name) {
                Some(status) => Err(status.clone()),
                None => {
                    state
                        .bundles
                        .remove(&(tenant_id.to_string(), name.to_string()));
                    Ok(())
                }
            }
        };
        self.leave_bundle_call();
        result
    }
}
