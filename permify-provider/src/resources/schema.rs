//! Schema resource. One schema per tenant, versioned by the service.

use async_trait::async_trait;
use permify_client::PermifyApi;
use tonic::Code;
use tracing::{info, warn};

use super::{ReadOutcome, Resource};
use crate::error::{ProviderError, Result};
use crate::models::SchemaModel;

pub struct SchemaResource<C> {
    client: C,
}

impl<C: PermifyApi> SchemaResource<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Read one version. Only `NotFound` means the schema is gone.
    async fn read_version(&self, tenant_id: &str, version: &str) -> Result<bool> {
        match self.client.read_schema(tenant_id, version).await {
            Ok(_) => Ok(true),
            Err(status) if status.code() == Code::NotFound => {
                info!(
                    "Schema {:?} for tenant {} not found: {}",
                    version,
                    tenant_id,
                    status.message()
                );
                Ok(false)
            }
            Err(status) => {
                warn!("Failed to read schema for tenant {}: {}", tenant_id, status);
                Err(ProviderError::Rpc(status))
            }
        }
    }
}

#[async_trait]
impl<C: PermifyApi> Resource for SchemaResource<C> {
    type Model = SchemaModel;

    const TYPE_NAME: &'static str = "permify_schema";

    async fn create(&self, plan: &SchemaModel) -> Result<SchemaModel> {
        info!("Writing schema for tenant {}", plan.tenant_id);
        let version = self
            .client
            .write_schema(&plan.tenant_id, &plan.schema)
            .await?;
        info!("Schema for tenant {} is now version {}", plan.tenant_id, version);
        Ok(SchemaModel {
            id: plan.tenant_id.clone(),
            tenant_id: plan.tenant_id.clone(),
            schema: plan.schema.clone(),
            schema_version: version,
        })
    }

    async fn read(&self, state: &SchemaModel) -> Result<ReadOutcome<SchemaModel>> {
        if self
            .read_version(&state.tenant_id, &state.schema_version)
            .await?
        {
            Ok(ReadOutcome::Present(state.clone()))
        } else {
            Ok(ReadOutcome::Removed)
        }
    }

    async fn update(&self, _prior: &SchemaModel, _plan: &SchemaModel) -> Result<SchemaModel> {
        Err(ProviderError::UpdateUnsupported("schema"))
    }

    /// Schemas cannot be removed, so deleting writes empty schema text.
    async fn delete(&self, state: &SchemaModel) -> Result<()> {
        info!("Clearing schema for tenant {}", state.tenant_id);
        self.client.write_schema(&state.tenant_id, "").await?;
        Ok(())
    }

    /// Import by tenant id. The latest version is checked; its text is not
    /// recoverable from the service, so the imported schema is empty.
    async fn import(&self, id: &str) -> Result<ReadOutcome<SchemaModel>> {
        if !self.read_version(id, "").await? {
            return Ok(ReadOutcome::Removed);
        }
        let mut state = SchemaModel::new(id, "");
        state.id = id.to_string();
        Ok(ReadOutcome::Present(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_SCHEMA_TENANT;
    use crate::test_util::FakePermify;
    use tonic::Status;

    const SCHEMA: &str = "entity user {}\n\nentity organization {\n  relation admin @user\n}";

    #[tokio::test]
    async fn test_create_records_version_and_id() {
        let fake = FakePermify::new();
        let resource = SchemaResource::new(fake.clone());

        let state = resource
            .create(&SchemaModel::new(DEFAULT_SCHEMA_TENANT, SCHEMA))
            .await
            .unwrap();
        assert_eq!(state.id, "t1");
        assert_eq!(state.tenant_id, "t1");
        assert!(!state.schema_version.is_empty());
        assert_eq!(
            fake.schema_versions("t1"),
            vec![(state.schema_version.clone(), SCHEMA.to_string())]
        );
    }

    #[tokio::test]
    async fn test_read_keeps_state_when_version_exists() {
        let fake = FakePermify::new();
        let resource = SchemaResource::new(fake);
        let state = resource
            .create(&SchemaModel::new("acme", SCHEMA))
            .await
            .unwrap();

        let refreshed = resource.read(&state).await.unwrap();
        assert_eq!(refreshed, ReadOutcome::Present(state));
    }

    #[tokio::test]
    async fn test_read_not_found_is_removed() {
        let resource = SchemaResource::new(FakePermify::new());
        let mut state = SchemaModel::new("acme", SCHEMA);
        state.schema_version = "v9".into();

        assert!(resource.read(&state).await.unwrap().is_removed());
    }

    #[tokio::test]
    async fn test_read_transient_error_keeps_state() {
        let fake = FakePermify::new();
        let resource = SchemaResource::new(fake.clone());
        let state = resource
            .create(&SchemaModel::new("acme", SCHEMA))
            .await
            .unwrap();
        fake.fail_schema_read(Status::unavailable("connection refused"));

        let err = resource.read(&state).await.unwrap_err();
        assert!(matches!(err, ProviderError::Rpc(s) if s.code() == Code::Unavailable));
    }

    #[tokio::test]
    async fn test_update_is_rejected() {
        let resource = SchemaResource::new(FakePermify::new());
        let state = SchemaModel::new("acme", SCHEMA);
        let err = resource.update(&state, &state).await.unwrap_err();
        assert!(matches!(err, ProviderError::UpdateUnsupported("schema")));
    }

    #[tokio::test]
    async fn test_delete_writes_empty_schema() {
        let fake = FakePermify::new();
        let resource = SchemaResource::new(fake.clone());
        let state = resource
            .create(&SchemaModel::new("acme", SCHEMA))
            .await
            .unwrap();

        resource.delete(&state).await.unwrap();
        let versions = fake.schema_versions("acme");
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[1].1, "");
    }

    #[tokio::test]
    async fn test_import_uses_tenant_id() {
        let fake = FakePermify::new();
        let resource = SchemaResource::new(fake);
        resource
            .create(&SchemaModel::new("acme", SCHEMA))
            .await
            .unwrap();

        let state = resource.import("acme").await.unwrap().into_option().unwrap();
        assert_eq!(state.id, "acme");
        assert_eq!(state.tenant_id, "acme");
        assert!(state.schema.is_empty());
        assert!(resource.import("nobody").await.unwrap().is_removed());
    }
}
