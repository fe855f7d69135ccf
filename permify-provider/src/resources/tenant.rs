//! Tenant resource.

use async_trait::async_trait;
use permify_client::PermifyApi;
use tracing::{debug, info, warn};

use super::{ReadOutcome, Resource};
use crate::error::{ProviderError, Result};
use crate::finder::find_tenant;
use crate::models::TenantModel;

pub struct TenantResource<C> {
    client: C,
}

impl<C: PermifyApi> TenantResource<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: PermifyApi> Resource for TenantResource<C> {
    type Model = TenantModel;

    const TYPE_NAME: &'static str = "permify_tenant";

    async fn create(&self, plan: &TenantModel) -> Result<TenantModel> {
        info!("Creating tenant {} ({})", plan.name, plan.id);
        let tenant = self.client.create_tenant(&plan.id, &plan.name).await?;
        Ok(TenantModel::from(tenant))
    }

    async fn read(&self, state: &TenantModel) -> Result<ReadOutcome<TenantModel>> {
        match find_tenant(&self.client, &state.id).await? {
            Some(tenant) => Ok(ReadOutcome::Present(TenantModel::from(tenant))),
            None => {
                info!("Tenant {} no longer exists", state.id);
                Ok(ReadOutcome::Removed)
            }
        }
    }

    async fn update(&self, _prior: &TenantModel, _plan: &TenantModel) -> Result<TenantModel> {
        Err(ProviderError::UpdateUnsupported("tenant"))
    }

    /// Delete the tenant.
    ///
    /// The service can report an error for a delete that took effect. When the
    /// call fails, every tenant page is scanned and the delete only counts as
    /// failed if the tenant is still listed.
    async fn delete(&self, state: &TenantModel) -> Result<()> {
        info!("Deleting tenant {}", state.id);
        let status = match self.client.delete_tenant(&state.id).await {
            Ok(()) => return Ok(()),
            Err(status) => status,
        };

        warn!("Delete of tenant {} reported: {}", state.id, status);
        match find_tenant(&self.client, &state.id).await? {
            Some(_) => Err(ProviderError::Rpc(status)),
            None => {
                debug!("Tenant {} is gone despite the reported error", state.id);
                Ok(())
            }
        }
    }

    async fn import(&self, id: &str) -> Result<ReadOutcome<TenantModel>> {
        let state = TenantModel {
            id: id.to_string(),
            ..Default::default()
        };
        self.read(&state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::FakePermify;
    use tonic::{Code, Status};

    fn plan(id: &str, name: &str) -> TenantModel {
        TenantModel {
            id: id.into(),
            name: name.into(),
            created_at: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_sets_created_at() {
        let fake = FakePermify::new();
        let resource = TenantResource::new(fake.clone());

        let state = resource.create(&plan("acme", "Acme Inc")).await.unwrap();
        assert_eq!(state.id, "acme");
        assert_eq!(state.name, "Acme Inc");
        assert_eq!(state.created_at, "2024-01-01T00:00:00Z");
        assert!(fake.has_tenant("acme"));
    }

    #[tokio::test]
    async fn test_create_duplicate_surfaces_status() {
        let fake = FakePermify::new();
        fake.add_tenant("acme", "Acme");
        let resource = TenantResource::new(fake);

        let err = resource.create(&plan("acme", "Acme")).await.unwrap_err();
        assert!(matches!(err, ProviderError::Rpc(s) if s.code() == Code::AlreadyExists));
    }

    #[tokio::test]
    async fn test_read_missing_tenant_is_removed() {
        let fake = FakePermify::new();
        fake.add_tenants((0..120).map(|i| format!("tenant-{i}")));
        let resource = TenantResource::new(fake);

        let outcome = resource.read(&plan("gone", "Gone")).await.unwrap();
        assert!(outcome.is_removed());
    }

    #[tokio::test]
    async fn test_read_refreshes_from_service() {
        let fake = FakePermify::new();
        fake.add_tenant("acme", "Renamed");
        let resource = TenantResource::new(fake);

        let state = resource
            .read(&plan("acme", "Acme"))
            .await
            .unwrap()
            .into_option()
            .unwrap();
        assert_eq!(state.name, "Renamed");
    }

    #[tokio::test]
    async fn test_update_is_rejected() {
        let resource = TenantResource::new(FakePermify::new());
        let err = resource
            .update(&plan("a", "A"), &plan("a", "B"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UpdateUnsupported("tenant")));
    }

    #[tokio::test]
    async fn test_delete_error_ignored_when_tenant_is_gone() {
        let fake = FakePermify::new();
        fake.add_tenants((0..150).map(|i| format!("tenant-{i}")));
        fake.fail_tenant_delete(Status::internal("tenant delete reported failure"), true);
        let resource = TenantResource::new(fake.clone());

        resource.delete(&plan("tenant-130", "")).await.unwrap();
        assert!(!fake.has_tenant("tenant-130"));
        // The verification scanned past the first page.
        assert_eq!(fake.list_tokens(), vec!["", "tok2"]);
    }

    #[tokio::test]
    async fn test_delete_error_reported_when_tenant_remains() {
        let fake = FakePermify::new();
        fake.add_tenant("acme", "Acme");
        fake.fail_tenant_delete(Status::permission_denied("nope"), false);
        let resource = TenantResource::new(fake.clone());

        let err = resource.delete(&plan("acme", "Acme")).await.unwrap_err();
        assert!(matches!(err, ProviderError::Rpc(s) if s.code() == Code::PermissionDenied));
        assert!(fake.has_tenant("acme"));
    }

    #[tokio::test]
    async fn test_delete_verification_error_is_surfaced() {
        let fake = FakePermify::new();
        fake.add_tenant("acme", "Acme");
        fake.fail_tenant_delete(Status::internal("boom"), false);
        fake.fail_list_at(1, Status::unavailable("down"));
        let resource = TenantResource::new(fake);

        let err = resource.delete(&plan("acme", "Acme")).await.unwrap_err();
        assert!(matches!(err, ProviderError::Rpc(s) if s.code() == Code::Unavailable));
    }

    #[tokio::test]
    async fn test_import_reads_by_id() {
        let fake = FakePermify::new();
        fake.add_tenant("acme", "Acme");
        let resource = TenantResource::new(fake);

        let state = resource.import("acme").await.unwrap().into_option().unwrap();
        assert_eq!(state.name, "Acme");
        assert!(resource.import("other").await.unwrap().is_removed());
    }
}
