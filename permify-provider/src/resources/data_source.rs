//! Read-only tenant lookup.

use permify_client::PermifyApi;
use tracing::debug;

use crate::error::{ProviderError, Result};
use crate::finder::find_tenant;
use crate::models::TenantModel;

/// Resolves an existing tenant by id. Unlike the tenant resource, a missing
/// tenant is an error.
pub struct TenantDataSource<C> {
    client: C,
}

impl<C: PermifyApi> TenantDataSource<C> {
    pub const TYPE_NAME: &'static str = "permify_tenant";

    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub async fn read(&self, id: &str) -> Result<TenantModel> {
        debug!("Looking up tenant {}", id);
        find_tenant(&self.client, id)
            .await?
            .map(TenantModel::from)
            .ok_or_else(|| ProviderError::TenantNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::FakePermify;

    #[tokio::test]
    async fn test_resolves_tenant_on_later_page() {
        let fake = FakePermify::new();
        fake.add_tenants((0..230).map(|i| format!("tenant-{i}")));
        let source = TenantDataSource::new(fake);

        let tenant = source.read("tenant-229").await.unwrap();
        assert_eq!(tenant.name, "tenant-229 name");
        assert_eq!(tenant.created_at, "2024-01-01T00:00:00Z");
    }

    #[tokio::test]
    async fn test_missing_tenant_is_an_error() {
        let source = TenantDataSource::new(FakePermify::new());
        let err = source.read("ghost").await.unwrap_err();
        assert_eq!(err.to_string(), "tenant \"ghost\" not found");
        assert!(matches!(err, ProviderError::TenantNotFound(id) if id == "ghost"));
    }
}
