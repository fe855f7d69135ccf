//! The operations the provider needs from the Permify API.

use async_trait::async_trait;
use tonic::Status;

use crate::proto::{
    BundleReadResponse, BundleWriteRequest, SchemaReadResponse, Tenant, TenantListResponse,
};

/// Remote Permify operations.
///
/// Implementations must be safe to share across concurrently running tasks.
/// Errors are returned exactly as the service or transport reported them.
#[async_trait]
pub trait PermifyApi: Send + Sync {
    /// Fetch one page of tenants. An empty token requests the first page.
    async fn list_tenants(
        &self,
        page_size: u32,
        continuous_token: String,
    ) -> Result<TenantListResponse, Status>;

    async fn create_tenant(&self, id: &str, name: &str) -> Result<Tenant, Status>;

    async fn delete_tenant(&self, id: &str) -> Result<(), Status>;

    /// Write schema text, returning the new schema version.
    async fn write_schema(&self, tenant_id: &str, schema: &str) -> Result<String, Status>;

    /// Read a schema version. An empty version reads the latest.
    async fn read_schema(
        &self,
        tenant_id: &str,
        schema_version: &str,
    ) -> Result<SchemaReadResponse, Status>;

    /// Write every bundle in one call, returning the acknowledged names.
    async fn write_bundles(&self, request: BundleWriteRequest) -> Result<Vec<String>, Status>;

    async fn read_bundle(&self, tenant_id: &str, name: &str)
        -> Result<BundleReadResponse, Status>;

    async fn delete_bundle(&self, tenant_id: &str, name: &str) -> Result<(), Status>;
}
