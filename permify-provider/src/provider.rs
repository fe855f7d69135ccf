//! Provider entry point: one configured client shared by every resource.

use permify_client::{ClientError, ConnectConfig, PermifyApi, PermifyClient};
use tracing::info;

use crate::config::ProviderConfig;
use crate::resources::{
    BundlesResource, Resource, SchemaResource, TenantDataSource, TenantResource,
};

/// Hands out resources bound to one Permify client.
#[derive(Clone)]
pub struct Provider<C> {
    client: C,
}

impl Provider<PermifyClient> {
    /// Build the gRPC client from `config`. The connection is opened on first use.
    pub fn connect(config: &ProviderConfig) -> Result<Self, ClientError> {
        let client = PermifyClient::connect_lazy(&ConnectConfig::from(config))?;
        info!("Permify provider configured for {}", config.endpoint);
        Ok(Self::new(client))
    }
}

impl<C> Provider<C>
where
    C: PermifyApi + Clone + 'static,
{
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Registered resource type names.
    pub fn resource_types() -> [&'static str; 3] {
        [
            TenantResource::<C>::TYPE_NAME,
            SchemaResource::<C>::TYPE_NAME,
            BundlesResource::<C>::TYPE_NAME,
        ]
    }

    pub fn data_source_types() -> [&'static str; 1] {
        [TenantDataSource::<C>::TYPE_NAME]
    }

    pub fn tenant(&self) -> TenantResource<C> {
        TenantResource::new(self.client.clone())
    }

    pub fn schema(&self) -> SchemaResource<C> {
        SchemaResource::new(self.client.clone())
    }

    pub fn bundles(&self) -> BundlesResource<C> {
        BundlesResource::new(self.client.clone())
    }

    pub fn tenant_data_source(&self) -> TenantDataSource<C> {
        TenantDataSource::new(self.client.clone())
    }
}
