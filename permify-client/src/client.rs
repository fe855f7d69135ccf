//! Connection setup and the tonic-backed `PermifyApi` implementation.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint};
use tonic::Status;
use tracing::{debug, info};

use crate::api::PermifyApi;
use crate::auth::AuthInterceptor;
use crate::error::{ClientError, Result};
use crate::proto::*;
use crate::rpc::{BundleClient, SchemaClient, TenancyClient};

/// Default Permify gRPC endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3478";

/// Connection settings for the Permify API.
#[derive(Debug, Clone, Default)]
pub struct ConnectConfig {
    /// gRPC endpoint URI.
    pub endpoint: String,
    /// Bearer token sent with every call.
    pub token: Option<String>,
    /// Base64 encoded PEM CA certificate. Enables TLS.
    pub cert: Option<String>,
    /// Path to a PEM CA certificate. Enables TLS.
    pub cert_file: Option<PathBuf>,
    /// Connect timeout. The transport default applies when unset.
    pub connect_timeout: Option<Duration>,
}

impl ConnectConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// The CA certificate PEM, if TLS is configured.
    pub fn ca_certificate(&self) -> Result<Option<Vec<u8>>> {
        match (&self.cert, &self.cert_file) {
            (Some(_), Some(_)) => Err(ClientError::ConflictingCertificates),
            (Some(encoded), None) => {
                let pem = base64::engine::general_purpose::STANDARD.decode(encoded.trim())?;
                Ok(Some(pem))
            }
            (None, Some(path)) => {
                let pem = std::fs::read(path).map_err(|source| ClientError::CertificateFile {
                    path: path.display().to_string(),
                    source,
                })?;
                Ok(Some(pem))
            }
            (None, None) => Ok(None),
        }
    }

    /// Build the transport endpoint without connecting.
    pub fn endpoint(&self) -> Result<Endpoint> {
        let mut endpoint = Endpoint::from_shared(self.endpoint.clone()).map_err(|e| {
            ClientError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            }
        })?;

        if let Some(pem) = self.ca_certificate()? {
            let tls = ClientTlsConfig::new().ca_certificate(Certificate::from_pem(pem));
            endpoint = endpoint.tls_config(tls).map_err(ClientError::Tls)?;
        }
        if let Some(timeout) = self.connect_timeout {
            endpoint = endpoint.connect_timeout(timeout);
        }
        Ok(endpoint)
    }
}

/// Channel with the auth interceptor applied.
pub type AuthChannel = InterceptedService<Channel, AuthInterceptor>;

/// Permify API client over a shared channel.
///
/// Cloning is cheap; clones share the underlying connection.
#[derive(Clone)]
pub struct PermifyClient {
    tenancy: TenancyClient<AuthChannel>,
    schema: SchemaClient<AuthChannel>,
    bundle: BundleClient<AuthChannel>,
}

impl PermifyClient {
    /// Build a client whose channel connects on first use.
    pub fn connect_lazy(config: &ConnectConfig) -> Result<Self> {
        let endpoint = config.endpoint()?;
        let interceptor = AuthInterceptor::new(config.token.as_deref())?;
        info!(
            endpoint = %config.endpoint,
            tls = config.cert.is_some() || config.cert_file.is_some(),
            auth = interceptor.is_enabled(),
            "Configured Permify client"
        );
        Ok(Self::from_channel(endpoint.connect_lazy(), interceptor))
    }

    pub fn from_channel(channel: Channel, interceptor: AuthInterceptor) -> Self {
        let service = InterceptedService::new(channel, interceptor);
        Self {
            tenancy: TenancyClient::new(service.clone()),
            schema: SchemaClient::new(service.clone()),
            bundle: BundleClient::new(service),
        }
    }
}

#[async_trait]
impl PermifyApi for PermifyClient {
    async fn list_tenants(
        &self,
        page_size: u32,
        continuous_token: String,
    ) -> std::result::Result<TenantListResponse, Status> {
        debug!(page_size, token = %continuous_token, "Listing tenants");
        let response = self
            .tenancy
            .clone()
            .list(TenantListRequest {
                page_size,
                continuous_token,
            })
            .await?;
        Ok(response.into_inner())
    }

    async fn create_tenant(&self, id: &str, name: &str) -> std::result::Result<Tenant, Status> {
        debug!(id, name, "Creating tenant");
        let response = self
            .tenancy
            .clone()
            .create(TenantCreateRequest {
                id: id.to_string(),
                name: name.to_string(),
            })
            .await?;
        response
            .into_inner()
            .tenant
            .ok_or_else(|| Status::internal("tenant create response carried no tenant"))
    }

    async fn delete_tenant(&self, id: &str) -> std::result::Result<(), Status> {
        debug!(id, "Deleting tenant");
        self.tenancy
            .clone()
            .delete(TenantDeleteRequest { id: id.to_string() })
            .await?;
        Ok(())
    }

    async fn write_schema(&self, tenant_id: &str, schema: &str) -> std::result::Result<String, Status> {
        debug!(tenant_id, bytes = schema.len(), "Writing schema");
        let response = self
            .schema
            .clone()
            .write(SchemaWriteRequest {
                tenant_id: tenant_id.to_string(),
                schema: schema.to_string(),
            })
            .await?;
        Ok(response.into_inner().schema_version)
    }

    async fn read_schema(
        &self,
        tenant_id: &str,
        schema_version: &str,
    ) -> std::result::Result<SchemaReadResponse, Status> {
        debug!(tenant_id, schema_version, "Reading schema");
        let response = self
            .schema
            .clone()
            .read(SchemaReadRequest {
                tenant_id: tenant_id.to_string(),
                metadata: Some(SchemaReadRequestMetadata {
                    schema_version: schema_version.to_string(),
                }),
            })
            .await?;
        Ok(response.into_inner())
    }

    async fn write_bundles(
        &self,
        request: BundleWriteRequest,
    ) -> std::result::Result<Vec<String>, Status> {
        debug!(
            tenant_id = %request.tenant_id,
            count = request.bundles.len(),
            "Writing bundles"
        );
        let response = self.bundle.clone().write(request).await?;
        Ok(response.into_inner().names)
    }

    async fn read_bundle(
        &self,
        tenant_id: &str,
        name: &str,
    ) -> std::result::Result<BundleReadResponse, Status> {
        debug!(tenant_id, name, "Reading bundle");
        let response = self
            .bundle
            .clone()
            .read(BundleReadRequest {
                tenant_id: tenant_id.to_string(),
                name: name.to_string(),
            })
            .await?;
        Ok(response.into_inner())
    }

    async fn delete_bundle(&self, tenant_id: &str, name: &str) -> std::result::Result<(), Status> {
        debug!(tenant_id, name, "Deleting bundle");
        self.bundle
            .clone()
            .delete(BundleDeleteRequest {
                tenant_id: tenant_id.to_string(),
                name: name.to_string(),
            })
            .await?;
        Ok(())
    }
}
