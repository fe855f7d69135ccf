//! Declarative resource models and their wire translations.
//!
//! Translations map every element 1:1 and keep order. Nothing is validated
//! here; the service rejects invalid expressions.

use chrono::{DateTime, SecondsFormat};
use permify_client::proto::{BundleReadResponse, BundleWriteRequest, DataBundle, Operation, Tenant};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Tenant used by the schema resource when none is configured.
pub const DEFAULT_SCHEMA_TENANT: &str = "t1";

// =============================================================================
// Tenant
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantModel {
    pub id: String,
    pub name: String,
    /// RFC 3339, assigned by the service.
    #[serde(default)]
    pub created_at: String,
}

impl From<Tenant> for TenantModel {
    fn from(tenant: Tenant) -> Self {
        Self {
            created_at: format_timestamp(tenant.created_at.as_ref()),
            id: tenant.id,
            name: tenant.name,
        }
    }
}

/// Format a wire timestamp as RFC 3339 in UTC with second precision.
///
/// Missing or out-of-range timestamps format as an empty string.
pub fn format_timestamp(timestamp: Option<&prost_types::Timestamp>) -> String {
    timestamp
        .and_then(|ts| DateTime::from_timestamp(ts.seconds, u32::try_from(ts.nanos).unwrap_or(0)))
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

// =============================================================================
// Schema
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaModel {
    /// Same as `tenant_id` once written.
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_schema_tenant")]
    pub tenant_id: String,
    pub schema: String,
    #[serde(default)]
    pub schema_version: String,
}

fn default_schema_tenant() -> String {
    DEFAULT_SCHEMA_TENANT.to_string()
}

impl SchemaModel {
    pub fn new(tenant_id: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            tenant_id: tenant_id.into(),
            schema: schema.into(),
            schema_version: String::new(),
        }
    }
}

// =============================================================================
// Bundles
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationModel {
    #[serde(default)]
    pub relationships_write: Vec<String>,
    #[serde(default)]
    pub relationships_delete: Vec<String>,
    #[serde(default)]
    pub attributes_write: Vec<String>,
    #[serde(default)]
    pub attributes_delete: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleModel {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<String>,
    #[serde(default)]
    pub operations: Vec<OperationModel>,
}

/// All bundles managed for one tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundlesModel {
    /// Same as `tenant_id` once written.
    #[serde(default)]
    pub id: String,
    pub tenant_id: String,
    #[serde(default)]
    pub bundles: Vec<BundleModel>,
}

impl BundlesModel {
    pub fn names(&self) -> Vec<String> {
        self.bundles.iter().map(|b| b.name.clone()).collect()
    }

    /// The single bulk write request for every bundle.
    pub fn to_write_request(&self) -> BundleWriteRequest {
        write_request(&self.tenant_id, &self.bundles)
    }
}

/// Bulk write request for `bundles` under `tenant_id`.
pub fn write_request(tenant_id: &str, bundles: &[BundleModel]) -> BundleWriteRequest {
    BundleWriteRequest {
        tenant_id: tenant_id.to_string(),
        bundles: bundles.iter().map(DataBundle::from).collect(),
    }
}

impl From<&OperationModel> for Operation {
    fn from(op: &OperationModel) -> Self {
        Self {
            relationships_write: op.relationships_write.clone(),
            relationships_delete: op.relationships_delete.clone(),
            attributes_write: op.attributes_write.clone(),
            attributes_delete: op.attributes_delete.clone(),
        }
    }
}

impl From<Operation> for OperationModel {
    fn from(op: Operation) -> Self {
        Self {
            relationships_write: op.relationships_write,
            relationships_delete: op.relationships_delete,
            attributes_write: op.attributes_write,
            attributes_delete: op.attributes_delete,
        }
    }
}

impl From<&BundleModel> for DataBundle {
    fn from(bundle: &BundleModel) -> Self {
        Self {
            name: bundle.name.clone(),
            arguments: bundle.arguments.clone(),
            operations: bundle.operations.iter().map(Operation::from).collect(),
        }
    }
}

impl From<DataBundle> for BundleModel {
    fn from(bundle: DataBundle) -> Self {
        Self {
            name: bundle.name,
            arguments: bundle.arguments,
            operations: bundle.operations.into_iter().map(OperationModel::from).collect(),
        }
    }
}

impl TryFrom<BundleReadResponse> for BundleModel {
    type Error = ProviderError;

    fn try_from(response: BundleReadResponse) -> Result<Self, Self::Error> {
        response
            .bundle
            .map(BundleModel::from)
            .ok_or(ProviderError::MissingPayload("bundle"))
    }
}
