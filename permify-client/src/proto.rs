//! Protobuf messages for the subset of Permify `base.v1` used by the provider.
//!
//! Field tags match the upstream `base/v1/service.proto` and `base/v1/base.proto`.
//! Fields we never touch are left out; prost skips unknown fields on decode.

use std::collections::HashMap;

// =============================================================================
// Tenancy
// =============================================================================

/// A tenant as returned by the Tenancy service.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Tenant {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(message, optional, tag = "3")]
    pub created_at: Option<prost_types::Timestamp>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TenantCreateRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TenantCreateResponse {
    #[prost(message, optional, tag = "1")]
    pub tenant: Option<Tenant>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TenantDeleteRequest {
    #[prost(string, tag = "1")]
    pub id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TenantDeleteResponse {
    #[prost(string, tag = "1")]
    pub tenant_id: String,
}

/// Paged tenant listing. An empty `continuous_token` requests the first page.
#[derive(Clone, PartialEq, prost::Message)]
pub struct TenantListRequest {
    #[prost(uint32, tag = "1")]
    pub page_size: u32,
    #[prost(string, tag = "2")]
    pub continuous_token: String,
}

/// One page of tenants. An empty `continuous_token` means no pages remain.
#[derive(Clone, PartialEq, prost::Message)]
pub struct TenantListResponse {
    #[prost(message, repeated, tag = "1")]
    pub tenants: Vec<Tenant>,
    #[prost(string, tag = "2")]
    pub continuous_token: String,
}

// =============================================================================
// Schema
// =============================================================================

#[derive(Clone, PartialEq, prost::Message)]
pub struct SchemaWriteRequest {
    #[prost(string, tag = "1")]
    pub tenant_id: String,
    #[prost(string, tag = "2")]
    pub schema: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SchemaWriteResponse {
    #[prost(string, tag = "1")]
    pub schema_version: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SchemaReadRequestMetadata {
    #[prost(string, tag = "1")]
    pub schema_version: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SchemaReadRequest {
    #[prost(string, tag = "1")]
    pub tenant_id: String,
    #[prost(message, optional, tag = "2")]
    pub metadata: Option<SchemaReadRequestMetadata>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct EntityDefinition {
    #[prost(string, tag = "1")]
    pub name: String,
}

/// Compiled schema. Only entity names are decoded.
#[derive(Clone, PartialEq, prost::Message)]
pub struct SchemaDefinition {
    #[prost(map = "string, message", tag = "1")]
    pub entity_definitions: HashMap<String, EntityDefinition>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SchemaReadResponse {
    #[prost(message, optional, tag = "1")]
    pub schema: Option<SchemaDefinition>,
}

// =============================================================================
// Bundles
// =============================================================================

/// Relationship and attribute expressions applied when a bundle runs.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Operation {
    #[prost(string, repeated, tag = "1")]
    pub relationships_write: Vec<String>,
    #[prost(string, repeated, tag = "2")]
    pub relationships_delete: Vec<String>,
    #[prost(string, repeated, tag = "3")]
    pub attributes_write: Vec<String>,
    #[prost(string, repeated, tag = "4")]
    pub attributes_delete: Vec<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DataBundle {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, repeated, tag = "2")]
    pub arguments: Vec<String>,
    #[prost(message, repeated, tag = "3")]
    pub operations: Vec<Operation>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BundleWriteRequest {
    #[prost(string, tag = "1")]
    pub tenant_id: String,
    #[prost(message, repeated, tag = "2")]
    pub bundles: Vec<DataBundle>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BundleWriteResponse {
    #[prost(string, repeated, tag = "1")]
    pub names: Vec<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BundleReadRequest {
    #[prost(string, tag = "1")]
    pub tenant_id: String,
    #[prost(string, tag = "2")]
    pub name: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BundleReadResponse {
    #[prost(message, optional, tag = "1")]
    pub bundle: Option<DataBundle>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BundleDeleteRequest {
    #[prost(string, tag = "1")]
    pub tenant_id: String,
    #[prost(string, tag = "2")]
    pub name: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BundleDeleteResponse {
    #[prost(string, tag = "1")]
    pub name: String,
}
