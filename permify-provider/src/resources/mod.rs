//! Declarative resources managed by the provider.
//!
//! Each resource maps a host lifecycle step onto Permify calls. State models
//! are plain values: the host persists whatever a step returns and hands it
//! back on the next step.

pub mod bundles;
pub mod data_source;
pub mod schema;
pub mod tenant;

use async_trait::async_trait;

use crate::error::Result;

pub use bundles::BundlesResource;
pub use data_source::TenantDataSource;
pub use schema::SchemaResource;
pub use tenant::TenantResource;

/// Result of refreshing tracked state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome<T> {
    /// The resource exists; this is its refreshed state.
    Present(T),
    /// The resource is gone and should be dropped from tracked state.
    Removed,
}

impl<T> ReadOutcome<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            ReadOutcome::Present(model) => Some(model),
            ReadOutcome::Removed => None,
        }
    }

    pub fn is_removed(&self) -> bool {
        matches!(self, ReadOutcome::Removed)
    }
}

/// Lifecycle of one resource type.
#[async_trait]
pub trait Resource: Send + Sync {
    /// State model persisted by the host.
    type Model: Send + Sync;

    /// Resource type name as registered with the host.
    const TYPE_NAME: &'static str;

    /// Create the resource from the planned model and return its state.
    async fn create(&self, plan: &Self::Model) -> Result<Self::Model>;

    /// Refresh tracked state.
    async fn read(&self, state: &Self::Model) -> Result<ReadOutcome<Self::Model>>;

    /// Move from `prior` state to `plan`.
    async fn update(&self, prior: &Self::Model, plan: &Self::Model) -> Result<Self::Model>;

    async fn delete(&self, state: &Self::Model) -> Result<()>;

    /// Adopt an existing remote resource by id.
    async fn import(&self, id: &str) -> Result<ReadOutcome<Self::Model>>;
}
