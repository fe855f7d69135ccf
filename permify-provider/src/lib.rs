//! permify-provider: declarative management of Permify tenants, schemas and
//! data bundles.
//!
//! The core is split into:
//! - [`finder`]: tenant lookup over the paginated tenant list
//! - [`reconciler`]: bulk bundle writes and concurrent per-bundle reads/deletes
//! - [`diff`]: which bundles a new desired set drops
//! - [`models`]: state models and their wire translations
//! - [`resources`]: create/read/update/delete/import per resource type

pub mod config;
pub mod diff;
pub mod error;
pub mod finder;
pub mod models;
pub mod provider;
pub mod reconciler;
pub mod resources;
pub mod test_util;

pub use config::ProviderConfig;
pub use error::{BatchError, BundleFailure, ProviderError, Result};
pub use models::{BundleModel, BundlesModel, OperationModel, SchemaModel, TenantModel};
pub use provider::Provider;
pub use resources::{ReadOutcome, Resource};
