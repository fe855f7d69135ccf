//! Provider error types.

use std::fmt;

use thiserror::Error;
use tonic::Status;

use crate::models::BundlesModel;

/// Errors surfaced by resources and the reconciliation core.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A single RPC failed. The status is passed through unchanged.
    #[error("rpc failed: {0}")]
    Rpc(#[from] Status),

    /// One or more calls of a fan-out failed.
    #[error(transparent)]
    Batch(#[from] BatchError),

    /// Some bundles could not be deleted. `still_present` is the state to keep.
    #[error("{source}; {} bundle(s) still present", .still_present.bundles.len())]
    PartialDelete {
        still_present: BundlesModel,
        #[source]
        source: BatchError,
    },

    /// The resource cannot be changed in place.
    #[error("updating a {0} is unsupported, delete and recreate is required")]
    UpdateUnsupported(&'static str),

    /// An attribute changed that forces replacement.
    #[error("changing {0} requires replacing the resource")]
    RequiresReplace(&'static str),

    /// Lookup through the data source found nothing.
    #[error("tenant {0:?} not found")]
    TenantNotFound(String),

    /// A response was missing its payload.
    #[error("response carried no {0}")]
    MissingPayload(&'static str),
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// A failed call for one bundle within a fan-out.
#[derive(Debug, Clone)]
pub struct BundleFailure {
    pub name: String,
    pub status: Status,
}

/// Aggregate of every failure in one fan-out.
#[derive(Debug, Clone)]
pub struct BatchError {
    /// Operation name, e.g. "read" or "delete".
    pub operation: &'static str,
    /// Number of calls launched.
    pub total: usize,
    pub failures: Vec<BundleFailure>,
}

impl BatchError {
    /// Names of the bundles whose call failed, sorted.
    pub fn failed_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.failures.iter().map(|f| f.name.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bundle {} failed for {} of {} bundle(s)",
            self.operation,
            self.failures.len(),
            self.total
        )?;
        for failure in &self.failures {
            write!(
                f,
                "; {}: {:?}: {}",
                failure.name,
                failure.status.code(),
                failure.status.message()
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for BatchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_error_lists_every_failure() {
        let err = BatchError {
            operation: "delete",
            total: 3,
            failures: vec![
                BundleFailure {
                    name: "b".into(),
                    status: Status::unavailable("down"),
                },
                BundleFailure {
                    name: "a".into(),
                    status: Status::internal("boom"),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("bundle delete failed for 2 of 3 bundle(s)"));
        assert!(msg.contains("b: Unavailable: down"));
        assert!(msg.contains("a: Internal: boom"));
        assert_eq!(err.failed_names(), vec!["a", "b"]);
    }
}
