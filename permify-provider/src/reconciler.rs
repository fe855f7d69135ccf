//! Bundle reconciliation: one bulk write, or one concurrent call per bundle.
//!
//! Fan-out operations spawn a task per bundle with no concurrency cap and wait
//! for all of them. A failure never cancels its siblings. Each task records its
//! outcome into a shared accumulator; the lock is held only for that append.

use std::collections::HashSet;
use std::sync::Arc;

use permify_client::PermifyApi;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tonic::Status;
use tracing::{debug, error, info, warn};

use crate::error::{BatchError, BundleFailure};
use crate::models::{write_request, BundleModel};

/// Results and failures gathered by fan-out tasks.
struct Accumulator<T> {
    results: Vec<T>,
    failures: Vec<BundleFailure>,
}

impl<T> Default for Accumulator<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            failures: Vec::new(),
        }
    }
}

/// Wait for every task. A task that panicked counts as a failure of its bundle.
async fn join_all<T>(tasks: Vec<(String, JoinHandle<()>)>, acc: &Mutex<Accumulator<T>>) {
    for (name, handle) in tasks {
        if let Err(e) = handle.await {
            error!("Bundle task for {} did not complete: {}", name, e);
            acc.lock().await.failures.push(BundleFailure {
                name,
                status: Status::internal(format!("task did not complete: {e}")),
            });
        }
    }
}

async fn take<T>(acc: &Mutex<Accumulator<T>>) -> Accumulator<T> {
    std::mem::take(&mut *acc.lock().await)
}

/// Write every bundle in a single call.
///
/// Returns the names acknowledged by the service. Any failure fails the whole write.
pub async fn write_bundles<C: PermifyApi + ?Sized>(
    client: &C,
    tenant_id: &str,
    bundles: &[BundleModel],
) -> Result<Vec<String>, Status> {
    info!("Writing {} bundle(s) for tenant {}", bundles.len(), tenant_id);
    client.write_bundles(write_request(tenant_id, bundles)).await
}

/// Read each named bundle concurrently.
///
/// Results arrive in completion order. If any read fails the partial results
/// are discarded and every failure is reported.
pub async fn read_bundles<C>(
    client: &C,
    tenant_id: &str,
    names: &[String],
) -> Result<Vec<BundleModel>, BatchError>
where
    C: PermifyApi + Clone + 'static,
{
    let acc: Arc<Mutex<Accumulator<BundleModel>>> = Arc::default();
    let mut tasks = Vec::with_capacity(names.len());

    for name in names {
        let client = client.clone();
        let tenant_id = tenant_id.to_string();
        let task_name = name.clone();
        let acc = Arc::clone(&acc);
        let handle = tokio::spawn(async move {
            let result = client
                .read_bundle(&tenant_id, &task_name)
                .await
                .and_then(|response| {
                    BundleModel::try_from(response).map_err(|e| Status::internal(e.to_string()))
                });

            let mut acc = acc.lock().await;
            match result {
                Ok(bundle) => acc.results.push(bundle),
                Err(status) => {
                    warn!("Failed to read bundle {}: {}", task_name, status);
                    acc.failures.push(BundleFailure {
                        name: task_name,
                        status,
                    });
                }
            }
        });
        tasks.push((name.clone(), handle));
    }

    join_all(tasks, &acc).await;
    let acc = take(&acc).await;

    if acc.failures.is_empty() {
        debug!("Read {} bundle(s) for tenant {}", acc.results.len(), tenant_id);
        Ok(acc.results)
    } else {
        Err(BatchError {
            operation: "read",
            total: names.len(),
            failures: acc.failures,
        })
    }
}

/// Outcome of a fan-out delete.
#[derive(Debug)]
pub struct DeleteOutcome {
    /// Bundles whose delete failed; they still exist remotely.
    pub still_present: Vec<BundleModel>,
    /// One entry per failed delete.
    pub failures: Vec<BundleFailure>,
    /// Number of deletes launched.
    pub total: usize,
}

impl DeleteOutcome {
    /// True when every bundle was deleted.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Split into the still-present bundles and the aggregated error, if any.
    pub fn into_parts(self) -> (Vec<BundleModel>, Option<BatchError>) {
        let error = (!self.failures.is_empty()).then(|| BatchError {
            operation: "delete",
            total: self.total,
            failures: self.failures,
        });
        (self.still_present, error)
    }

    pub fn into_result(self) -> Result<(), BatchError> {
        match self.into_parts() {
            (_, Some(err)) => Err(err),
            (_, None) => Ok(()),
        }
    }
}

/// Delete each bundle concurrently.
///
/// One failing delete neither blocks nor rolls back the others. Failed bundles
/// are kept in `still_present` so tracked state matches what exists remotely.
pub async fn delete_bundles<C>(
    client: &C,
    tenant_id: &str,
    bundles: Vec<BundleModel>,
) -> DeleteOutcome
where
    C: PermifyApi + Clone + 'static,
{
    let total = bundles.len();
    // Successful deletes record the bundle name.
    let acc: Arc<Mutex<Accumulator<String>>> = Arc::default();
    let mut tasks = Vec::with_capacity(total);

    for bundle in &bundles {
        let client = client.clone();
        let tenant_id = tenant_id.to_string();
        let name = bundle.name.clone();
        let acc = Arc::clone(&acc);
        let handle = tokio::spawn(async move {
            let result = client.delete_bundle(&tenant_id, &name).await;

            let mut acc = acc.lock().await;
            match result {
                Ok(()) => acc.results.push(name),
                Err(status) => {
                    warn!("Failed to delete bundle {}: {}", name, status);
                    acc.failures.push(BundleFailure { name, status });
                }
            }
        });
        tasks.push((bundle.name.clone(), handle));
    }

    join_all(tasks, &acc).await;
    let acc = take(&acc).await;

    let failed: HashSet<&str> = acc.failures.iter().map(|f| f.name.as_str()).collect();
    let still_present: Vec<BundleModel> = bundles
        .into_iter()
        .filter(|b| failed.contains(b.name.as_str()))
        .collect();

    info!(
        "Deleted {} of {} bundle(s) for tenant {}",
        acc.results.len(),
        total,
        tenant_id
    );
    DeleteOutcome {
        still_present,
        failures: acc.failures,
        total,
    }
}
