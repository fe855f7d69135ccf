//! Bundles resource: every data bundle of one tenant, managed as a set.

use std::collections::HashMap;

use async_trait::async_trait;
use permify_client::PermifyApi;
use tracing::{info, warn};

use super::{ReadOutcome, Resource};
use crate::diff::removed;
use crate::error::{ProviderError, Result};
use crate::models::{BundleModel, BundlesModel};
use crate::reconciler::{delete_bundles, read_bundles, write_bundles};

pub struct BundlesResource<C> {
    client: C,
}

impl<C> BundlesResource<C>
where
    C: PermifyApi + Clone + 'static,
{
    pub fn new(client: C) -> Self {
        Self { client }
    }

    async fn write(&self, plan: &BundlesModel) -> Result<BundlesModel> {
        let written = write_bundles(&self.client, &plan.tenant_id, &plan.bundles).await?;
        info!("Wrote bundles {:?} for tenant {}", written, plan.tenant_id);
        Ok(BundlesModel {
            id: plan.tenant_id.clone(),
            ..plan.clone()
        })
    }
}

/// Put `bundles` back into the order of `names`.
fn in_tracked_order(names: &[String], bundles: Vec<BundleModel>) -> Vec<BundleModel> {
    let mut by_name: HashMap<String, BundleModel> =
        bundles.into_iter().map(|b| (b.name.clone(), b)).collect();
    names.iter().filter_map(|n| by_name.remove(n)).collect()
}

#[async_trait]
impl<C> Resource for BundlesResource<C>
where
    C: PermifyApi + Clone + 'static,
{
    type Model = BundlesModel;

    const TYPE_NAME: &'static str = "permify_bundles";

    async fn create(&self, plan: &BundlesModel) -> Result<BundlesModel> {
        self.write(plan).await
    }

    /// Re-read every tracked bundle. Any failed read fails the refresh.
    async fn read(&self, state: &BundlesModel) -> Result<ReadOutcome<BundlesModel>> {
        let names = state.names();
        let bundles = read_bundles(&self.client, &state.tenant_id, &names).await?;
        Ok(ReadOutcome::Present(BundlesModel {
            bundles: in_tracked_order(&names, bundles),
            ..state.clone()
        }))
    }

    /// Write the planned set, then delete the bundles it dropped.
    ///
    /// The bulk write upserts by name and never deletes, so names present in
    /// `prior` but not in `plan` are deleted one by one afterwards.
    async fn update(&self, prior: &BundlesModel, plan: &BundlesModel) -> Result<BundlesModel> {
        if prior.tenant_id != plan.tenant_id {
            return Err(ProviderError::RequiresReplace("tenant_id"));
        }

        let mut state = self.write(plan).await?;
        let stale = removed(&prior.bundles, &plan.bundles);
        if stale.is_empty() {
            return Ok(state);
        }

        info!(
            "Deleting {} bundle(s) dropped from tenant {}",
            stale.len(),
            plan.tenant_id
        );
        let (still_present, err) = delete_bundles(&self.client, &plan.tenant_id, stale)
            .await
            .into_parts();
        match err {
            None => Ok(state),
            Some(source) => {
                state.bundles.extend(still_present);
                Err(ProviderError::PartialDelete {
                    still_present: state,
                    source,
                })
            }
        }
    }

    /// Delete every tracked bundle. Bundles that could not be deleted are
    /// returned in the error so they stay tracked.
    async fn delete(&self, state: &BundlesModel) -> Result<()> {
        let (still_present, err) =
            delete_bundles(&self.client, &state.tenant_id, state.bundles.clone())
                .await
                .into_parts();
        match err {
            None => Ok(()),
            Some(source) => {
                warn!(
                    "{} bundle(s) of tenant {} remain after delete",
                    still_present.len(),
                    state.tenant_id
                );
                Err(ProviderError::PartialDelete {
                    still_present: BundlesModel {
                        bundles: still_present,
                        ..state.clone()
                    },
                    source,
                })
            }
        }
    }

    /// Import by tenant id. Bundles cannot be listed, so none are tracked.
    async fn import(&self, id: &str) -> Result<ReadOutcome<BundlesModel>> {
        Ok(ReadOutcome::Present(BundlesModel {
            id: id.to_string(),
            tenant_id: id.to_string(),
            bundles: Vec::new(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{bundle, FakePermify};
    use std::time::Duration;
    use tonic::Status;

    fn model(tenant_id: &str, names: &[&str]) -> BundlesModel {
        BundlesModel {
            id: String::new(),
            tenant_id: tenant_id.into(),
            bundles: names.iter().map(|n| bundle(n)).collect(),
        }
    }

    #[tokio::test]
    async fn test_create_writes_all_and_sets_id() {
        let fake = FakePermify::new();
        let resource = BundlesResource::new(fake.clone());

        let state = resource.create(&model("t1", &["a", "b"])).await.unwrap();
        assert_eq!(state.id, "t1");
        assert_eq!(state.names(), vec!["a", "b"]);
        assert_eq!(fake.bundle_write_calls(), 1);
    }

    #[tokio::test]
    async fn test_read_follows_tracked_order() {
        let fake = FakePermify::new();
        let resource = BundlesResource::new(fake.clone());
        let state = resource.create(&model("t1", &["a", "b", "c"])).await.unwrap();
        fake.delay_bundle("a", Duration::from_millis(30));

        let refreshed = resource.read(&state).await.unwrap().into_option().unwrap();
        assert_eq!(refreshed, state);
    }

    #[tokio::test]
    async fn test_read_fails_when_any_bundle_fails() {
        let fake = FakePermify::new();
        let resource = BundlesResource::new(fake.clone());
        let state = resource.create(&model("t1", &["a", "b"])).await.unwrap();
        fake.fail_bundle_read("b", Status::internal("boom"));

        let err = resource.read(&state).await.unwrap_err();
        assert!(matches!(err, ProviderError::Batch(e) if e.failed_names() == vec!["b"]));
    }

    #[tokio::test]
    async fn test_update_deletes_dropped_bundles() {
        let fake = FakePermify::new();
        let resource = BundlesResource::new(fake.clone());
        let prior = resource.create(&model("t1", &["a", "b", "c"])).await.unwrap();

        let state = resource
            .update(&prior, &model("t1", &["c", "d"]))
            .await
            .unwrap();
        assert_eq!(state.names(), vec!["c", "d"]);
        assert_eq!(fake.stored_bundle("t1", "a"), None);
        assert_eq!(fake.stored_bundle("t1", "b"), None);
        assert_eq!(fake.stored_bundle("t1", "d"), Some(bundle("d")));
    }

    #[tokio::test]
    async fn test_update_without_removals_only_writes() {
        let fake = FakePermify::new();
        let resource = BundlesResource::new(fake.clone());
        let prior = resource.create(&model("t1", &["a"])).await.unwrap();

        resource.update(&prior, &model("t1", &["a", "b"])).await.unwrap();
        assert_eq!(fake.bundle_write_calls(), 2);
        assert_eq!(fake.bundle_delete_calls(), 0);
    }

    #[tokio::test]
    async fn test_update_partial_delete_keeps_failed_bundle() {
        let fake = FakePermify::new();
        let resource = BundlesResource::new(fake.clone());
        let prior = resource.create(&model("t1", &["a", "b", "c"])).await.unwrap();
        fake.fail_bundle_delete("b", Status::unavailable("down"));

        let err = resource
            .update(&prior, &model("t1", &["c"]))
            .await
            .unwrap_err();
        match err {
            ProviderError::PartialDelete {
                still_present,
                source,
            } => {
                assert_eq!(still_present.names(), vec!["c", "b"]);
                assert_eq!(source.failed_names(), vec!["b"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_update_tenant_change_requires_replace() {
        let resource = BundlesResource::new(FakePermify::new());
        let err = resource
            .update(&model("t1", &["a"]), &model("t2", &["a"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::RequiresReplace("tenant_id")));
    }

    #[tokio::test]
    async fn test_delete_partial_failure_returns_remaining_state() {
        let fake = FakePermify::new();
        let resource = BundlesResource::new(fake.clone());
        let state = resource.create(&model("t1", &["a", "b", "c"])).await.unwrap();
        fake.fail_bundle_delete("b", Status::internal("boom"));

        let err = resource.delete(&state).await.unwrap_err();
        match err {
            ProviderError::PartialDelete { still_present, .. } => {
                assert_eq!(still_present.id, "t1");
                assert_eq!(still_present.bundles, vec![bundle("b")]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_import_tracks_no_bundles() {
        let resource = BundlesResource::new(FakePermify::new());
        let state = resource.import("t1").await.unwrap().into_option().unwrap();
        assert_eq!(state.tenant_id, "t1");
        assert!(state.bundles.is_empty());
    }
}
