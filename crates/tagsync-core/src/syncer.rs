//! Applies a tag diff against the remote tagging API.
use tagsync_model::{Tag, TagCollection};
use tracing::{debug, instrument, trace};

use crate::{
    api::{TagFilter, TagRef, TagUpsert, TagsApi},
    diff::diff,
    error::CoreError,
    metrics::{MetricsHandle, SyncStage, noop_metrics},
};

/// Number of tags touched by a sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub added: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl SyncSummary {
    /// Returns `true` if the pass issued no remote writes.
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.updated == 0 && self.deleted == 0
    }
}

/// Converges the tags of one remote resource.
///
/// A sync pass issues at most two remote calls: one batched delete, then one batched
/// create-or-update. Deletes always go first so that a retried pass after a failed
/// upsert never resurrects stale tags.
pub struct Syncer<A> {
    api: A,
    metrics: MetricsHandle,
}

impl<A: TagsApi> Syncer<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            metrics: noop_metrics(),
        }
    }

    /// Replace the metrics backend and return the updated syncer.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetch the current tags of a resource.
    ///
    /// Errors are returned to the caller; [`crate::ResourceTagger::get_tags`] is the
    /// best-effort variant that logs and returns an empty collection instead.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_tags(
        &self,
        resource_id: &str,
        resource_type: &str,
    ) -> Result<TagCollection, CoreError> {
        let filter = TagFilter::for_resource(resource_type, resource_id);
        let tags = self.api.describe_tags(&filter).await?;

        trace!(count = tags.len(), "described remote tags");
        Ok(tags.into())
    }

    /// Converge the remote tags of `resource_id` from `latest` to `desired`.
    ///
    /// Unset resource identity on outgoing tags is filled with `resource_id` and
    /// `resource_type`. The first remote failure aborts the pass and is returned as is.
    #[instrument(level = "debug", skip(self, desired, latest), fields(desired = desired.len(), latest = latest.len()))]
    pub async fn sync(
        &self,
        desired: &TagCollection,
        latest: &TagCollection,
        resource_id: &str,
        resource_type: &str,
    ) -> Result<SyncSummary, CoreError> {
        let plan = diff(desired, latest);
        let summary = SyncSummary {
            added: plan.to_add.len(),
            updated: plan.to_update.len(),
            deleted: plan.to_delete.len(),
        };

        if plan.is_empty() {
            trace!("remote tags already converged");
            self.metrics.record_sync(resource_type, &summary);
            return Ok(summary);
        }
        debug!(
            add = summary.added,
            update = summary.updated,
            delete = summary.deleted,
            "tag plan computed"
        );

        if !plan.to_delete.is_empty() {
            let refs = delete_request(&plan.to_delete, resource_id, resource_type);
            trace!(keys = ?refs.iter().map(|r| r.key.as_str()).collect::<Vec<_>>(), "deleting tags");
            if let Err(e) = self.api.delete_tags(refs).await {
                self.metrics.record_sync_error(resource_type, SyncStage::Delete);
                return Err(e.into());
            }
        }

        let upserts = plan.upserts();
        if !upserts.is_empty() {
            let tags = upsert_request(&upserts, resource_id, resource_type);
            trace!(keys = ?tags.iter().map(|t| t.key.as_str()).collect::<Vec<_>>(), "upserting tags");
            if let Err(e) = self.api.create_or_update_tags(tags).await {
                self.metrics.record_sync_error(resource_type, SyncStage::Upsert);
                return Err(e.into());
            }
        }

        self.metrics.record_sync(resource_type, &summary);
        Ok(summary)
    }
}

fn upsert_request(tags: &TagCollection, resource_id: &str, resource_type: &str) -> Vec<TagUpsert> {
    tags.iter()
        .map(|t| TagUpsert {
            key: t.key.clone(),
            value: t.value.clone(),
            propagate_at_launch: t.propagate_at_launch.unwrap_or(false),
            resource_id: owner_id(t, resource_id),
            resource_type: owner_type(t, resource_type),
        })
        .collect()
}

fn delete_request(tags: &TagCollection, resource_id: &str, resource_type: &str) -> Vec<TagRef> {
    tags.iter()
        .map(|t| TagRef {
            key: t.key.clone(),
            resource_id: owner_id(t, resource_id),
            resource_type: owner_type(t, resource_type),
        })
        .collect()
}

fn owner_id(tag: &Tag, fallback: &str) -> String {
    tag.resource_id.as_deref().unwrap_or(fallback).to_string()
}

fn owner_type(tag: &Tag, fallback: &str) -> String {
    tag.resource_type.as_deref().unwrap_or(fallback).to_string()
}
