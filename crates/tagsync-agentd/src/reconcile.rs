use tagsync_core::{CoreError, ResourceSnapshot, ResourceTagger, SyncSummary, TagsApi};
use tracing::{info, instrument};

/// One reconcile pass over a single resource, calling the tag hooks in the order a
/// resource manager does.
///
/// Returns the sync summary and the resource as it would be persisted.
#[instrument(level = "info", skip_all, fields(resource = %desired.meta.name))]
pub async fn reconcile<A: TagsApi>(
    tagger: &ResourceTagger<A>,
    mut desired: ResourceSnapshot,
) -> Result<(SyncSummary, ResourceSnapshot), CoreError> {
    let resource_id = desired.resource_id.clone().unwrap_or_default();

    let mut latest = desired.clone();
    latest.tags = Some(tagger.get_tags(&resource_id).await);

    tagger.ensure_tags(Some(&mut desired))?;
    tagger.mirror_provider_tags(Some(&mut desired), Some(&latest));

    let summary = tagger.sync_tags(Some(&desired), Some(&latest)).await?;
    info!(
        added = summary.added,
        updated = summary.updated,
        deleted = summary.deleted,
        "tags reconciled"
    );

    tagger.filter_system_tags(Some(&mut desired));
    Ok((summary, desired))
}
