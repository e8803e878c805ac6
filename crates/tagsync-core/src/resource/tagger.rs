use tagsync_model::TagCollection;
use tracing::{debug, instrument, warn};

use crate::{
    api::TagsApi,
    config::TagConfig,
    error::CoreError,
    metrics::{MetricsHandle, noop_metrics},
    policy::{SystemTagPolicy, filter_system_tags, merge_default_tags, mirror_provider_tags},
    resource::TaggedResource,
    syncer::{SyncSummary, Syncer},
};

/// Tag hooks called by a resource manager at fixed points of its reconcile pass.
///
/// - [`ResourceTagger::ensure_tags`] before the desired resource is compared;
/// - [`ResourceTagger::filter_system_tags`] before a resource is persisted;
/// - [`ResourceTagger::mirror_provider_tags`] right after the latest state is fetched;
/// - [`ResourceTagger::get_tags`] / [`ResourceTagger::sync_tags`] to read and apply.
pub struct ResourceTagger<A> {
    syncer: Syncer<A>,
    config: TagConfig,
    policy: SystemTagPolicy,
    metrics: MetricsHandle,
}

impl<A: TagsApi> ResourceTagger<A> {
    /// Build hooks for one resource kind. Fails on an invalid config.
    pub fn new(api: A, config: TagConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let policy = config.system_policy();
        Ok(Self {
            syncer: Syncer::new(api),
            config,
            policy,
            metrics: noop_metrics(),
        })
    }

    /// Replace the metrics backend and return the updated tagger.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.syncer = self.syncer.with_metrics(metrics.clone());
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &TagConfig {
        &self.config
    }

    pub fn syncer(&self) -> &Syncer<A> {
        &self.syncer
    }

    /// Best-effort read of the remote tags.
    ///
    /// Tags are not critical to read: a describe failure is logged and counted, and an
    /// empty collection is returned so the pass can go on. The next pass retries.
    pub async fn get_tags(&self, resource_id: &str) -> TagCollection {
        match self
            .syncer
            .get_tags(resource_id, &self.config.resource_type)
            .await
        {
            Ok(tags) => tags,
            Err(e) => {
                warn!(error = %e, resource_id, "failed to get tags");
                self.metrics
                    .record_describe_failure(&self.config.resource_type);
                TagCollection::new()
            }
        }
    }

    /// Converge the remote tags of `latest` to the tags declared on `desired`.
    ///
    /// Both resources must be present. When neither declares tags the call is a no-op.
    /// The remote identifier is taken from `latest`.
    #[instrument(level = "debug", skip_all, fields(resource_type = %self.config.resource_type))]
    pub async fn sync_tags<R: TaggedResource>(
        &self,
        desired: Option<&R>,
        latest: Option<&R>,
    ) -> Result<SyncSummary, CoreError> {
        let (Some(desired), Some(latest)) = (desired, latest) else {
            return Err(CoreError::InvariantViolation(
                "sync_tags received a missing resource".into(),
            ));
        };
        if desired.tags().is_none() && latest.tags().is_none() {
            return Ok(SyncSummary::default());
        }

        let empty = TagCollection::new();
        let resource_id = latest.resource_id().unwrap_or_default();
        self.syncer
            .sync(
                desired.tags().unwrap_or(&empty),
                latest.tags().unwrap_or(&empty),
                resource_id,
                &self.config.resource_type,
            )
            .await
    }

    /// Merge the rendered default tags into the resource's declared tags.
    ///
    /// Declared tags always win. A missing resource is a caller bug.
    pub fn ensure_tags<R: TaggedResource>(&self, res: Option<&mut R>) -> Result<(), CoreError> {
        let Some(res) = res else {
            return Err(CoreError::InvariantViolation(
                "ensure_tags received a missing resource".into(),
            ));
        };

        let defaults = self
            .config
            .default_tags
            .resolve(&self.config.template_context(res.meta()))?;
        let declared = res.tags().cloned().unwrap_or_default();
        let merged = merge_default_tags(&declared, &defaults);

        debug!(
            declared = declared.len(),
            merged = merged.len(),
            "default tags ensured"
        );
        res.set_tags(merged);
        Ok(())
    }

    /// Drop reserved and system-managed tags from the resource's declared tags.
    ///
    /// No-op when the resource or its tags are missing.
    pub fn filter_system_tags<R: TaggedResource>(&self, res: Option<&mut R>) {
        let Some(res) = res else { return };
        let Some(tags) = res.tags() else { return };

        let filtered = filter_system_tags(tags, &self.policy);
        res.set_tags(filtered);
    }

    /// Copy provider-owned tags of `latest` into `desired`.
    ///
    /// No-op when either resource is missing. Unset tags on either side count as empty;
    /// `desired` keeps unset tags when nothing was mirrored into it.
    pub fn mirror_provider_tags<R: TaggedResource>(&self, desired: Option<&mut R>, latest: Option<&R>) {
        let (Some(desired), Some(latest)) = (desired, latest) else {
            return;
        };

        let empty = TagCollection::new();
        let mirrored = mirror_provider_tags(
            desired.tags().unwrap_or(&empty),
            latest.tags().unwrap_or(&empty),
            &self.config.reserved_prefix,
        );
        if desired.tags().is_some() || !mirrored.is_empty() {
            desired.set_tags(mirrored);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        api::{ApiOperation, InMemoryTagsApi, TagsApiError},
        defaults::DefaultTags,
        metrics::testing::RecordingMetrics,
        resource::{ResourceMeta, ResourceSnapshot},
    };
    use tagsync_model::Tag;

    const ASG: &str = "auto-scaling-group";

    fn tags(pairs: &[(&str, &str)]) -> TagCollection {
        pairs.iter().map(|(k, v)| Tag::new(*k, *v)).collect()
    }

    fn snapshot(pairs: &[(&str, &str)]) -> ResourceSnapshot {
        ResourceSnapshot::new(ResourceMeta::new("prod", "web"))
            .with_resource_id("web-asg")
            .with_tags(tags(pairs))
    }

    fn config() -> TagConfig {
        TagConfig {
            system_tags: vec!["Team".into()],
            controller_version: "1.0.0".into(),
            ..Default::default()
        }
    }

    fn tagger(api: Arc<InMemoryTagsApi>) -> ResourceTagger<Arc<InMemoryTagsApi>> {
        ResourceTagger::new(api, config()).unwrap()
    }

    #[test]
    fn new_rejects_invalid_config() {
        let cfg = TagConfig {
            reserved_prefix: String::new(),
            ..Default::default()
        };
        assert!(ResourceTagger::new(InMemoryTagsApi::new(), cfg).is_err());
    }

    #[tokio::test]
    async fn get_tags_downgrades_describe_failure() {
        let api = Arc::new(InMemoryTagsApi::new().with_tags("web-asg", ASG, tags(&[("A", "1")])));
        api.fail_next(ApiOperation::Describe, TagsApiError::Transport("timeout".into()));
        let metrics = Arc::new(RecordingMetrics::default());
        let t = tagger(api.clone()).with_metrics(metrics.clone());

        assert!(t.get_tags("web-asg").await.is_empty());
        assert_eq!(metrics.events(), vec!["describe-failed:auto-scaling-group"]);

        assert_eq!(t.get_tags("web-asg").await.len(), 1);
    }

    #[tokio::test]
    async fn sync_tags_requires_both_resources() {
        let t = tagger(Arc::new(InMemoryTagsApi::new()));
        let res = snapshot(&[]);

        let err = t.sync_tags(Some(&res), None).await.unwrap_err();
        assert!(matches!(err, CoreError::InvariantViolation(_)));

        let err = t.sync_tags::<ResourceSnapshot>(None, Some(&res)).await.unwrap_err();
        assert!(matches!(err, CoreError::InvariantViolation(_)));
    }

    #[tokio::test]
    async fn sync_tags_without_any_tags_is_noop() {
        let api = Arc::new(InMemoryTagsApi::new());
        let t = tagger(api.clone());
        let res = ResourceSnapshot::new(ResourceMeta::default()).with_resource_id("web-asg");

        let summary = t.sync_tags(Some(&res), Some(&res)).await.unwrap();

        assert!(summary.is_noop());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn sync_tags_uses_latest_identity() {
        let api = Arc::new(InMemoryTagsApi::new());
        let t = tagger(api.clone());
        let desired = ResourceSnapshot::new(ResourceMeta::default()).with_tags(tags(&[("Name", "web")]));
        let latest = ResourceSnapshot::new(ResourceMeta::default()).with_resource_id("web-asg");

        let summary = t.sync_tags(Some(&desired), Some(&latest)).await.unwrap();

        assert_eq!(summary.added, 1);
        let stored = api.tags_of("web-asg", ASG);
        assert_eq!(stored.get("Name").and_then(Tag::value), Some("web"));
        assert_eq!(stored.get("Name").and_then(|t| t.propagate_at_launch), Some(false));
    }

    #[test]
    fn ensure_tags_merges_rendered_defaults() {
        let t = tagger(Arc::new(InMemoryTagsApi::new()));
        let mut res = snapshot(&[("Name", "web"), ("services.k8s.aws/namespace", "mine")]);

        t.ensure_tags(Some(&mut res)).unwrap();

        let got = res.tags.unwrap();
        assert_eq!(
            got.keys().collect::<Vec<_>>(),
            vec![
                "Name",
                "services.k8s.aws/namespace",
                "services.k8s.aws/controller-version"
            ]
        );
        assert_eq!(
            got.get("services.k8s.aws/namespace").and_then(Tag::value),
            Some("mine")
        );
        assert_eq!(
            got.get("services.k8s.aws/controller-version")
                .and_then(Tag::value),
            Some("autoscaling-1.0.0")
        );
    }

    #[test]
    fn ensure_tags_sets_defaults_on_untagged_resource() {
        let cfg = TagConfig {
            default_tags: DefaultTags::new(["owner=%K8S_RESOURCE_NAME%"]),
            ..Default::default()
        };
        let t = ResourceTagger::new(InMemoryTagsApi::new(), cfg).unwrap();
        let mut res = ResourceSnapshot::new(ResourceMeta::new("prod", "web"));

        t.ensure_tags(Some(&mut res)).unwrap();

        assert_eq!(
            res.tags,
            Some(TagCollection::from(vec![
                Tag::new("owner", "web").with_propagate_at_launch(false)
            ]))
        );
    }

    #[test]
    fn ensure_tags_rejects_missing_resource() {
        let t = tagger(Arc::new(InMemoryTagsApi::new()));
        let err = t.ensure_tags::<ResourceSnapshot>(None).unwrap_err();
        assert!(matches!(err, CoreError::InvariantViolation(_)));
    }

    #[test]
    fn filter_system_tags_uses_configured_keys() {
        let t = tagger(Arc::new(InMemoryTagsApi::new()));
        let mut res = snapshot(&[("aws:owner", "x"), ("Team", "y"), ("Name", "web")]);

        t.filter_system_tags(Some(&mut res));
        assert_eq!(res.tags, Some(tags(&[("Name", "web")])));

        let mut untagged = ResourceSnapshot::default();
        t.filter_system_tags(Some(&mut untagged));
        assert!(untagged.tags.is_none());

        t.filter_system_tags::<ResourceSnapshot>(None);
    }

    #[test]
    fn mirror_provider_tags_copies_prefixed_keys() {
        let t = tagger(Arc::new(InMemoryTagsApi::new()));
        let mut desired = snapshot(&[("Name", "n")]);
        let latest = snapshot(&[("Name", "other"), ("aws:cdk:id", "z")]);

        t.mirror_provider_tags(Some(&mut desired), Some(&latest));

        assert_eq!(desired.tags, Some(tags(&[("Name", "n"), ("aws:cdk:id", "z")])));
    }

    #[test]
    fn mirror_provider_tags_keeps_unset_tags_when_nothing_mirrored() {
        let t = tagger(Arc::new(InMemoryTagsApi::new()));
        let mut desired = ResourceSnapshot::default();
        let latest = snapshot(&[("Name", "n")]);

        t.mirror_provider_tags(Some(&mut desired), Some(&latest));
        assert!(desired.tags.is_none());

        t.mirror_provider_tags(Some(&mut desired), None);
        t.mirror_provider_tags::<ResourceSnapshot>(None, Some(&latest));
        assert!(desired.tags.is_none());
    }
}
