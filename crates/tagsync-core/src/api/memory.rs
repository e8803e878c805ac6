use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use tagsync_model::{Tag, TagCollection};
use tracing::trace;

use crate::api::{TagFilter, TagRef, TagUpsert, TagsApi, TagsApiError};

/// Remote operation kind, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    Describe,
    CreateOrUpdate,
    Delete,
}

/// Call received by [`InMemoryTagsApi`], recorded in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Describe(TagFilter),
    CreateOrUpdate(Vec<TagUpsert>),
    Delete(Vec<TagRef>),
}

impl ApiCall {
    pub fn operation(&self) -> ApiOperation {
        match self {
            ApiCall::Describe(_) => ApiOperation::Describe,
            ApiCall::CreateOrUpdate(_) => ApiOperation::CreateOrUpdate,
            ApiCall::Delete(_) => ApiOperation::Delete,
        }
    }
}

/// In-process tag store implementing [`TagsApi`].
///
/// Tags are kept per `(resource_type, resource_id)` in the order they were first created,
/// every call is recorded, and a failure can be armed per operation. An armed failure
/// fires once: the call is recorded, the store is left untouched and the error returned.
#[derive(Debug, Default)]
pub struct InMemoryTagsApi {
    store: Mutex<Vec<Tag>>,
    calls: Mutex<Vec<ApiCall>>,
    failures: Mutex<HashMap<ApiOperation, TagsApiError>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InMemoryTagsApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with tags owned by the given resource.
    ///
    /// Unset resource identity on the seeded tags is filled in.
    pub fn with_tags(self, resource_id: &str, resource_type: &str, tags: TagCollection) -> Self {
        {
            let mut store = lock(&self.store);
            for mut tag in tags {
                tag.resource_id.get_or_insert_with(|| resource_id.to_string());
                tag.resource_type.get_or_insert_with(|| resource_type.to_string());
                store.push(tag);
            }
        }
        self
    }

    /// Make the next call of `op` fail with `err`.
    pub fn fail_next(&self, op: ApiOperation, err: TagsApiError) {
        lock(&self.failures).insert(op, err);
    }

    /// Current tags of a resource, in store order.
    pub fn tags_of(&self, resource_id: &str, resource_type: &str) -> TagCollection {
        lock(&self.store)
            .iter()
            .filter(|t| owned_by(t, resource_id, resource_type))
            .cloned()
            .collect()
    }

    /// All calls received so far.
    pub fn calls(&self) -> Vec<ApiCall> {
        lock(&self.calls).clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    fn record(&self, call: ApiCall) -> Result<(), TagsApiError> {
        let op = call.operation();
        lock(&self.calls).push(call);
        match lock(&self.failures).remove(&op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn owned_by(tag: &Tag, resource_id: &str, resource_type: &str) -> bool {
    tag.resource_id.as_deref() == Some(resource_id)
        && tag.resource_type.as_deref() == Some(resource_type)
}

#[async_trait]
impl TagsApi for InMemoryTagsApi {
    async fn describe_tags(&self, filter: &TagFilter) -> Result<Vec<Tag>, TagsApiError> {
        self.record(ApiCall::Describe(filter.clone()))?;

        let store = lock(&self.store);
        let out: Vec<Tag> = store
            .iter()
            .filter(|t| {
                filter.matches(
                    t.resource_type.as_deref().unwrap_or_default(),
                    t.resource_id.as_deref().unwrap_or_default(),
                )
            })
            .cloned()
            .collect();
        trace!(filter = %filter.name, count = out.len(), "in-memory describe");
        Ok(out)
    }

    async fn create_or_update_tags(&self, tags: Vec<TagUpsert>) -> Result<(), TagsApiError> {
        self.record(ApiCall::CreateOrUpdate(tags.clone()))?;

        let mut store = lock(&self.store);
        for upsert in tags {
            let existing = store.iter_mut().find(|t| {
                t.key == upsert.key && owned_by(t, &upsert.resource_id, &upsert.resource_type)
            });
            match existing {
                Some(slot) => *slot = upsert.into(),
                None => store.push(upsert.into()),
            }
        }
        Ok(())
    }

    async fn delete_tags(&self, tags: Vec<TagRef>) -> Result<(), TagsApiError> {
        self.record(ApiCall::Delete(tags.clone()))?;

        let mut store = lock(&self.store);
        store.retain(|t| {
            !tags
                .iter()
                .any(|r| t.key == r.key && owned_by(t, &r.resource_id, &r.resource_type))
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASG: &str = "auto-scaling-group";

    fn upsert(key: &str, value: &str, id: &str) -> TagUpsert {
        TagUpsert {
            key: key.into(),
            value: Some(value.into()),
            propagate_at_launch: false,
            resource_id: id.into(),
            resource_type: ASG.into(),
        }
    }

    #[tokio::test]
    async fn describe_filters_by_resource() {
        let api = InMemoryTagsApi::new()
            .with_tags("a", ASG, vec![Tag::new("Name", "a")].into())
            .with_tags("b", ASG, vec![Tag::new("Name", "b")].into());

        let tags = api
            .describe_tags(&TagFilter::for_resource(ASG, "b"))
            .await
            .unwrap();

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].value(), Some("b"));
        assert_eq!(tags[0].resource_id.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn upsert_overwrites_in_place_and_appends_new() {
        let api = InMemoryTagsApi::new().with_tags(
            "a",
            ASG,
            vec![Tag::new("Name", "old"), Tag::new("Env", "dev")].into(),
        );

        api.create_or_update_tags(vec![upsert("Name", "new", "a"), upsert("Team", "x", "a")])
            .await
            .unwrap();

        let tags = api.tags_of("a", ASG);
        assert_eq!(tags.keys().collect::<Vec<_>>(), vec!["Name", "Env", "Team"]);
        assert_eq!(tags.get("Name").and_then(Tag::value), Some("new"));
        assert_eq!(tags.get("Name").and_then(|t| t.propagate_at_launch), Some(false));
    }

    #[tokio::test]
    async fn delete_only_touches_owning_resource() {
        let api = InMemoryTagsApi::new()
            .with_tags("a", ASG, vec![Tag::new("Env", "a")].into())
            .with_tags("b", ASG, vec![Tag::new("Env", "b")].into());

        api.delete_tags(vec![TagRef {
            key: "Env".into(),
            resource_id: "a".into(),
            resource_type: ASG.into(),
        }])
        .await
        .unwrap();

        assert!(api.tags_of("a", ASG).is_empty());
        assert_eq!(api.tags_of("b", ASG).len(), 1);
    }

    #[tokio::test]
    async fn armed_failure_fires_once_and_leaves_store_untouched() {
        let api = InMemoryTagsApi::new();
        api.fail_next(
            ApiOperation::CreateOrUpdate,
            TagsApiError::Throttled("slow down".into()),
        );

        let err = api
            .create_or_update_tags(vec![upsert("Name", "x", "a")])
            .await
            .unwrap_err();
        assert_eq!(err, TagsApiError::Throttled("slow down".into()));
        assert!(api.tags_of("a", ASG).is_empty());

        api.create_or_update_tags(vec![upsert("Name", "x", "a")])
            .await
            .unwrap();
        assert_eq!(api.tags_of("a", ASG).len(), 1);
        assert_eq!(api.calls().len(), 2);
    }
}
