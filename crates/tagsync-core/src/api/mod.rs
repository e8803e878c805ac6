//! Remote tagging capability consumed by the [`crate::Syncer`].
//!
//! The real network client lives outside this workspace; anything able to describe,
//! upsert and delete tags implements [`TagsApi`] and can be plugged in.
//! [`InMemoryTagsApi`] is the in-process implementation used by tests and the demo agent.
mod error;
pub use error::TagsApiError;

mod memory;
pub use memory::{ApiCall, ApiOperation, InMemoryTagsApi};

use std::sync::Arc;

use async_trait::async_trait;
use tagsync_model::Tag;

/// Describe filter: resources of type `name` whose identifier is one of `values`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    pub name: String,
    pub values: Vec<String>,
}

impl TagFilter {
    /// Filter selecting the tags of a single resource.
    pub fn for_resource(resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            name: resource_type.into(),
            values: vec![resource_id.into()],
        }
    }

    pub fn matches(&self, resource_type: &str, resource_id: &str) -> bool {
        self.name == resource_type && self.values.iter().any(|v| v == resource_id)
    }
}

/// Fully populated tag sent with a create-or-update call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagUpsert {
    pub key: String,
    pub value: Option<String>,
    pub propagate_at_launch: bool,
    pub resource_id: String,
    pub resource_type: String,
}

impl From<TagUpsert> for Tag {
    fn from(u: TagUpsert) -> Self {
        Tag {
            key: u.key,
            value: u.value,
            propagate_at_launch: Some(u.propagate_at_launch),
            resource_id: Some(u.resource_id),
            resource_type: Some(u.resource_type),
        }
    }
}

/// Reference to a remote tag sent with a delete call. Values are irrelevant for deletes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    pub key: String,
    pub resource_id: String,
    pub resource_type: String,
}

/// Remote tagging API.
///
/// Implementations perform exactly one remote call per method and never retry:
/// retries belong to the reconciliation loop that drives the core.
#[async_trait]
pub trait TagsApi: Send + Sync {
    /// List tags matching the filter, in the order the remote store returns them.
    async fn describe_tags(&self, filter: &TagFilter) -> Result<Vec<Tag>, TagsApiError>;

    /// Create the given tags or overwrite them when the key already exists.
    async fn create_or_update_tags(&self, tags: Vec<TagUpsert>) -> Result<(), TagsApiError>;

    /// Remove the given tags.
    async fn delete_tags(&self, tags: Vec<TagRef>) -> Result<(), TagsApiError>;
}

#[async_trait]
impl<T> TagsApi for Arc<T>
where
    T: TagsApi + ?Sized,
{
    async fn describe_tags(&self, filter: &TagFilter) -> Result<Vec<Tag>, TagsApiError> {
        (**self).describe_tags(filter).await
    }

    async fn create_or_update_tags(&self, tags: Vec<TagUpsert>) -> Result<(), TagsApiError> {
        (**self).create_or_update_tags(tags).await
    }

    async fn delete_tags(&self, tags: Vec<TagRef>) -> Result<(), TagsApiError> {
        (**self).delete_tags(tags).await
    }
}
