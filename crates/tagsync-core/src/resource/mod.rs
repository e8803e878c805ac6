//! Resource-level tag hooks.
//!
//! The resource manager owns the managed objects; this module only needs a narrow view
//! of them ([`TaggedResource`]) to read and replace their declared tags.
mod tagger;
pub use tagger::ResourceTagger;

use serde::{Deserialize, Serialize};
use tagsync_model::TagCollection;

/// Identity of the object that declares a resource, used to render default tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceMeta {
    pub namespace: String,
    pub name: String,
}

impl ResourceMeta {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

/// Narrow view of a managed resource as seen by the tag hooks.
pub trait TaggedResource {
    /// Remote identifier (e.g. the group name), if known.
    fn resource_id(&self) -> Option<&str>;

    /// Declared tags; `None` when the resource leaves them unset.
    fn tags(&self) -> Option<&TagCollection>;

    /// Replace the declared tags.
    fn set_tags(&mut self, tags: TagCollection);

    /// Identity of the declaring object.
    fn meta(&self) -> &ResourceMeta;
}

/// Plain owned [`TaggedResource`], e.g. a desired or latest copy of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceSnapshot {
    pub meta: ResourceMeta,
    #[serde(rename = "resourceID", skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagCollection>,
}

impl ResourceSnapshot {
    pub fn new(meta: ResourceMeta) -> Self {
        Self {
            meta,
            ..Default::default()
        }
    }

    pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    pub fn with_tags(mut self, tags: impl Into<TagCollection>) -> Self {
        self.tags = Some(tags.into());
        self
    }
}

impl TaggedResource for ResourceSnapshot {
    fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    fn tags(&self) -> Option<&TagCollection> {
        self.tags.as_ref()
    }

    fn set_tags(&mut self, tags: TagCollection) {
        self.tags = Some(tags);
    }

    fn meta(&self) -> &ResourceMeta {
        &self.meta
    }
}
