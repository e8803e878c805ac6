use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tagsync_model::{AWS_RESERVED_PREFIX, TagCollection, TagSet};

/// Which tag keys belong to the system rather than the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemTagPolicy {
    /// Keys under this prefix are owned by the provider.
    pub reserved_prefix: String,
    /// Additional exact keys managed by the operator.
    pub system_keys: BTreeSet<String>,
}

impl SystemTagPolicy {
    pub fn new<I, K>(reserved_prefix: impl Into<String>, system_keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            reserved_prefix: reserved_prefix.into(),
            system_keys: system_keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if the key is reserved or system-managed.
    pub fn is_system(&self, key: &str) -> bool {
        key.starts_with(&self.reserved_prefix) || self.system_keys.contains(key)
    }
}

impl Default for SystemTagPolicy {
    fn default() -> Self {
        Self::new(AWS_RESERVED_PREFIX, Vec::<String>::new())
    }
}

/// Remove reserved-prefix and system-managed tags, keeping the order of the rest.
///
/// Applied before a collection is persisted on the desired resource. Idempotent.
pub fn filter_system_tags(tags: &TagCollection, policy: &SystemTagPolicy) -> TagCollection {
    let mut set = TagSet::from_collection(tags);
    set.retain(|t| !policy.is_system(t.key()));
    set.into_collection()
}
