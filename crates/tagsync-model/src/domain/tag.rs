use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[cfg(feature = "schema")]
use schemars::JsonSchema;

use crate::error::{ModelError, ModelResult};

/// Single tag attached to a remote resource.
///
/// The key is the identity of a tag: two tags with the same key inside one collection
/// describe the same remote tag. Everything else is optional because the declared
/// resource and the remote API may both leave fields unset.
///
/// `resource_id` / `resource_type` are ownership metadata. They are filled in with the
/// owning resource identity when a tag is sent to the remote API and are ignored when
/// two tags are compared (see [`Tag::converges_with`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Whether instances launched by the group inherit the tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub propagate_at_launch: Option<bool>,
    /// Identifier of the resource the tag belongs to.
    #[serde(default, rename = "resourceID", skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// Type of the resource the tag belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

impl Tag {
    /// Create a tag with a key and a value, leaving all other fields unset.
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            key: key.into(),
            value: Some(value.into()),
            propagate_at_launch: None,
            resource_id: None,
            resource_type: None,
        }
    }

    /// Create a tag carrying only a key.
    pub fn key_only(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
            propagate_at_launch: None,
            resource_id: None,
            resource_type: None,
        }
    }

    /// Set the propagate-at-launch flag and return the updated tag.
    pub fn with_propagate_at_launch(mut self, propagate: bool) -> Self {
        self.propagate_at_launch = Some(propagate);
        self
    }

    /// Attach owning resource identity and return the updated tag.
    pub fn with_resource<I, T>(mut self, resource_id: I, resource_type: T) -> Self
    where
        I: Into<String>,
        T: Into<String>,
    {
        self.resource_id = Some(resource_id.into());
        self.resource_type = Some(resource_type.into());
        self
    }

    /// Tag key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Tag value, if set.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns `true` if the key lives under the given reserved prefix.
    pub fn is_provider_owned(&self, prefix: &str) -> bool {
        self.key.starts_with(prefix)
    }

    /// Value-level equality used by reconciliation.
    ///
    /// Two tags converge when their values and propagate-at-launch flags are both unset
    /// or both set and equal. Keys are assumed to be aligned by the caller; resource
    /// identity is not compared.
    pub fn converges_with(&self, other: &Tag) -> bool {
        self.value == other.value && self.propagate_at_launch == other.propagate_at_launch
    }
}

/// Compare two optional tags with [`Tag::converges_with`].
///
/// Two missing tags are equal; a missing tag never equals a present one.
pub fn tags_equal(a: Option<&Tag>, b: Option<&Tag>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.converges_with(b),
        (None, None) => true,
        _ => false,
    }
}

impl FromStr for Tag {
    type Err = ModelError;

    /// Parse `key=value`. Everything after the first `=` is the value.
    fn from_str(s: &str) -> ModelResult<Self> {
        let Some((key, value)) = s.split_once('=') else {
            return Err(ModelError::InvalidTag {
                input: s.to_string(),
                reason: "expected key=value",
            });
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(ModelError::InvalidTag {
                input: s.to_string(),
                reason: "empty key",
            });
        }
        Ok(Tag::new(key, value))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value.as_deref().unwrap_or(""))
    }
}
