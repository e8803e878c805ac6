use serde::{Deserialize, Serialize};

#[cfg(feature = "schema")]
use schemars::JsonSchema;

use crate::Tag;

/// Ordered list of tags as declared on a resource or returned by the remote API.
///
/// Order is kept for output stability only; identity is by key.
/// Serialized as a transparent array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(transparent)]
pub struct TagCollection(pub Vec<Tag>);

impl TagCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a tag at the end.
    pub fn push(&mut self, tag: Tag) {
        self.0.push(tag);
    }

    /// Iterate over tags in order.
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }

    /// Iterate over keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|t| t.key())
    }

    /// Find the last tag with the given key.
    ///
    /// Matches the last-write-wins rule used when a collection is indexed by key.
    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.0.iter().rev().find(|t| t.key() == key)
    }

    /// Returns the inner vector.
    pub fn into_inner(self) -> Vec<Tag> {
        self.0
    }
}

impl From<Vec<Tag>> for TagCollection {
    fn from(tags: Vec<Tag>) -> Self {
        Self(tags)
    }
}

impl FromIterator<Tag> for TagCollection {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Tag> for TagCollection {
    fn extend<I: IntoIterator<Item = Tag>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for TagCollection {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TagCollection {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_last_duplicate() {
        let c: TagCollection = vec![Tag::new("A", "1"), Tag::new("B", "2"), Tag::new("A", "3")].into();

        assert_eq!(c.get("A").and_then(Tag::value), Some("3"));
        assert_eq!(c.get("B").and_then(Tag::value), Some("2"));
        assert!(c.get("C").is_none());
    }

    #[test]
    fn keys_follow_insertion_order() {
        let mut c = TagCollection::new();
        c.push(Tag::new("Z", "1"));
        c.push(Tag::new("A", "2"));

        assert_eq!(c.keys().collect::<Vec<_>>(), vec!["Z", "A"]);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn serde_transparent_array() {
        let c: TagCollection = vec![Tag::new("Name", "web").with_propagate_at_launch(false)].into();

        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(
            json,
            r#"[{"key":"Name","value":"web","propagateAtLaunch":false}]"#
        );

        let back: TagCollection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
