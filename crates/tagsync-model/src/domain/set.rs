use std::collections::HashMap;

use crate::{Tag, TagCollection};

/// Keyed view over a [`TagCollection`] that remembers the source key order.
///
/// Lookups go through a plain `key -> Tag` map; `order` records the position of every
/// key so the set converts back into a collection without reshuffling user tags.
/// Keys inserted after construction are appended to the order in insertion order.
///
/// A set never holds two entries for the same key.
#[derive(Debug, Clone, Default)]
pub struct TagSet {
    entries: HashMap<String, Tag>,
    order: Vec<String>,
}

impl TagSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a collection by key.
    ///
    /// A repeated key keeps the position of its first occurrence and the value of its
    /// last one. Tags with an empty key have no identity and are skipped.
    pub fn from_collection(tags: &TagCollection) -> Self {
        let mut set = Self::new();
        for tag in tags.iter().filter(|t| !t.key.is_empty()) {
            set.insert(tag.clone());
        }
        set
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.entries.get(key)
    }

    /// Insert or overwrite a tag, returning the previous entry for the key.
    ///
    /// Overwriting keeps the key's current position.
    pub fn insert(&mut self, tag: Tag) -> Option<Tag> {
        if !self.entries.contains_key(&tag.key) {
            self.order.push(tag.key.clone());
        }
        self.entries.insert(tag.key.clone(), tag)
    }

    /// Insert a tag only when its key is not present yet.
    ///
    /// Returns `true` if the tag was inserted.
    pub fn insert_if_absent(&mut self, tag: Tag) -> bool {
        if self.entries.contains_key(&tag.key) {
            return false;
        }
        self.insert(tag);
        true
    }

    /// Remove a key, returning its tag.
    pub fn remove(&mut self, key: &str) -> Option<Tag> {
        let removed = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }

    /// Keep only the tags for which `keep` returns `true`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Tag) -> bool,
    {
        self.entries.retain(|_, tag| keep(tag));
        let entries = &self.entries;
        self.order.retain(|k| entries.contains_key(k));
    }

    /// Iterate over keys in recorded order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Iterate over tags in recorded order.
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.order.iter().filter_map(|k| self.entries.get(k))
    }

    /// Convert back into an ordered collection.
    ///
    /// Keys come out in recorded order; any entry missing from the order is appended
    /// afterwards.
    pub fn into_collection(self) -> TagCollection {
        let Self { mut entries, order } = self;
        let mut out = Vec::with_capacity(entries.len());
        for key in order {
            if let Some(tag) = entries.remove(&key) {
                out.push(tag);
            }
        }
        out.extend(entries.into_values());
        TagCollection(out)
    }

    /// Returns `true` if both sets hold the same keys and every pair of tags converges.
    pub fn equivalent(&self, other: &TagSet) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.entries.iter().all(|(key, tag)| {
            other
                .entries
                .get(key)
                .is_some_and(|theirs| tag.converges_with(theirs))
        })
    }
}

impl From<&TagCollection> for TagSet {
    fn from(tags: &TagCollection) -> Self {
        Self::from_collection(tags)
    }
}

impl From<TagSet> for TagCollection {
    fn from(set: TagSet) -> Self {
        set.into_collection()
    }
}
