//! Desired-vs-latest tag diff.
//!
//! The diff is keyed: a desired key missing remotely is added, a desired key whose tag
//! does not converge with the remote one is updated, and a remote key no longer desired
//! is deleted. The three sets never share a key.
use tagsync_model::{TagCollection, TagSet};

/// Operations needed to move `latest` to `desired`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDiff {
    /// Desired tags absent remotely, in desired order.
    pub to_add: TagCollection,
    /// Desired tags present remotely with a different value or flag, in desired order.
    pub to_update: TagCollection,
    /// Remote tags no longer desired, in latest order.
    pub to_delete: TagCollection,
}

impl TagDiff {
    /// Returns `true` if nothing has to change.
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }

    /// Tags to send with a create-or-update call: additions followed by updates.
    pub fn upserts(&self) -> TagCollection {
        self.to_add
            .iter()
            .chain(self.to_update.iter())
            .cloned()
            .collect()
    }
}

/// Compute the operations converging `latest` to `desired`.
///
/// When one side is empty the per-key comparison is skipped: everything on the other
/// side is added or deleted. The result is the same as the keyed comparison.
pub fn diff(desired: &TagCollection, latest: &TagCollection) -> TagDiff {
    if desired.is_empty() && !latest.is_empty() {
        return TagDiff {
            to_delete: TagSet::from_collection(latest).into_collection(),
            ..TagDiff::default()
        };
    }
    if latest.is_empty() && !desired.is_empty() {
        return TagDiff {
            to_add: TagSet::from_collection(desired).into_collection(),
            ..TagDiff::default()
        };
    }
    diff_general(desired, latest)
}

fn diff_general(desired: &TagCollection, latest: &TagCollection) -> TagDiff {
    let desired = TagSet::from_collection(desired);
    let latest = TagSet::from_collection(latest);
    let mut out = TagDiff::default();

    for tag in desired.iter() {
        match latest.get(tag.key()) {
            None => out.to_add.push(tag.clone()),
            Some(current) if !tag.converges_with(current) => out.to_update.push(tag.clone()),
            Some(_) => {}
        }
    }
    for tag in latest.iter() {
        if !desired.contains_key(tag.key()) {
            out.to_delete.push(tag.clone());
        }
    }
    out
}
