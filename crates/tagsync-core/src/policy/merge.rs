use tagsync_model::{TagCollection, TagSet};

/// Merge default tags into the tags declared on a resource.
///
/// A declared tag always wins on key collision. Defaults are appended after the declared
/// tags, in their own order, only for keys the resource does not declare.
pub fn merge_default_tags(resource_tags: &TagCollection, defaults: &TagCollection) -> TagCollection {
    let mut merged = TagSet::from_collection(resource_tags);
    for tag in TagSet::from_collection(defaults).iter() {
        merged.insert_if_absent(tag.clone());
    }
    merged.into_collection()
}
