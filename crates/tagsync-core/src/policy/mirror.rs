use tagsync_model::{TagCollection, TagSet};

/// Copy provider-owned tags from the live resource into the desired collection.
///
/// Every `latest` tag whose key starts with `prefix` is inserted into `desired`,
/// overwriting an existing entry with the same key. Desired order is preserved and new
/// keys are appended in `latest` order. Tags outside the prefix are never touched, and
/// nothing flows from `desired` to `latest`.
pub fn mirror_provider_tags(
    desired: &TagCollection,
    latest: &TagCollection,
    prefix: &str,
) -> TagCollection {
    let mut out = TagSet::from_collection(desired);
    for tag in TagSet::from_collection(latest)
        .iter()
        .filter(|t| t.is_provider_owned(prefix))
    {
        out.insert(tag.clone());
    }
    out.into_collection()
}
