use std::sync::Arc;

use tagsync_core::{
    InMemoryTagsApi, SystemTagPolicy, Syncer, TagRef, TagUpsert, api::ApiCall,
    filter_system_tags, merge_default_tags, mirror_provider_tags,
};
use tagsync_model::{Tag, TagCollection};

const RESOURCE_ID: &str = "test-asg";
const RESOURCE_TYPE: &str = "auto-scaling-group";

fn propagated(pairs: &[(&str, &str)]) -> TagCollection {
    pairs
        .iter()
        .map(|(k, v)| Tag::new(*k, *v).with_propagate_at_launch(true))
        .collect()
}

fn plain(pairs: &[(&str, &str)]) -> TagCollection {
    pairs.iter().map(|(k, v)| Tag::new(*k, *v)).collect()
}

fn upsert(key: &str, value: &str) -> TagUpsert {
    TagUpsert {
        key: key.into(),
        value: Some(value.into()),
        propagate_at_launch: true,
        resource_id: RESOURCE_ID.into(),
        resource_type: RESOURCE_TYPE.into(),
    }
}

fn tag_ref(key: &str) -> TagRef {
    TagRef {
        key: key.into(),
        resource_id: RESOURCE_ID.into(),
        resource_type: RESOURCE_TYPE.into(),
    }
}

#[tokio::test]
async fn empty_desired_deletes_everything_in_one_call() {
    let latest = propagated(&[("Name", "test-asg"), ("Env", "test")]);
    let api = Arc::new(InMemoryTagsApi::new().with_tags(RESOURCE_ID, RESOURCE_TYPE, latest.clone()));
    let syncer = Syncer::new(api.clone());

    syncer
        .sync(&TagCollection::new(), &latest, RESOURCE_ID, RESOURCE_TYPE)
        .await
        .unwrap();

    assert_eq!(
        api.calls(),
        vec![ApiCall::Delete(vec![tag_ref("Name"), tag_ref("Env")])]
    );
    assert!(api.tags_of(RESOURCE_ID, RESOURCE_TYPE).is_empty());
}

#[tokio::test]
async fn empty_latest_creates_everything_in_one_call() {
    let desired = propagated(&[("Name", "test-asg"), ("Env", "test")]);
    let api = Arc::new(InMemoryTagsApi::new());
    let syncer = Syncer::new(api.clone());

    syncer
        .sync(&desired, &TagCollection::new(), RESOURCE_ID, RESOURCE_TYPE)
        .await
        .unwrap();

    assert_eq!(
        api.calls(),
        vec![ApiCall::CreateOrUpdate(vec![
            upsert("Name", "test-asg"),
            upsert("Env", "test"),
        ])]
    );
}

#[tokio::test]
async fn mixed_pass_deletes_then_upserts() {
    let desired = propagated(&[("Name", "updated-asg"), ("NewTag", "new-value")]);
    let latest = propagated(&[("Name", "test-asg"), ("Env", "test")]);
    let api = Arc::new(InMemoryTagsApi::new().with_tags(RESOURCE_ID, RESOURCE_TYPE, latest.clone()));
    let syncer = Syncer::new(api.clone());

    let summary = syncer
        .sync(&desired, &latest, RESOURCE_ID, RESOURCE_TYPE)
        .await
        .unwrap();

    assert_eq!((summary.added, summary.updated, summary.deleted), (1, 1, 1));

    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], ApiCall::Delete(vec![tag_ref("Env")]));
    match &calls[1] {
        ApiCall::CreateOrUpdate(tags) => {
            let mut got: Vec<_> = tags.iter().map(|t| (t.key.as_str(), t.value.as_deref())).collect();
            got.sort();
            assert_eq!(
                got,
                vec![("Name", Some("updated-asg")), ("NewTag", Some("new-value"))]
            );
        }
        other => panic!("expected create-or-update call, got {other:?}"),
    }

    let remote = syncer.get_tags(RESOURCE_ID, RESOURCE_TYPE).await.unwrap();
    let after = syncer
        .sync(&desired, &remote, RESOURCE_ID, RESOURCE_TYPE)
        .await
        .unwrap();
    assert!(after.is_noop(), "second pass should converge: {after:?}");
}

#[test]
fn merge_keeps_declared_value() {
    let merged = merge_default_tags(&plain(&[("A", "1")]), &plain(&[("A", "2"), ("B", "2")]));
    assert_eq!(merged, plain(&[("A", "1"), ("B", "2")]));
}

#[test]
fn filter_removes_prefixed_and_listed_keys() {
    let policy = SystemTagPolicy::new("aws:", ["Team"]);
    let out = filter_system_tags(&plain(&[("aws:owner", "x"), ("Team", "y")]), &policy);
    assert!(out.is_empty());
}

#[test]
fn mirror_brings_provider_tags_into_desired() {
    let out = mirror_provider_tags(
        &plain(&[("Name", "n")]),
        &plain(&[("Name", "n"), ("aws:cdk:id", "z")]),
        "aws:",
    );
    assert_eq!(out, plain(&[("Name", "n"), ("aws:cdk:id", "z")]));
}
