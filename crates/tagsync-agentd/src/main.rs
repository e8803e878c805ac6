use std::{path::Path, sync::Arc};

use anyhow::Context;
use tracing::info;

use tagsync_core::{InMemoryTagsApi, ResourceMeta, ResourceSnapshot, ResourceTagger, TagConfig};
use tagsync_model::{Tag, TagCollection};
use tagsync_observe::{LoggerConfig, init_logger};
use tagsync_prometheus::{Encoder, PrometheusMetrics, TextEncoder};

mod reconcile;
use reconcile::reconcile;

/// Path of an optional JSON [`TagConfig`].
const ENV_CONFIG: &str = "TAGSYNC_CONFIG";

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    // 1) logger
    let log_cfg = LoggerConfig::from_env()?;
    init_logger(&log_cfg)?;
    info!(format = %log_cfg.format, "logger initialized");

    // 2) config
    let config = match std::env::var(ENV_CONFIG) {
        Ok(path) => load_config(Path::new(&path))?,
        Err(_) => TagConfig::default(),
    };
    info!(resource_type = %config.resource_type, defaults = ?config.default_tags, "tag config loaded");

    // 3) remote state
    let api = Arc::new(InMemoryTagsApi::new().with_tags(
        "web-asg",
        &config.resource_type,
        TagCollection::from(vec![
            Tag::new("Name", "web").with_propagate_at_launch(true),
            Tag::new("Env", "staging").with_propagate_at_launch(true),
            Tag::new("aws:cloudformation:stack-name", "web-stack"),
        ]),
    ));

    // 4) hooks + metrics
    let metrics = PrometheusMetrics::new()
        .map_err(|e| anyhow::anyhow!("creating metrics backend: {e}"))?;
    let tagger = ResourceTagger::new(api.clone(), config)?.with_metrics(Arc::new(metrics.clone()));

    // 5) reconcile until converged
    let desired = ResourceSnapshot::new(ResourceMeta::new("default", "web"))
        .with_resource_id("web-asg")
        .with_tags(TagCollection::from(vec![
            Tag::new("Name", "web").with_propagate_at_launch(true),
            Tag::new("Env", "prod").with_propagate_at_launch(true),
            Tag::key_only("Canary").with_propagate_at_launch(false),
        ]));

    for pass in 1..=2 {
        let (summary, persisted) = reconcile(&tagger, desired.clone()).await?;
        let keys: Vec<String> = persisted
            .tags
            .iter()
            .flat_map(|t| t.keys().map(str::to_string))
            .collect();
        info!(pass, noop = summary.is_noop(), persisted = ?keys, "pass finished");
    }

    // 6) metrics exposition
    let mut buf = Vec::new();
    TextEncoder::new()
        .encode(&metrics.gather(), &mut buf)
        .map_err(|e| anyhow::anyhow!("encoding metrics: {e}"))?;
    info!(metrics = %String::from_utf8_lossy(&buf), "metrics snapshot");
    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<TagConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading tag config {}", path.display()))?;
    let config: TagConfig = serde_json::from_str(&raw)
        .with_context(|| format!("parsing tag config {}", path.display()))?;
    Ok(config)
}
