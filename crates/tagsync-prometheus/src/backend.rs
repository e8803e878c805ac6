use std::sync::Arc;

use prometheus::{CounterVec, Opts, Registry, proto::MetricFamily};

use tagsync_core::{MetricsBackend, SyncStage, SyncSummary};

const NAMESPACE: &str = "tagsync";

/// Prometheus metrics backend for tag reconciliation.
///
/// ## Label cardinality
/// All labels are bounded:
/// - `resource_type`: configured resource type, e.g. "auto-scaling-group"
/// - `op`: "add", "update", "delete"
/// - `stage`: "delete", "upsert"
#[derive(Clone)]
pub struct PrometheusMetrics {
    syncs: CounterVec,
    tags_applied: CounterVec,
    sync_errors: CounterVec,
    describe_failures: CounterVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create a backend registering its collectors in `registry`.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let syncs = CounterVec::new(
            Opts::new("syncs_total", "Completed sync passes, including no-ops").namespace(NAMESPACE),
            &["resource_type"],
        )?;
        registry.register(Box::new(syncs.clone()))?;

        let tags_applied = CounterVec::new(
            Opts::new("tags_applied_total", "Tags written to the remote service")
                .namespace(NAMESPACE),
            &["resource_type", "op"],
        )?;
        registry.register(Box::new(tags_applied.clone()))?;

        let sync_errors = CounterVec::new(
            Opts::new("sync_errors_total", "Remote failures while applying a sync pass")
                .namespace(NAMESPACE),
            &["resource_type", "stage"],
        )?;
        registry.register(Box::new(sync_errors.clone()))?;

        let describe_failures = CounterVec::new(
            Opts::new(
                "describe_failures_total",
                "Describe calls that failed and were treated as empty",
            )
            .namespace(NAMESPACE),
            &["resource_type"],
        )?;
        registry.register(Box::new(describe_failures.clone()))?;

        Ok(Self {
            syncs,
            tags_applied,
            sync_errors,
            describe_failures,
            registry,
        })
    }

    /// Create a backend with its own registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metrics for exposition.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Underlying registry, for registering custom metrics alongside ours.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_sync(&self, resource_type: &str, summary: &SyncSummary) {
        self.syncs.with_label_values(&[resource_type]).inc();

        for (op, count) in [
            ("add", summary.added),
            ("update", summary.updated),
            ("delete", summary.deleted),
        ] {
            if count > 0 {
                self.tags_applied
                    .with_label_values(&[resource_type, op])
                    .inc_by(count as f64);
            }
        }
    }

    fn record_sync_error(&self, resource_type: &str, stage: SyncStage) {
        self.sync_errors
            .with_label_values(&[resource_type, stage.as_label()])
            .inc();
    }

    fn record_describe_failure(&self, resource_type: &str) {
        self.describe_failures
            .with_label_values(&[resource_type])
            .inc();
    }
}
