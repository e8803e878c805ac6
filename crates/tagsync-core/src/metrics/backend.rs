use std::sync::Arc;

use crate::syncer::SyncSummary;

/// Remote call that failed during a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    /// Batched delete of tags no longer desired.
    Delete,
    /// Batched create-or-update of added and changed tags.
    Upsert,
}

impl SyncStage {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            SyncStage::Delete => "delete",
            SyncStage::Upsert => "upsert",
        }
    }
}

/// Backend metrics collection interface.
///
/// `resource_type` is always a bounded value taken from configuration
/// (e.g. `auto-scaling-group`), never a resource identifier.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record a completed sync pass and how many tags it touched.
    ///
    /// Called for no-op passes too, with an empty summary.
    fn record_sync(&self, resource_type: &str, summary: &SyncSummary);

    /// Record a remote failure while applying a sync plan.
    fn record_sync_error(&self, resource_type: &str, stage: SyncStage);

    /// Record a describe call that failed and was downgraded to an empty result.
    fn record_describe_failure(&self, resource_type: &str);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
