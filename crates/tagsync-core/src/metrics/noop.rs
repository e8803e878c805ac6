use crate::{
    metrics::backend::{MetricsBackend, SyncStage},
    syncer::SyncSummary,
};

/// No-op metrics backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_sync(&self, _: &str, _: &SyncSummary) {}

    #[inline(always)]
    fn record_sync_error(&self, _: &str, _: SyncStage) {}

    #[inline(always)]
    fn record_describe_failure(&self, _: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_metrics_is_zero_size() {
        assert_eq!(std::mem::size_of::<NoOpMetrics>(), 0);
    }

    #[test]
    fn stage_labels_are_stable() {
        assert_eq!(SyncStage::Delete.as_label(), "delete");
        assert_eq!(SyncStage::Upsert.as_label(), "upsert");
    }
}
