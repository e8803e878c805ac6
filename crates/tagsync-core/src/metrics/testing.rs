use std::sync::Mutex;

use crate::{
    metrics::{MetricsBackend, SyncStage},
    syncer::SyncSummary,
};

/// Backend that records every event as a compact string.
#[derive(Debug, Default)]
pub(crate) struct RecordingMetrics {
    events: Mutex<Vec<String>>,
}

impl RecordingMetrics {
    pub(crate) fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl MetricsBackend for RecordingMetrics {
    fn record_sync(&self, resource_type: &str, s: &SyncSummary) {
        self.push(format!(
            "sync:{resource_type}:{}/{}/{}",
            s.added, s.updated, s.deleted
        ));
    }

    fn record_sync_error(&self, resource_type: &str, stage: SyncStage) {
        self.push(format!("error:{resource_type}:{}", stage.as_label()));
    }

    fn record_describe_failure(&self, resource_type: &str) {
        self.push(format!("describe-failed:{resource_type}"));
    }
}
