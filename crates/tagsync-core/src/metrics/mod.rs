//! Metrics hooks for tag reconciliation.
//!
//! Backends (prometheus, statsd, etc) implement [`MetricsBackend`] and are handed to the
//! [`crate::Syncer`] / [`crate::ResourceTagger`] as a [`MetricsHandle`].
mod backend;
pub use backend::{MetricsBackend, MetricsHandle, SyncStage};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}

#[cfg(test)]
pub(crate) mod testing;
