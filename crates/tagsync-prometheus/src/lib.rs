//! Prometheus backend for tag reconciliation metrics.
//!
//! [`PrometheusMetrics`] implements [`tagsync_core::MetricsBackend`] and is handed to a
//! syncer or resource tagger as a [`tagsync_core::MetricsHandle`].
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tagsync_core::{InMemoryTagsApi, Syncer};
//! use tagsync_prometheus::{Encoder, PrometheusMetrics, TextEncoder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let _syncer = Syncer::new(InMemoryTagsApi::new()).with_metrics(Arc::new(metrics.clone()));
//!
//! let mut buf = Vec::new();
//! TextEncoder::new().encode(&metrics.gather(), &mut buf)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `tagsync_syncs_total{resource_type}` - Counter
//! - `tagsync_tags_applied_total{resource_type, op}` - Counter
//! - `tagsync_sync_errors_total{resource_type, stage}` - Counter
//! - `tagsync_describe_failures_total{resource_type}` - Counter
//!
//! No HTTP endpoint is provided; expose [`PrometheusMetrics::gather`] from whatever server
//! the host process already runs.

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
