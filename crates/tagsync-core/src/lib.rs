pub mod api;
pub mod config;
pub mod defaults;
pub mod diff;
pub mod error;
pub mod metrics;
pub mod policy;
pub mod resource;
pub mod syncer;

pub use api::{InMemoryTagsApi, TagFilter, TagRef, TagUpsert, TagsApi, TagsApiError};
pub use config::TagConfig;
pub use defaults::{DefaultTags, TemplateContext};
pub use diff::{TagDiff, diff};
pub use error::CoreError;
pub use metrics::{MetricsBackend, MetricsHandle, NoOpMetrics, SyncStage, noop_metrics};
pub use policy::{SystemTagPolicy, filter_system_tags, merge_default_tags, mirror_provider_tags};
pub use resource::{ResourceMeta, ResourceSnapshot, ResourceTagger, TaggedResource};
pub use syncer::{SyncSummary, Syncer};

pub mod prelude {
    pub use crate::api::{TagsApi, TagsApiError};
    pub use crate::config::TagConfig;
    pub use crate::error::CoreError;
    pub use crate::resource::{ResourceTagger, TaggedResource};
    pub use crate::syncer::{SyncSummary, Syncer};
    pub use tagsync_model::{Tag, TagCollection, TagSet};
}
