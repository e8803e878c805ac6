use serde::{Deserialize, Serialize};
use tagsync_model::{AWS_RESERVED_PREFIX, RESOURCE_TYPE_AUTO_SCALING_GROUP};

use crate::{
    defaults::{DefaultTags, TemplateContext},
    error::CoreError,
    policy::SystemTagPolicy,
    resource::ResourceMeta,
};

/// Tag reconciliation settings for one resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TagConfig {
    /// Resource type sent with every remote call and used as the describe filter.
    pub resource_type: String,
    /// Key prefix reserved by the provider.
    pub reserved_prefix: String,
    /// Exact keys managed outside of user control.
    pub system_tags: Vec<String>,
    /// Default tag templates merged into every resource.
    pub default_tags: DefaultTags,
    /// Value of `%CONTROLLER_SERVICE%`.
    pub controller_service: String,
    /// Value of `%CONTROLLER_VERSION%`.
    pub controller_version: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            resource_type: RESOURCE_TYPE_AUTO_SCALING_GROUP.to_string(),
            reserved_prefix: AWS_RESERVED_PREFIX.to_string(),
            system_tags: Vec::new(),
            default_tags: DefaultTags::default(),
            controller_service: "autoscaling".to_string(),
            controller_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl TagConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.resource_type.trim().is_empty() {
            return Err(CoreError::Config("resourceType cannot be empty".into()));
        }
        if self.reserved_prefix.is_empty() {
            return Err(CoreError::Config("reservedPrefix cannot be empty".into()));
        }
        self.default_tags
            .validate()
            .map_err(|e| CoreError::Config(format!("defaultTags: {e}")))
    }

    /// Build the system tag policy described by this config.
    pub fn system_policy(&self) -> SystemTagPolicy {
        SystemTagPolicy::new(self.reserved_prefix.clone(), self.system_tags.iter().cloned())
    }

    /// Template values for a given resource.
    pub fn template_context<'a>(&'a self, meta: &'a ResourceMeta) -> TemplateContext<'a> {
        TemplateContext {
            controller_service: &self.controller_service,
            controller_version: &self.controller_version,
            namespace: &meta.namespace,
            resource_name: &meta.name,
        }
    }
}
