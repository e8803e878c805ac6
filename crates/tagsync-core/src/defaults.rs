//! Controller-wide default tags.
//!
//! Defaults are configured as `key=value` templates. Values may reference the
//! placeholders below, which are substituted per resource before merging:
//!
//! | placeholder | replaced with |
//! |---|---|
//! | `%CONTROLLER_SERVICE%` | service the controller manages (e.g. `autoscaling`) |
//! | `%CONTROLLER_VERSION%` | controller version |
//! | `%K8S_NAMESPACE%` | namespace of the declaring object |
//! | `%K8S_RESOURCE_NAME%` | name of the declaring object |
//!
//! Unknown placeholders are left as is.
use serde::{Deserialize, Serialize};
use tagsync_model::{ModelResult, Tag, TagCollection};

/// Templates installed when nothing else is configured.
pub const BUILTIN_DEFAULT_TAGS: &[&str] = &[
    "services.k8s.aws/controller-version=%CONTROLLER_SERVICE%-%CONTROLLER_VERSION%",
    "services.k8s.aws/namespace=%K8S_NAMESPACE%",
];

/// Values substituted into default tag templates.
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    pub controller_service: &'a str,
    pub controller_version: &'a str,
    pub namespace: &'a str,
    pub resource_name: &'a str,
}

impl TemplateContext<'_> {
    fn render(&self, template: &str) -> String {
        template
            .replace("%CONTROLLER_SERVICE%", self.controller_service)
            .replace("%CONTROLLER_VERSION%", self.controller_version)
            .replace("%K8S_NAMESPACE%", self.namespace)
            .replace("%K8S_RESOURCE_NAME%", self.resource_name)
    }
}

/// Ordered list of `key=value` default tag templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefaultTags(Vec<String>);

impl DefaultTags {
    pub fn new<I, S>(templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(templates.into_iter().map(Into::into).collect())
    }

    /// No default tags.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_DEFAULT_TAGS.iter().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn templates(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Check every template parses as `key=value`.
    pub fn validate(&self) -> ModelResult<()> {
        for template in &self.0 {
            template.parse::<Tag>()?;
        }
        Ok(())
    }

    /// Render the templates into tags for one resource.
    ///
    /// Rendered tags do not propagate to launched instances.
    pub fn resolve(&self, ctx: &TemplateContext<'_>) -> ModelResult<TagCollection> {
        let mut out = TagCollection::new();
        for template in &self.0 {
            let tag: Tag = template.parse()?;
            let value = tag.value().map(|v| ctx.render(v));
            out.push(Tag {
                value,
                propagate_at_launch: Some(false),
                ..tag
            });
        }
        Ok(out)
    }
}

impl Default for DefaultTags {
    fn default() -> Self {
        Self::builtin()
    }
}
