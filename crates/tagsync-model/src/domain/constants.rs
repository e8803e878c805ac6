//! Well-known tag keys and resource identifiers.
//!
//! Keeping them here avoids scattering magic strings across the policy and sync layers.

/// Key prefix the provider reserves for tags it attaches on its own.
///
/// Tags under this prefix cannot be created or removed by users, so reconciliation
/// must neither declare them as user state nor try to delete them.
pub const AWS_RESERVED_PREFIX: &str = "aws:";

/// Resource type reported by the tagging API for auto scaling groups.
///
/// Also used as the describe filter name when listing the tags of a single group.
pub const RESOURCE_TYPE_AUTO_SCALING_GROUP: &str = "auto-scaling-group";
