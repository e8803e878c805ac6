//! Tag ownership policies applied to the desired collection before it is diffed.
//!
//! - [`merge_default_tags`] injects controller-wide defaults without overriding user tags;
//! - [`filter_system_tags`] drops reserved and system-managed tags from user state;
//! - [`mirror_provider_tags`] copies provider-owned tags from the live resource into
//!   the desired state so they are never scheduled for deletion.
//!
//! All of them are pure transforms and never fail.
mod filter;
pub use filter::{SystemTagPolicy, filter_system_tags};

mod merge;
pub use merge::merge_default_tags;

mod mirror;
pub use mirror::mirror_provider_tags;
