mod domain;
pub use domain::{AWS_RESERVED_PREFIX, RESOURCE_TYPE_AUTO_SCALING_GROUP};
pub use domain::{Tag, TagCollection, TagSet, tags_equal};

mod error;
pub use error::{ModelError, ModelResult};
