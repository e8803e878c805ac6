mod tag;
pub use tag::{Tag, tags_equal};

mod collection;
pub use collection::TagCollection;

mod set;
pub use set::TagSet;

mod constants;
pub use constants::{AWS_RESERVED_PREFIX, RESOURCE_TYPE_AUTO_SCALING_GROUP};
