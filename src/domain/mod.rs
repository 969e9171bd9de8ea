//! Domain logic - pure rules for versions, tags and version records

pub mod record;
pub mod tag;
pub mod version;

pub use record::VersionRecord;
pub use tag::{normalize_repository, sanitize_branch_name, TagsResult};
pub use version::{ImageVersion, Version, SNAPSHOT};
