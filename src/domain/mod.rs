//! Domain logic - pure value types independent of git operations

pub mod branch;
pub mod commit;
pub mod metadata;
pub mod naming;
pub mod tag;
pub mod version;

pub use branch::{BranchTransform, BranchingPolicy};
pub use commit::Commit;
pub use metadata::{Metadata, MetadataRegistry};
pub use naming::VersionNamingConfiguration;
pub use tag::{TagKind, TagRef};
pub use version::Version;
