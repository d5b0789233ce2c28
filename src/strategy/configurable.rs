use super::{branch_qualifier, without_qualifier, Base, StrategyContext};
use crate::config::Config;
use crate::domain::version::SNAPSHOT;
use crate::domain::{Commit, MetadataRegistry, Version};
use crate::error::Result;
use crate::git::Repository;

/// General purpose strategy with independently toggled qualifiers.
///
/// Qualifiers are appended in the order distance, commit id, branch, dirty.
/// An active `SNAPSHOT` marker always ends up last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurableStrategy {
    pub auto_increment_patch: bool,
    pub use_distance: bool,
    pub use_commit_id: bool,
    pub commit_id_length: usize,
    pub use_long_format: bool,
    pub use_dirty: bool,
    pub use_snapshot: bool,
}

impl ConfigurableStrategy {
    pub fn from_config(config: &Config) -> Self {
        let q = &config.qualifiers;
        ConfigurableStrategy {
            auto_increment_patch: q.auto_increment_patch,
            use_distance: q.use_distance,
            use_commit_id: q.use_commit_id,
            commit_id_length: q.commit_id_length,
            use_long_format: q.use_long_format,
            use_dirty: q.use_dirty,
            use_snapshot: q.use_snapshot,
        }
    }

    pub(super) fn build<R: Repository>(
        &self,
        ctx: &StrategyContext<'_, R>,
        registry: &mut MetadataRegistry,
        current: &Commit,
        base: &Base,
    ) -> Result<Version> {
        let mut version = base.version.clone();

        if self.auto_increment_patch && !base.on_head() && base.is_annotated() {
            version = version.increment_patch();
        }

        // a position away from any tag is always described by its distance
        let off_tag = !base.on_head() || base.tag.is_none();

        if self.use_distance && (off_tag || self.use_long_format) {
            version = version.add_qualifier(base.distance().to_string());
        }

        if self.use_commit_id && (off_tag || self.use_long_format) {
            version = version.add_qualifier(current.short_sha1(self.commit_id_length));
        }

        if let Some(qualifier) = branch_qualifier(ctx, registry) {
            version = version.add_qualifier(qualifier);
        }

        if self.use_dirty && ctx.dirty {
            version = version.add_qualifier("dirty");
        }

        let clean_on_tag = !off_tag && !ctx.dirty;
        let carries_snapshot = version.qualifiers().iter().any(|q| q == SNAPSHOT);
        if carries_snapshot || (self.use_snapshot && !clean_on_tag) {
            version = without_qualifier(version, SNAPSHOT).add_qualifier(SNAPSHOT);
        }

        Ok(version)
    }
}
