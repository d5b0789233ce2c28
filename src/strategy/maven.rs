use super::{branch_qualifier, without_qualifier, Base, StrategyContext};
use crate::config::Config;
use crate::domain::version::SNAPSHOT;
use crate::domain::{MetadataRegistry, Version};
use crate::error::Result;
use crate::git::Repository;

/// Release or `SNAPSHOT`.
///
/// Only a clean position exactly on an annotated tag yields the release
/// version. Everywhere else the version keeps the branch and dirty
/// qualifiers and ends with `SNAPSHOT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MavenStrategy {
    pub use_dirty: bool,
}

impl MavenStrategy {
    pub fn from_config(config: &Config) -> Self {
        MavenStrategy {
            use_dirty: config.qualifiers.use_dirty,
        }
    }

    pub(super) fn build<R: Repository>(
        &self,
        ctx: &StrategyContext<'_, R>,
        registry: &mut MetadataRegistry,
        base: &Base,
    ) -> Result<Version> {
        if base.on_head() && base.is_annotated() && !ctx.dirty {
            return Ok(base.version.clone());
        }

        let mut version = base.version.clone();
        if !base.on_head() && base.is_annotated() {
            version = if version.is_qualified() {
                // 1.0.0-rc1 moves towards 1.0.0
                version.no_qualifier()
            } else {
                version.increment_patch()
            };
        }

        let mut version = without_qualifier(version, SNAPSHOT);

        if let Some(qualifier) = branch_qualifier(ctx, registry) {
            version = version.add_qualifier(qualifier);
        }

        if self.use_dirty && ctx.dirty {
            version = version.add_qualifier("dirty");
        }

        Ok(version.add_qualifier(SNAPSHOT))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::git::MockRepository;
    use crate::strategy::testing::*;
    use crate::strategy::StrategyKind;

    fn maven() -> Config {
        Config {
            strategy: StrategyKind::Maven,
            ..Config::default()
        }
    }

    fn version(repo: &MockRepository, config: &Config) -> String {
        run(repo, config).0.to_string()
    }

    #[test]
    fn test_release_on_annotated_tag() {
        let mut repo = linear(2);
        repo.add_annotated_tag("1.0.0", oid(2));
        assert_eq!(version(&repo, &maven()), "1.0.0");
    }

    #[test]
    fn test_snapshot_after_tag() {
        let mut repo = linear(4);
        repo.add_annotated_tag("1.0.0", oid(2));
        assert_eq!(version(&repo, &maven()), "1.0.1-SNAPSHOT");
    }

    #[test]
    fn test_no_tag() {
        let repo = linear(3);
        assert_eq!(version(&repo, &maven()), "0.0.0-SNAPSHOT");
    }

    #[test]
    fn test_lightweight_tag_is_a_location_marker() {
        let mut repo = linear(3);
        repo.add_tag("1.0.0", oid(3));
        assert_eq!(version(&repo, &maven()), "1.0.0-SNAPSHOT");

        repo.add_commit(oid(4), &[oid(3)]);
        repo.set_branch_head("master", oid(4));
        assert_eq!(version(&repo, &maven()), "1.0.0-SNAPSHOT");
    }

    #[test]
    fn test_prerelease_tag_drops_qualifiers() {
        let mut repo = linear(2);
        repo.add_annotated_tag("1.0.0-rc1", oid(1));
        assert_eq!(version(&repo, &maven()), "1.0.0-SNAPSHOT");
    }

    #[test]
    fn test_dirty_on_tag_is_snapshot() {
        let mut repo = linear(2);
        repo.add_annotated_tag("2.1.0", oid(2));
        repo.set_dirty(true);
        assert_eq!(version(&repo, &maven()), "2.1.0-SNAPSHOT");

        let mut config = maven();
        config.qualifiers.use_dirty = true;
        assert_eq!(version(&repo, &config), "2.1.0-dirty-SNAPSHOT");
    }

    #[test]
    fn test_branch_qualifier() {
        let mut repo = linear(2);
        repo.add_annotated_tag("1.0.0", oid(1));
        repo.set_branch_head("release/2.x", oid(2));
        assert_eq!(version(&repo, &maven()), "1.0.1-release2.x-SNAPSHOT");
    }
}
