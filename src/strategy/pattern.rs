use super::{branch_qualifier, Base, StrategyContext};
use crate::config::Config;
use crate::domain::{MetadataRegistry, Version};
use crate::error::Result;
use crate::git::Repository;
use crate::pattern::{self, PatternContext, Template};
use std::collections::HashMap;

/// Shapes the version with a template
#[derive(Debug, Clone)]
pub struct PatternStrategy {
    pub auto_increment_patch: bool,
    version_template: Template,
    tag_template: Template,
    system_properties: HashMap<String, String>,
}

impl PatternStrategy {
    /// Parse both templates; a malformed template fails here rather than at
    /// the first computation
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(PatternStrategy {
            auto_increment_patch: config.qualifiers.auto_increment_patch,
            version_template: pattern::parse(&config.pattern.version_pattern)?,
            tag_template: pattern::parse(&config.pattern.tag_version_pattern)?,
            system_properties: config.pattern.system_properties.clone(),
        })
    }

    pub(super) fn build<R: Repository>(
        &self,
        ctx: &StrategyContext<'_, R>,
        registry: &mut MetadataRegistry,
        base: &Base,
    ) -> Result<Version> {
        branch_qualifier(ctx, registry);

        let on_release = base.on_head() && base.is_annotated() && !ctx.dirty;
        let template = if on_release {
            &self.tag_template
        } else {
            &self.version_template
        };

        let version = if self.auto_increment_patch && !base.on_head() && base.is_annotated() {
            base.version.increment_patch()
        } else {
            base.version.clone()
        };

        let context = PatternContext {
            version: &version,
            metadata: &*registry,
            system_properties: &self.system_properties,
        };
        pattern::evaluate(template, &context)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::error::GitVersionError;
    use crate::strategy::testing::*;
    use crate::strategy::{StrategyKind, VersionStrategy};

    fn pattern(version_pattern: &str) -> Config {
        let mut config = Config {
            strategy: StrategyKind::Pattern,
            ..Config::default()
        };
        config.pattern.version_pattern = version_pattern.to_string();
        config
    }

    #[test]
    fn test_detached_head_skips_branch() {
        let mut repo = linear(3);
        repo.add_annotated_tag("1.0.0", oid(2));
        repo.detach_head(oid(3));

        let config = pattern("${v}${<meta.BRANCH_NAME}${<meta.GIT_SHA1_8}");
        assert_eq!(run(&repo, &config).0.to_string(), "1.0.1-03030303");
    }

    #[test]
    fn test_default_templates() {
        let mut repo = linear(3);
        repo.add_annotated_tag("1.0.0", oid(1));
        repo.set_branch_head("develop", oid(3));

        let config = pattern(crate::pattern::DEFAULT_VERSION_PATTERN);
        assert_eq!(run(&repo, &config).0.to_string(), "1.0.1-2.03030303");

        repo.set_branch_head("develop", oid(1));
        assert_eq!(run(&repo, &config).0.to_string(), "1.0.0-develop");
    }

    #[test]
    fn test_system_properties() {
        let mut repo = linear(1);
        repo.add_annotated_tag("3.1.4", oid(1));
        repo.add_commit(oid(2), &[oid(1)]);
        repo.set_branch_head("master", oid(2));

        let mut config = pattern("${M}.${m}.${p}${<sys.flavor}");
        config
            .pattern
            .system_properties
            .insert("flavor".to_string(), "jdk17".to_string());
        assert_eq!(run(&repo, &config).0.to_string(), "3.1.5-jdk17");
    }

    #[test]
    fn test_malformed_template_fails_at_configuration() {
        let config = pattern("${v");
        assert!(matches!(
            VersionStrategy::from_config(&config),
            Err(GitVersionError::Pattern { .. })
        ));
    }
}
