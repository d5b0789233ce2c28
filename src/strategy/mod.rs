//! Version strategies
//!
//! Every strategy resolves the same base (commit, tag, version) through the
//! helpers of this module and differs only in how qualifiers are composed.

pub mod configurable;
pub mod maven;
pub mod pattern;

pub use configurable::ConfigurableStrategy;
pub use maven::MavenStrategy;
pub use pattern::PatternStrategy;

use crate::analyzer::TagResolver;
use crate::config::Config;
use crate::domain::{Commit, Metadata, MetadataRegistry, TagRef, Version, VersionNamingConfiguration};
use crate::error::{GitVersionError, Result};
use crate::git::Repository;
use git2::Oid;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Configurable,
    Maven,
    Pattern,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Configurable => write!(f, "configurable"),
            StrategyKind::Maven => write!(f, "maven"),
            StrategyKind::Pattern => write!(f, "pattern"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = GitVersionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "configurable" => Ok(StrategyKind::Configurable),
            "maven" => Ok(StrategyKind::Maven),
            "pattern" => Ok(StrategyKind::Pattern),
            _ => Err(GitVersionError::config(format!("Unknown strategy: '{}'", s))),
        }
    }
}

/// Repository state shared by the strategies during one computation
pub struct StrategyContext<'a, R: Repository> {
    pub repo: &'a R,
    pub naming: &'a VersionNamingConfiguration,
    pub tags: &'a TagResolver,
    pub head: Oid,
    pub branch: Option<&'a str>,
    pub dirty: bool,
    /// Bound of the fallback walk when no version tag is reachable
    pub max_depth: Option<u32>,
    /// Search depth of the max-version base, when enabled
    pub max_version_search_depth: Option<u32>,
}

/// Base the version is derived from
#[derive(Debug, Clone)]
pub struct Base {
    pub commit: Commit,
    /// Tag the version was read from; `None` for the synthetic fallback base
    pub tag: Option<TagRef>,
    pub version: Version,
}

impl Base {
    /// True when the base commit is the current position
    pub fn on_head(&self) -> bool {
        self.commit.head_distance == 0
    }

    pub fn is_annotated(&self) -> bool {
        self.tag.as_ref().is_some_and(TagRef::is_annotated)
    }

    pub fn distance(&self) -> u32 {
        self.commit.head_distance
    }
}

/// The closed set of strategies
#[derive(Debug, Clone)]
pub enum VersionStrategy {
    Configurable(ConfigurableStrategy),
    Maven(MavenStrategy),
    Pattern(PatternStrategy),
}

impl VersionStrategy {
    /// Build the strategy selected by `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let strategy = match config.strategy {
            StrategyKind::Configurable => {
                VersionStrategy::Configurable(ConfigurableStrategy::from_config(config))
            }
            StrategyKind::Maven => VersionStrategy::Maven(MavenStrategy::from_config(config)),
            StrategyKind::Pattern => VersionStrategy::Pattern(PatternStrategy::from_config(config)?),
        };

        Ok(strategy)
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            VersionStrategy::Configurable(_) => StrategyKind::Configurable,
            VersionStrategy::Maven(_) => StrategyKind::Maven,
            VersionStrategy::Pattern(_) => StrategyKind::Pattern,
        }
    }

    /// Compute the version of `current` given the candidate base commits,
    /// registering diagnostics into `registry`
    pub fn build<R: Repository>(
        &self,
        ctx: &StrategyContext<'_, R>,
        registry: &mut MetadataRegistry,
        current: &Commit,
        candidates: &[Commit],
    ) -> Result<Version> {
        tracing::debug!(strategy = %self.kind(), head = %current.id, "building version");

        let base = resolve_base(ctx, candidates)?;
        register_base_metadata(registry, &base);

        match self {
            VersionStrategy::Configurable(strategy) => strategy.build(ctx, registry, current, &base),
            VersionStrategy::Maven(strategy) => strategy.build(ctx, registry, &base),
            VersionStrategy::Pattern(strategy) => strategy.build(ctx, registry, &base),
        }
    }
}

/// Base commit: the first candidate, the greatest version within the
/// max-version search depth when enabled, or the deepest ancestor when no
/// version tag is reachable
pub fn select_base<R: Repository>(
    ctx: &StrategyContext<'_, R>,
    candidates: &[Commit],
) -> Result<Commit> {
    if let Some(depth) = ctx.max_version_search_depth {
        let deep = ctx
            .tags
            .max_version_candidates(ctx.repo, ctx.head, ctx.dirty, depth)?;
        if let Some(commit) = deep.into_iter().next() {
            tracing::debug!(base = %commit.id, "max version base");
            return Ok(commit);
        }
    }

    match candidates.first() {
        Some(commit) => Ok(commit.clone()),
        None => ctx.tags.fallback_base(ctx.repo, ctx.head, ctx.max_depth),
    }
}

/// Resolve the base commit, the tag to use on it and its version
pub fn resolve_base<R: Repository>(
    ctx: &StrategyContext<'_, R>,
    candidates: &[Commit],
) -> Result<Base> {
    let commit = select_base(ctx, candidates)?;
    let prefer_annotated = commit.id == ctx.head && !ctx.dirty;
    let tag = ctx.tags.tag_to_use(&commit, prefer_annotated).cloned();

    let version = tag
        .as_ref()
        .and_then(|tag| ctx.tags.version_of(tag))
        .cloned()
        .unwrap_or_else(Version::zero);

    tracing::debug!(
        base = %commit.id,
        tag = tag.as_ref().map(|t| t.name.as_str()).unwrap_or("-"),
        %version,
        distance = commit.head_distance,
        "resolved base"
    );

    Ok(Base {
        commit,
        tag,
        version,
    })
}

/// Record the base-derived metadata keys
pub fn register_base_metadata(registry: &mut MetadataRegistry, base: &Base) {
    if let Some(tag) = &base.tag {
        registry.register(Metadata::BaseTag, tag.name.as_str());
        registry.register(Metadata::BaseTagType, tag.kind().to_string());
    }
    registry.register(Metadata::BaseVersion, base.version.as_str());
    registry.register(Metadata::CommitDistance, base.distance().to_string());
    registry.register(Metadata::BaseCommitOnHead, base.on_head().to_string());

    let plain = base.version.no_qualifier();
    registry.register(Metadata::NextMajorVersion, plain.increment_major().as_str());
    registry.register(Metadata::NextMinorVersion, plain.increment_minor().as_str());
    registry.register(Metadata::NextPatchVersion, plain.increment_patch().as_str());
}

/// Qualifier of the current branch, registered as QUALIFIED_BRANCH_NAME
pub fn branch_qualifier<R: Repository>(
    ctx: &StrategyContext<'_, R>,
    registry: &mut MetadataRegistry,
) -> Option<String> {
    let qualifier = ctx.naming.branch_qualifier(ctx.branch);
    if let Some(q) = &qualifier {
        registry.register(Metadata::QualifiedBranchName, q.as_str());
    }
    qualifier
}

/// Drop every occurrence of `qualifier`
pub(crate) fn without_qualifier(version: Version, qualifier: &str) -> Version {
    let mut version = version;
    while version.qualifiers().iter().any(|q| q == qualifier) {
        version = version.remove_qualifier(qualifier);
    }
    version
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_strategy_kind_parse() {
        assert_eq!("Maven".parse::<StrategyKind>().unwrap(), StrategyKind::Maven);
        assert_eq!(StrategyKind::Pattern.to_string(), "pattern");
        assert!("script".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn test_base_metadata() {
        let mut repo = linear(3);
        repo.add_annotated_tag("v1.2.0", oid(1));

        let (_, registry) = run(&repo, &Config::default());
        assert_eq!(registry.get(Metadata::BaseTag), Some("v1.2.0"));
        assert_eq!(registry.get(Metadata::BaseTagType), Some("ANNOTATED"));
        assert_eq!(registry.get(Metadata::BaseVersion), Some("1.2.0"));
        assert_eq!(registry.get(Metadata::CommitDistance), Some("2"));
        assert_eq!(registry.get(Metadata::BaseCommitOnHead), Some("false"));
        assert_eq!(registry.get(Metadata::NextMajorVersion), Some("2.0.0"));
        assert_eq!(registry.get(Metadata::NextMinorVersion), Some("1.3.0"));
        assert_eq!(registry.get(Metadata::NextPatchVersion), Some("1.2.1"));
    }

    #[test]
    fn test_fallback_base_has_no_tag() {
        let repo = linear(4);
        let (version, registry) = run(&repo, &Config::default());
        assert_eq!(version.to_string(), "0.0.0-3");
        assert_eq!(registry.get(Metadata::BaseTag), None);
        assert_eq!(registry.get(Metadata::BaseVersion), Some("0.0.0"));
    }

    #[test]
    fn test_max_version_base() {
        // 1 (5.0.0) <- 2 <- 3 (1.0.0) <- 4
        let mut repo = linear(4);
        repo.add_annotated_tag("5.0.0", oid(1));
        repo.add_annotated_tag("1.0.0", oid(3));

        let (nearest, _) = run(&repo, &Config::default());
        assert_eq!(nearest.to_string(), "1.0.1-1");

        let mut config = Config::default();
        config.lookup.use_max_version = true;
        let (max, _) = run(&repo, &config);
        assert_eq!(max.to_string(), "5.0.1-3");

        config.lookup.max_version_search_depth = 2;
        let (bounded, _) = run(&repo, &config);
        assert_eq!(bounded.to_string(), "1.0.1-1");
    }

    #[test]
    fn test_without_qualifier_removes_all() {
        let version = Version::parse("1.0.0-SNAPSHOT-a-SNAPSHOT").unwrap();
        assert_eq!(without_qualifier(version, "SNAPSHOT").to_string(), "1.0.0-a");
    }
}
