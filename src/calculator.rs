//! Version computation entry point
//!
//! [GitVersionCalculator] ties the repository, configuration and strategy
//! together and caches the last result keyed by the current position.

use crate::analyzer::TagResolver;
use crate::config::Config;
use crate::domain::{Metadata, MetadataRegistry, TagRef, Version, VersionNamingConfiguration};
use crate::error::{GitVersionError, Result};
use crate::git::Repository;
use crate::strategy::{StrategyContext, VersionStrategy};
use git2::Oid;

const SHORT_SHA1_LENGTH: usize = 8;

/// Result of one computation
#[derive(Debug, Clone)]
struct Computation {
    position: Option<Oid>,
    version: Version,
    metadata: MetadataRegistry,
}

/// Computes the version of a repository.
///
/// An instance is reusable but not meant for concurrent use. The last result
/// is reused while the current position is unchanged and the configuration
/// has not been touched.
pub struct GitVersionCalculator<R: Repository> {
    repo: R,
    config: Config,
    naming: VersionNamingConfiguration,
    strategy: VersionStrategy,
    cache: Option<Computation>,
    config_changed: bool,
}

impl<R: Repository> GitVersionCalculator<R> {
    /// Create a calculator, rejecting an invalid configuration
    pub fn new(repo: R, config: Config) -> Result<Self> {
        let (naming, strategy) = Self::prepare(&config)?;

        Ok(GitVersionCalculator {
            repo,
            config,
            naming,
            strategy,
            cache: None,
            config_changed: true,
        })
    }

    fn prepare(config: &Config) -> Result<(VersionNamingConfiguration, VersionStrategy)> {
        config.validate()?;
        Ok((config.naming_configuration()?, VersionStrategy::from_config(config)?))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Change the configuration. The cached result is discarded even if the
    /// change turns out to be a no-op. An invalid result leaves the current
    /// configuration in place.
    pub fn update_config<F>(&mut self, update: F) -> Result<()>
    where
        F: FnOnce(&mut Config),
    {
        let mut config = self.config.clone();
        update(&mut config);

        let (naming, strategy) = Self::prepare(&config)?;
        self.config = config;
        self.naming = naming;
        self.strategy = strategy;
        self.config_changed = true;

        Ok(())
    }

    /// The version of the current position
    pub fn version(&mut self) -> Result<Version> {
        Ok(self.computation()?.version.clone())
    }

    /// A metadata value of the current computation
    pub fn metadata(&mut self, key: Metadata) -> Result<Option<String>> {
        Ok(self.computation()?.metadata.get(key).map(str::to_string))
    }

    fn computation(&mut self) -> Result<&Computation> {
        let position = self.repo.head().map_err(GitVersionError::calculation)?;

        let config_changed = self.config_changed;
        let cached = self
            .cache
            .take()
            .filter(|cached| !config_changed && cached.position == position);

        let computation = match cached {
            Some(cached) => {
                tracing::trace!("reusing cached version");
                cached
            }
            None => {
                let computation = self.compute(position).map_err(GitVersionError::calculation)?;
                self.config_changed = false;
                computation
            }
        };

        Ok(&*self.cache.insert(computation))
    }

    fn compute(&self, position: Option<Oid>) -> Result<Computation> {
        let mut metadata = MetadataRegistry::new();

        let Some(head) = position else {
            tracing::debug!("repository has no commit");
            let version = Version::empty_repository();
            metadata.register(Metadata::CalculatedVersion, version.as_str());
            return Ok(Computation {
                position,
                version,
                metadata,
            });
        };

        let branch = self.repo.current_branch()?;
        let dirty = self.repo.is_dirty()?;
        let tags = TagResolver::new(&self.naming, self.repo.list_tags()?);

        tracing::debug!(%head, branch = branch.as_deref().unwrap_or("(detached)"), dirty, "computing version");
        self.register_head_metadata(&mut metadata, &tags, head, branch.as_deref(), dirty)?;

        let lookup = &self.config.lookup;
        let candidates = tags.candidate_bases(&self.repo, head, dirty, lookup.max_depth, lookup.policy)?;

        let ctx = StrategyContext {
            repo: &self.repo,
            naming: &self.naming,
            tags: &tags,
            head,
            branch: branch.as_deref(),
            dirty,
            max_depth: lookup.max_depth,
            max_version_search_depth: lookup
                .use_max_version
                .then_some(lookup.max_version_search_depth),
        };

        let current = tags.commit(head, 0);
        let version = self.strategy.build(&ctx, &mut metadata, &current, &candidates)?;

        metadata.register(Metadata::CalculatedVersion, version.as_str());
        metadata.register(Metadata::CurrentVersionMajor, version.major().to_string());
        metadata.register(Metadata::CurrentVersionMinor, version.minor().to_string());
        metadata.register(Metadata::CurrentVersionPatch, version.patch().to_string());

        tracing::debug!(%version, "version computed");
        Ok(Computation {
            position,
            version,
            metadata,
        })
    }

    fn register_head_metadata(
        &self,
        metadata: &mut MetadataRegistry,
        tags: &TagResolver,
        head: Oid,
        branch: Option<&str>,
        dirty: bool,
    ) -> Result<()> {
        let sha1 = head.to_string();
        metadata.register(Metadata::GitSha1Full, sha1.as_str());
        metadata.register(Metadata::GitSha1Short, &sha1[..SHORT_SHA1_LENGTH]);

        if let Some(branch) = branch {
            metadata.register(Metadata::BranchName, branch);
        }
        metadata.register(Metadata::DetachedHead, branch.is_none().to_string());
        metadata.register(Metadata::Dirty, dirty.to_string());

        let info = self.repo.read_commit(head)?;
        if let Some(time) = chrono::DateTime::from_timestamp(info.time, 0) {
            metadata.register(
                Metadata::CommitTimestamp,
                time.format("%Y%m%d%H%M%S").to_string(),
            );
        }

        let head_tags: Vec<&TagRef> = tags.tags_at(head).collect();
        register_tag_lists(
            metadata,
            &head_tags,
            [
                Metadata::HeadTags,
                Metadata::HeadAnnotatedTags,
                Metadata::HeadLightweightTags,
            ],
        );

        let all_tags: Vec<&TagRef> = tags.all_tags().iter().collect();
        register_tag_lists(
            metadata,
            &all_tags,
            [
                Metadata::AllTags,
                Metadata::AllAnnotatedTags,
                Metadata::AllLightweightTags,
            ],
        );

        let version_tags: Vec<&TagRef> = tags.version_tags().collect();
        register_tag_lists(
            metadata,
            &version_tags,
            [
                Metadata::AllVersionTags,
                Metadata::AllVersionAnnotatedTags,
                Metadata::AllVersionLightweightTags,
            ],
        );

        Ok(())
    }
}

/// Register the comma-joined names of `tags` under `[all, annotated,
/// lightweight]`, skipping empty lists
fn register_tag_lists(metadata: &mut MetadataRegistry, tags: &[&TagRef], keys: [Metadata; 3]) {
    let [all, annotated, lightweight] = keys;
    let names = |kind: Option<bool>| -> String {
        tags.iter()
            .filter(|tag| kind.map_or(true, |annotated| tag.is_annotated() == annotated))
            .map(|tag| tag.name.as_str())
            .collect::<Vec<_>>()
            .join(",")
    };

    for (key, value) in [
        (all, names(None)),
        (annotated, names(Some(true))),
        (lightweight, names(Some(false))),
    ] {
        if !value.is_empty() {
            metadata.register(key, value);
        }
    }
}
