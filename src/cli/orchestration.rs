//! Main workflow orchestration logic
//!
//! Keeps argument parsing in `main.rs` separate from the work itself so the
//! workflow can be driven programmatically without clap.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::calculator::GitVersionCalculator;
use crate::config::{load_config, Config};
use crate::domain::{Metadata, Version};
use crate::git::repository::open_if_repository;
use crate::strategy::StrategyKind;
use crate::ui::metadata_line;

/// Arguments of one run
///
/// Mirrors the CLI Args in a form that does not depend on clap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunArgs {
    /// Directory inside the repository to compute the version of
    pub dir: PathBuf,

    /// Path to custom config file
    pub config_path: Option<String>,

    /// Comma separated metadata names, or `ALL`
    pub metas: Option<String>,

    pub strategy: Option<StrategyKind>,

    pub max_depth: Option<u32>,

    pub use_dirty: bool,

    pub use_commit_id: bool,

    /// Fail unless the version is a valid SemVer 2.0 version
    pub strict_semver: bool,
}

impl RunArgs {
    /// Apply the command line overrides on top of the file configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(max_depth) = self.max_depth {
            config.lookup.max_depth = Some(max_depth);
        }
        if self.use_dirty {
            config.qualifiers.use_dirty = true;
        }
        if self.use_commit_id {
            config.qualifiers.use_commit_id = true;
        }
    }
}

/// Parse a metadata selection: `ALL` or comma separated names
pub fn parse_metas(selection: &str) -> Result<Vec<Metadata>> {
    if selection.trim().eq_ignore_ascii_case("all") {
        return Ok(Metadata::ALL.to_vec());
    }

    selection
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| name.parse::<Metadata>().map_err(anyhow::Error::from))
        .collect()
}

/// Compute the output lines of one run
///
/// Prints nothing itself. A directory that is not a readable repository
/// yields the `0.0.0-NOT_GIT_VERSION` sentinel instead of an error.
pub fn run(args: &RunArgs) -> Result<Vec<String>> {
    let mut config = load_config(args.config_path.as_deref())?;
    args.apply(&mut config);

    let metas = args.metas.as_deref().map(parse_metas).transpose()?;

    let repo = match open_if_repository(&args.dir) {
        Ok(Some(repo)) => Some(repo),
        Ok(None) => {
            tracing::warn!(dir = %args.dir.display(), "not a git repository");
            None
        }
        Err(e) => {
            tracing::warn!(dir = %args.dir.display(), error = %e, "cannot read git repository");
            None
        }
    };

    let Some(repo) = repo else {
        let version = Version::not_git_repository();
        return Ok(match metas {
            Some(keys) => keys
                .into_iter()
                .map(|key| {
                    let value = (key == Metadata::CalculatedVersion).then(|| version.as_str());
                    metadata_line(key, value)
                })
                .collect(),
            None => vec![version.to_string()],
        });
    };

    let mut calculator = GitVersionCalculator::new(repo, config)?;

    match metas {
        Some(keys) => keys
            .into_iter()
            .map(|key| {
                let value = calculator.metadata(key)?;
                Ok(metadata_line(key, value.as_deref()))
            })
            .collect(),
        None => {
            let version = calculator.version()?;
            if args.strict_semver {
                let strict = semver::Version::try_from(&version)
                    .with_context(|| format!("'{}' is not a strict SemVer version", version))?;
                Ok(vec![strict.to_string()])
            } else {
                Ok(vec![version.to_string()])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metas() {
        assert_eq!(parse_metas("ALL").unwrap().len(), Metadata::ALL.len());
        assert_eq!(
            parse_metas("base_tag, DIRTY").unwrap(),
            vec![Metadata::BaseTag, Metadata::Dirty]
        );
        assert!(parse_metas("BASE_TAG,NOPE").is_err());
    }

    #[test]
    fn test_overrides() {
        let args = RunArgs {
            strategy: Some(StrategyKind::Maven),
            max_depth: Some(5),
            use_dirty: true,
            ..RunArgs::default()
        };
        let mut config = Config::default();
        args.apply(&mut config);

        assert_eq!(config.strategy, StrategyKind::Maven);
        assert_eq!(config.lookup.max_depth, Some(5));
        assert!(config.qualifiers.use_dirty);
        assert!(!config.qualifiers.use_commit_id);
    }
}
