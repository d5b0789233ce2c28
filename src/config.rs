use crate::analyzer::LookupPolicy;
use crate::domain::naming::{DEFAULT_EXTRACT_TAG_VERSION_PATTERN, DEFAULT_FIND_TAG_VERSION_PATTERN};
use crate::domain::{BranchTransform, BranchingPolicy, VersionNamingConfiguration};
use crate::error::{GitVersionError, Result};
use crate::pattern::{DEFAULT_TAG_VERSION_PATTERN, DEFAULT_VERSION_PATTERN};
use crate::strategy::StrategyKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

/// File name looked up in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "git-semver.toml";

/// Accepted lengths of the abbreviated commit id qualifier
pub const COMMIT_ID_LENGTH_RANGE: RangeInclusive<usize> = 8..=40;

/// Represents the complete configuration for git-semver.
///
/// Contains the strategy selection, qualifier toggles, branch naming rules,
/// tag recognition, lookup bounds and pattern templates.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub strategy: StrategyKind,

    #[serde(default)]
    pub qualifiers: QualifiersConfig,

    #[serde(default)]
    pub branching: BranchingConfig,

    #[serde(default)]
    pub tags: TagsConfig,

    #[serde(default)]
    pub lookup: LookupConfig,

    #[serde(default)]
    pub pattern: PatternConfig,
}

fn default_true() -> bool {
    true
}

fn default_commit_id_length() -> usize {
    8
}

/// Qualifiers appended to the base version.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct QualifiersConfig {
    /// Bump the patch number once when moving off an annotated tag
    #[serde(default = "default_true")]
    pub auto_increment_patch: bool,

    #[serde(default = "default_true")]
    pub use_distance: bool,

    #[serde(default)]
    pub use_commit_id: bool,

    #[serde(default = "default_commit_id_length")]
    pub commit_id_length: usize,

    /// Always emit distance and commit id, even on a tag
    #[serde(default)]
    pub use_long_format: bool,

    #[serde(default)]
    pub use_dirty: bool,

    #[serde(default)]
    pub use_snapshot: bool,
}

impl Default for QualifiersConfig {
    fn default() -> Self {
        QualifiersConfig {
            auto_increment_patch: true,
            use_distance: true,
            use_commit_id: false,
            commit_id_length: default_commit_id_length(),
            use_long_format: false,
            use_dirty: false,
            use_snapshot: false,
        }
    }
}

/// Returns the branches that never produce a qualifier.
fn default_non_qualifier_branches() -> Vec<String> {
    vec!["master".to_string(), "main".to_string()]
}

/// A user-defined branching rule.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BranchPolicyConfig {
    /// Whole-name regex with at least one capture group
    pub pattern: String,

    #[serde(default = "default_policy_transforms")]
    pub transforms: Vec<BranchTransform>,
}

fn default_policy_transforms() -> Vec<BranchTransform> {
    vec![
        BranchTransform::RemoveUnexpectedChars,
        BranchTransform::LowercaseEn,
    ]
}

/// Configuration for branch qualifiers.
///
/// Policies are evaluated in order: one ignore policy per
/// `non_qualifier_branches` entry, then `policies`, then the catch-all
/// fallback when `use_default_branching_policy` is set.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BranchingConfig {
    #[serde(default = "default_true")]
    pub use_default_branching_policy: bool,

    #[serde(default = "default_non_qualifier_branches")]
    pub non_qualifier_branches: Vec<String>,

    #[serde(default)]
    pub policies: Vec<BranchPolicyConfig>,
}

impl Default for BranchingConfig {
    fn default() -> Self {
        BranchingConfig {
            use_default_branching_policy: true,
            non_qualifier_branches: default_non_qualifier_branches(),
            policies: Vec::new(),
        }
    }
}

fn default_find_tag_version_pattern() -> String {
    DEFAULT_FIND_TAG_VERSION_PATTERN.to_string()
}

fn default_extract_tag_version_pattern() -> String {
    DEFAULT_EXTRACT_TAG_VERSION_PATTERN.to_string()
}

/// Tag recognition.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagsConfig {
    #[serde(default = "default_find_tag_version_pattern")]
    pub find_tag_version_pattern: String,

    /// Replacement applied to a recognised tag name, e.g. `$1`
    #[serde(default = "default_extract_tag_version_pattern")]
    pub extract_tag_version_pattern: String,
}

impl Default for TagsConfig {
    fn default() -> Self {
        TagsConfig {
            find_tag_version_pattern: default_find_tag_version_pattern(),
            extract_tag_version_pattern: default_extract_tag_version_pattern(),
        }
    }
}

fn default_max_version_search_depth() -> u32 {
    1000
}

/// Bounds of the commit graph walks.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LookupConfig {
    #[serde(default)]
    pub max_depth: Option<u32>,

    #[serde(default)]
    pub policy: LookupPolicy,

    #[serde(default)]
    pub use_max_version: bool,

    #[serde(default = "default_max_version_search_depth")]
    pub max_version_search_depth: u32,
}

impl Default for LookupConfig {
    fn default() -> Self {
        LookupConfig {
            max_depth: None,
            policy: LookupPolicy::Max,
            use_max_version: false,
            max_version_search_depth: default_max_version_search_depth(),
        }
    }
}

fn default_version_pattern() -> String {
    DEFAULT_VERSION_PATTERN.to_string()
}

fn default_tag_version_pattern() -> String {
    DEFAULT_TAG_VERSION_PATTERN.to_string()
}

/// Templates of the pattern strategy.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PatternConfig {
    #[serde(default = "default_version_pattern")]
    pub version_pattern: String,

    /// Used instead of `version_pattern` on a clean annotated version tag
    #[serde(default = "default_tag_version_pattern")]
    pub tag_version_pattern: String,

    /// Values resolved by `${sys.NAME}` placeholders
    #[serde(default)]
    pub system_properties: HashMap<String, String>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        PatternConfig {
            version_pattern: default_version_pattern(),
            tag_version_pattern: default_tag_version_pattern(),
            system_properties: HashMap::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            strategy: StrategyKind::default(),
            qualifiers: QualifiersConfig::default(),
            branching: BranchingConfig::default(),
            tags: TagsConfig::default(),
            lookup: LookupConfig::default(),
            pattern: PatternConfig::default(),
        }
    }
}

impl Config {
    /// Build the tag recognition and branch policies described by this
    /// configuration
    pub fn naming_configuration(&self) -> Result<VersionNamingConfiguration> {
        let mut policies = Vec::new();
        for branch in &self.branching.non_qualifier_branches {
            policies.push(BranchingPolicy::ignore_branch_name(branch)?);
        }
        for policy in &self.branching.policies {
            policies.push(BranchingPolicy::new(
                &policy.pattern,
                policy.transforms.clone(),
            )?);
        }

        VersionNamingConfiguration::new(
            &self.tags.find_tag_version_pattern,
            &self.tags.extract_tag_version_pattern,
            policies,
            self.branching.use_default_branching_policy,
        )
    }

    /// Check the settings that cannot be expressed in the file format
    pub fn validate(&self) -> Result<()> {
        if !COMMIT_ID_LENGTH_RANGE.contains(&self.qualifiers.commit_id_length) {
            return Err(GitVersionError::config(format!(
                "commit_id_length must be within {}..={}, got {}",
                COMMIT_ID_LENGTH_RANGE.start(),
                COMMIT_ID_LENGTH_RANGE.end(),
                self.qualifiers.commit_id_length
            )));
        }

        self.lookup.policy.ensure_implemented()?;
        self.naming_configuration()?;

        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `git-semver.toml` in current directory
/// 3. `git-semver.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);

    let path = if let Some(path) = config_path {
        Path::new(path).to_path_buf()
    } else if local.exists() {
        local
    } else if let Some(config_dir) = dirs::config_dir() {
        let user = config_dir.join(CONFIG_FILE_NAME);
        if user.exists() {
            user
        } else {
            tracing::debug!("no configuration file found, using defaults");
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    tracing::debug!(path = %path.display(), "loading configuration");
    let content = fs::read_to_string(&path)?;

    toml::from_str(&content).map_err(|e| {
        GitVersionError::config(format!(
            "Invalid configuration file '{}': {}",
            path.display(),
            e
        ))
    })
}
