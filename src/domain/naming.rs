use super::branch::BranchingPolicy;
use super::version::Version;
use crate::error::{GitVersionError, Result};
use regex::Regex;

/// Default pattern recognising version tags such as `1.2`, `v1.2.3` or
/// `1.0.0-rc1`
pub const DEFAULT_FIND_TAG_VERSION_PATTERN: &str =
    r"v?([0-9]+(?:\.[0-9]+){0,2}(?:-[a-zA-Z0-9\-_]+)?)";

/// Default replacement extracting the version from a recognised tag
pub const DEFAULT_EXTRACT_TAG_VERSION_PATTERN: &str = "$1";

/// Tag recognition plus the ordered branch policies
#[derive(Debug, Clone)]
pub struct VersionNamingConfiguration {
    find_tag_version: Regex,
    extract_tag_version: String,
    branch_policies: Vec<BranchingPolicy>,
}

impl VersionNamingConfiguration {
    /// Build a naming configuration.
    ///
    /// The catch-all fallback policy is appended after `branch_policies`
    /// when `use_default_fallback` is set.
    pub fn new(
        find_tag_version_pattern: &str,
        extract_tag_version_pattern: &str,
        branch_policies: Vec<BranchingPolicy>,
        use_default_fallback: bool,
    ) -> Result<Self> {
        let find_tag_version = Regex::new(&format!("^(?:{})$", find_tag_version_pattern))
            .map_err(|e| {
                GitVersionError::config(format!(
                    "Invalid tag version pattern '{}': {}",
                    find_tag_version_pattern, e
                ))
            })?;

        let mut policies = branch_policies;
        if use_default_fallback {
            policies.push(BranchingPolicy::default_fallback()?);
        }

        Ok(VersionNamingConfiguration {
            find_tag_version,
            extract_tag_version: extract_tag_version_pattern.to_string(),
            branch_policies: policies,
        })
    }

    pub fn branch_policies(&self) -> &[BranchingPolicy] {
        &self.branch_policies
    }

    /// True when the whole tag name matches the recognition pattern
    pub fn is_version_tag(&self, tag_name: &str) -> bool {
        self.find_tag_version.is_match(tag_name)
    }

    /// Extract and parse the version carried by a recognised tag name
    pub fn extract_version(&self, tag_name: &str) -> Result<Option<Version>> {
        if !self.is_version_tag(tag_name) {
            return Ok(None);
        }

        let extracted = self
            .find_tag_version
            .replace(tag_name, self.extract_tag_version.as_str());
        Version::parse(&extracted).map(Some)
    }

    /// Qualifier of the first policy applying on `branch`.
    ///
    /// A detached position (`None`) never produces a qualifier, and neither
    /// does a matching policy whose transforms yield no value.
    pub fn branch_qualifier(&self, branch: Option<&str>) -> Option<String> {
        let branch = branch?;
        self.branch_policies
            .iter()
            .find(|policy| policy.applies_on(branch))
            .and_then(|policy| policy.qualifier(branch))
    }
}

impl Default for VersionNamingConfiguration {
    fn default() -> Self {
        VersionNamingConfiguration::new(
            DEFAULT_FIND_TAG_VERSION_PATTERN,
            DEFAULT_EXTRACT_TAG_VERSION_PATTERN,
            Vec::new(),
            true,
        )
        .expect("default naming configuration is valid")
    }
}
