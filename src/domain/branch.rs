//! Branch name recognition and qualifier transforms

use crate::error::{GitVersionError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

fn unexpected_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s\-#/\\]+").expect("unexpected-chars regex is valid"))
}

/// Pure string transform applied to a captured branch name.
///
/// `Ignore` always yields no value, which suppresses the branch qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BranchTransform {
    Identity,
    RemoveUnexpectedChars,
    ReplaceUnexpectedCharsUnderscore,
    Uppercase,
    Lowercase,
    UppercaseEn,
    LowercaseEn,
    Ignore,
}

impl BranchTransform {
    pub const ALL: [BranchTransform; 8] = [
        BranchTransform::Identity,
        BranchTransform::RemoveUnexpectedChars,
        BranchTransform::ReplaceUnexpectedCharsUnderscore,
        BranchTransform::Uppercase,
        BranchTransform::Lowercase,
        BranchTransform::UppercaseEn,
        BranchTransform::LowercaseEn,
        BranchTransform::Ignore,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BranchTransform::Identity => "IDENTITY",
            BranchTransform::RemoveUnexpectedChars => "REMOVE_UNEXPECTED_CHARS",
            BranchTransform::ReplaceUnexpectedCharsUnderscore => {
                "REPLACE_UNEXPECTED_CHARS_UNDERSCORE"
            }
            BranchTransform::Uppercase => "UPPERCASE",
            BranchTransform::Lowercase => "LOWERCASE",
            BranchTransform::UppercaseEn => "UPPERCASE_EN",
            BranchTransform::LowercaseEn => "LOWERCASE_EN",
            BranchTransform::Ignore => "IGNORE",
        }
    }

    /// Apply the transform; `None` means "no qualifier".
    ///
    /// Case mapping uses Unicode default casing, which does not depend on the
    /// process locale, so the `_EN` variants behave the same as the plain ones.
    pub fn apply(&self, input: &str) -> Option<String> {
        match self {
            BranchTransform::Identity => Some(input.to_string()),
            BranchTransform::RemoveUnexpectedChars => {
                Some(unexpected_chars().replace_all(input, "").into_owned())
            }
            BranchTransform::ReplaceUnexpectedCharsUnderscore => {
                Some(unexpected_chars().replace_all(input, "_").into_owned())
            }
            BranchTransform::Uppercase | BranchTransform::UppercaseEn => {
                Some(input.to_uppercase())
            }
            BranchTransform::Lowercase | BranchTransform::LowercaseEn => {
                Some(input.to_lowercase())
            }
            BranchTransform::Ignore => None,
        }
    }
}

impl fmt::Display for BranchTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BranchTransform {
    type Err = GitVersionError;

    fn from_str(s: &str) -> Result<Self> {
        BranchTransform::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| GitVersionError::config(format!("Unknown branch transform: '{}'", s)))
    }
}

/// One branch-name rule: a whole-name regex with a capture group and the
/// transforms folded over the captured text.
#[derive(Debug, Clone)]
pub struct BranchingPolicy {
    source: String,
    pattern: Regex,
    transforms: Vec<BranchTransform>,
}

impl BranchingPolicy {
    /// Compile a policy. The pattern must contain at least one capture group.
    pub fn new(pattern: &str, transforms: Vec<BranchTransform>) -> Result<Self> {
        let compiled = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
            GitVersionError::config(format!("Invalid branch pattern '{}': {}", pattern, e))
        })?;

        // group 0 is the whole match
        if compiled.captures_len() < 2 {
            return Err(GitVersionError::config(format!(
                "Branch pattern '{}' must contain a capture group",
                pattern
            )));
        }

        Ok(BranchingPolicy {
            source: pattern.to_string(),
            pattern: compiled,
            transforms,
        })
    }

    /// Policy matching exactly `name`, turning it into a lowercase qualifier
    /// with unexpected characters replaced by `_`
    pub fn fixed_branch_name(name: &str) -> Result<Self> {
        Self::new(
            &format!("({})", regex::escape(name)),
            vec![
                BranchTransform::ReplaceUnexpectedCharsUnderscore,
                BranchTransform::LowercaseEn,
            ],
        )
    }

    /// Policy matching exactly `name` and producing no qualifier
    pub fn ignore_branch_name(name: &str) -> Result<Self> {
        Self::new(
            &format!("({})", regex::escape(name)),
            vec![BranchTransform::Ignore],
        )
    }

    /// Catch-all policy used when no other policy applies
    pub fn default_fallback() -> Result<Self> {
        Self::new(
            "(.*)",
            vec![
                BranchTransform::RemoveUnexpectedChars,
                BranchTransform::LowercaseEn,
            ],
        )
    }

    pub fn pattern(&self) -> &str {
        &self.source
    }

    pub fn transforms(&self) -> &[BranchTransform] {
        &self.transforms
    }

    /// True when the pattern matches the whole branch name
    pub fn applies_on(&self, branch: &str) -> bool {
        self.pattern.is_match(branch)
    }

    /// Qualifier for `branch`, or `None` when a transform yields no value
    pub fn qualifier(&self, branch: &str) -> Option<String> {
        let captured = self.pattern.captures(branch)?.get(1)?.as_str().to_string();

        self.transforms
            .iter()
            .try_fold(captured, |current, transform| transform.apply(&current))
            .filter(|q| !q.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transforms() {
        assert_eq!(
            BranchTransform::Identity.apply("feat/X 1"),
            Some("feat/X 1".to_string())
        );
        assert_eq!(
            BranchTransform::RemoveUnexpectedChars.apply("a b-c#d/e\\f"),
            Some("abcdef".to_string())
        );
        assert_eq!(
            BranchTransform::ReplaceUnexpectedCharsUnderscore.apply("a b--c"),
            Some("a_b_c".to_string())
        );
        assert_eq!(
            BranchTransform::UppercaseEn.apply("istanbul"),
            Some("ISTANBUL".to_string())
        );
        assert_eq!(
            BranchTransform::Lowercase.apply("MiXeD"),
            Some("mixed".to_string())
        );
        assert_eq!(BranchTransform::Ignore.apply("anything"), None);
    }

    #[test]
    fn test_transform_from_str() {
        assert_eq!(
            "lowercase_en".parse::<BranchTransform>().unwrap(),
            BranchTransform::LowercaseEn
        );
        assert_eq!(
            "IGNORE".parse::<BranchTransform>().unwrap(),
            BranchTransform::Ignore
        );
        assert!("SHOUT".parse::<BranchTransform>().is_err());
    }

    #[test]
    fn test_fixed_branch_name() {
        let policy = BranchingPolicy::fixed_branch_name("MY-BRAnch").unwrap();
        assert!(policy.applies_on("MY-BRAnch"));
        assert!(!policy.applies_on("my-branch"));
        assert!(!policy.applies_on("MY-BRAnch2"));
        assert!(!policy.applies_on("xMY-BRAnch"));

        let qualifier = policy.qualifier("MY-BRAnch").unwrap();
        assert!(qualifier.contains('_'));
        assert!(!qualifier.chars().any(|c| c.is_uppercase()));
        assert_eq!(qualifier, "my_branch");
    }

    #[test]
    fn test_fixed_branch_name_escapes_regex() {
        let policy = BranchingPolicy::fixed_branch_name("release/1.x").unwrap();
        assert!(policy.applies_on("release/1.x"));
        assert!(!policy.applies_on("release/1-x"));
    }

    #[test]
    fn test_ignore_branch_name() {
        let policy = BranchingPolicy::ignore_branch_name("master").unwrap();
        assert!(policy.applies_on("master"));
        assert_eq!(policy.qualifier("master"), None);
    }

    #[test]
    fn test_custom_policy_uses_first_group() {
        let policy = BranchingPolicy::new(
            "feature/(.*)",
            vec![BranchTransform::RemoveUnexpectedChars, BranchTransform::Uppercase],
        )
        .unwrap();
        assert!(policy.applies_on("feature/login-page"));
        assert!(!policy.applies_on("bugfix/login-page"));
        assert_eq!(
            policy.qualifier("feature/login-page"),
            Some("LOGINPAGE".to_string())
        );
    }

    #[test]
    fn test_policy_requires_capture_group() {
        let err = BranchingPolicy::new("main", vec![]).unwrap_err();
        assert!(err.to_string().contains("capture group"));
    }

    #[test]
    fn test_policy_rejects_invalid_regex() {
        assert!(BranchingPolicy::new("(unclosed", vec![]).is_err());
    }

    #[test]
    fn test_empty_result_is_no_qualifier() {
        let policy = BranchingPolicy::default_fallback().unwrap();
        assert_eq!(policy.qualifier("--"), None);
        assert_eq!(
            policy.qualifier("Feature/Big-Thing"),
            Some("featurebigthing".to_string())
        );
    }
}
