use crate::error::{GitVersionError, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Qualifier appended to versions that are not releases.
pub const SNAPSHOT: &str = "SNAPSHOT";

const NOT_GIT_QUALIFIER: &str = "NOT_GIT_VERSION";
const EMPTY_REPOSITORY_QUALIFIER: &str = "EMPTY_GIT_REPOSITORY";

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d+)(?:\.(\d+)(?:\.(\d+))?)?(?:-([0-9A-Za-z_.\-]+))?$")
            .expect("version grammar is a valid regex")
    })
}

/// Immutable semantic version with an ordered list of qualifiers.
///
/// The string form is rendered once at construction. Every mutator returns a
/// new instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    major: u32,
    minor: u32,
    patch: u32,
    qualifiers: Vec<String>,
    rendered: String,
}

impl Version {
    /// Create an unqualified version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self::with_qualifiers(major, minor, patch, Vec::new())
    }

    /// Create a version carrying the given qualifiers, in order
    pub fn with_qualifiers(major: u32, minor: u32, patch: u32, qualifiers: Vec<String>) -> Self {
        let mut rendered = format!("{}.{}.{}", major, minor, patch);
        for qualifier in &qualifiers {
            rendered.push('-');
            rendered.push_str(qualifier);
        }

        Version {
            major,
            minor,
            patch,
            qualifiers,
            rendered,
        }
    }

    /// `0.0.0`, the base used when no version tag is reachable
    pub fn zero() -> Self {
        Self::new(0, 0, 0)
    }

    /// Sentinel for a directory that is not a readable repository
    pub fn not_git_repository() -> Self {
        Self::with_qualifiers(0, 0, 0, vec![NOT_GIT_QUALIFIER.to_string()])
    }

    /// Sentinel for a repository without any commit
    pub fn empty_repository() -> Self {
        Self::with_qualifiers(0, 0, 0, vec![EMPTY_REPOSITORY_QUALIFIER.to_string()])
    }

    /// Parse `major[.minor[.patch]][-qualifier[-qualifier...]]`
    pub fn parse(input: &str) -> Result<Self> {
        let captures = version_regex()
            .captures(input)
            .ok_or_else(|| GitVersionError::version_parse(input, "is not a valid version"))?;

        let number = |index: usize| -> Result<u32> {
            match captures.get(index) {
                Some(m) => m.as_str().parse::<u32>().map_err(|_| {
                    GitVersionError::version_parse(
                        input,
                        format!("has an out of range number '{}'", m.as_str()),
                    )
                }),
                None => Ok(0),
            }
        };

        let major = number(1)?;
        let minor = number(2)?;
        let patch = number(3)?;

        let qualifiers = match captures.get(4) {
            Some(m) => {
                let parts: Vec<String> = m.as_str().split('-').map(str::to_string).collect();
                if parts.iter().any(|p| p.is_empty()) {
                    return Err(GitVersionError::version_parse(
                        input,
                        "contains an empty qualifier",
                    ));
                }
                if parts.iter().any(|p| p.split('.').any(str::is_empty)) {
                    return Err(GitVersionError::version_parse(
                        input,
                        "contains an empty dot-separated identifier",
                    ));
                }
                parts
            }
            None => Vec::new(),
        };

        Ok(Self::with_qualifiers(major, minor, patch, qualifiers))
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }

    pub fn qualifiers(&self) -> &[String] {
        &self.qualifiers
    }

    pub fn is_qualified(&self) -> bool {
        !self.qualifiers.is_empty()
    }

    /// The rendered string, computed at construction
    pub fn as_str(&self) -> &str {
        &self.rendered
    }

    /// Next major version, minor and patch reset, qualifiers kept
    pub fn increment_major(&self) -> Self {
        Self::with_qualifiers(self.major + 1, 0, 0, self.qualifiers.clone())
    }

    /// Next minor version, patch reset, qualifiers kept
    pub fn increment_minor(&self) -> Self {
        Self::with_qualifiers(self.major, self.minor + 1, 0, self.qualifiers.clone())
    }

    /// Next patch version, qualifiers kept
    pub fn increment_patch(&self) -> Self {
        Self::with_qualifiers(
            self.major,
            self.minor,
            self.patch + 1,
            self.qualifiers.clone(),
        )
    }

    /// Append a qualifier. Empty qualifiers are ignored.
    pub fn add_qualifier(&self, qualifier: impl AsRef<str>) -> Self {
        let qualifier = qualifier.as_ref();
        if qualifier.is_empty() {
            return self.clone();
        }
        let mut qualifiers = self.qualifiers.clone();
        qualifiers.push(qualifier.to_string());
        Self::with_qualifiers(self.major, self.minor, self.patch, qualifiers)
    }

    /// Remove the last occurrence of a qualifier, if present
    pub fn remove_qualifier(&self, qualifier: &str) -> Self {
        let mut qualifiers = self.qualifiers.clone();
        if let Some(pos) = qualifiers.iter().rposition(|q| q == qualifier) {
            qualifiers.remove(pos);
        }
        Self::with_qualifiers(self.major, self.minor, self.patch, qualifiers)
    }

    /// Same numbers, no qualifiers
    pub fn no_qualifier(&self) -> Self {
        Self::new(self.major, self.minor, self.patch)
    }

    /// Qualifiers split into SemVer identifiers
    fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.qualifiers.iter().flat_map(|q| q.split('.'))
    }
}

fn is_numeric(identifier: &str) -> bool {
    !identifier.is_empty() && identifier.bytes().all(|b| b.is_ascii_digit())
}

/// SemVer identifier precedence. Numeric identifiers are compared without
/// parsing so arbitrarily long digit runs cannot overflow.
fn compare_identifiers(a: &str, b: &str) -> Ordering {
    match (is_numeric(a), is_numeric(b)) {
        (true, true) => {
            let a = a.trim_start_matches('0');
            let b = b.trim_start_matches('0');
            a.len().cmp(&b.len()).then_with(|| a.cmp(b))
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (self.is_qualified(), other.is_qualified()) {
                (false, false) => Ordering::Equal,
                (false, true) => Ordering::Greater,
                (true, false) => Ordering::Less,
                (true, true) => {
                    let mut left = self.identifiers();
                    let mut right = other.identifiers();
                    loop {
                        match (left.next(), right.next()) {
                            (None, None) => return Ordering::Equal,
                            (None, Some(_)) => return Ordering::Less,
                            (Some(_), None) => return Ordering::Greater,
                            (Some(a), Some(b)) => match compare_identifiers(a, b) {
                                Ordering::Equal => continue,
                                decided => return decided,
                            },
                        }
                    }
                }
            })
            // keeps Ord consistent with Eq for "a.b" vs "a-b"
            .then_with(|| self.qualifiers.cmp(&other.qualifiers))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

impl FromStr for Version {
    type Err = GitVersionError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl TryFrom<&Version> for semver::Version {
    type Error = GitVersionError;

    /// Strict SemVer view; fails when a qualifier uses characters SemVer
    /// does not allow (for example `_`).
    fn try_from(version: &Version) -> Result<Self> {
        let mut strict = semver::Version::new(
            u64::from(version.major),
            u64::from(version.minor),
            u64::from(version.patch),
        );
        if version.is_qualified() {
            strict.pre = semver::Prerelease::new(&version.qualifiers.join(".")).map_err(|e| {
                GitVersionError::version_parse(version.as_str(), format!("is not SemVer: {e}"))
            })?;
        }
        Ok(strict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_version_parse() {
        let version = v("1.2.3");
        assert_eq!(version.major(), 1);
        assert_eq!(version.minor(), 2);
        assert_eq!(version.patch(), 3);
        assert!(!version.is_qualified());
    }

    #[test]
    fn test_version_parse_partial() {
        assert_eq!(v("1"), Version::new(1, 0, 0));
        assert_eq!(v("1.2"), Version::new(1, 2, 0));
        assert_eq!(v("1.2").to_string(), "1.2.0");
    }

    #[test]
    fn test_version_parse_qualifiers() {
        let version = v("1.0.0-rc.1-SNAPSHOT");
        assert_eq!(version.qualifiers(), &["rc.1", "SNAPSHOT"]);
        assert_eq!(version.to_string(), "1.0.0-rc.1-SNAPSHOT");
    }

    #[test]
    fn test_version_parse_invalid() {
        for input in ["", "v1.0.0", "1.0.0-", "1.0.0--a", "1.0.0-a/b", "1.2.3.4", "a.b.c"] {
            assert!(Version::parse(input).is_err(), "{input} should not parse");
        }
    }

    #[test]
    fn test_version_parse_empty_identifier() {
        for input in ["1.0.0-.", "1.0.0-a..b", "1.0.0-.rc", "1.0.0-rc.", "1.0.0-a-.b"] {
            let err = Version::parse(input).unwrap_err();
            assert!(
                err.to_string().contains("empty dot-separated identifier"),
                "{input}: {err}"
            );
        }
        assert_eq!(v("1.0.0-rc.1").qualifiers(), &["rc.1"]);
    }

    #[test]
    fn test_version_parse_overflow() {
        let err = Version::parse("99999999999.0.0").unwrap_err();
        assert!(err.to_string().contains("99999999999"));
    }

    #[test]
    fn test_round_trip() {
        for input in ["0", "1.2", "3.4.5", "1.0.0-alpha", "2.1.0-feature_x-12-abcdef12"] {
            let parsed = v(input);
            assert_eq!(v(&parsed.to_string()), parsed);
        }
    }

    #[test]
    fn test_semver_precedence() {
        let ordered = [
            "1.0.0-alpha",
            "1.0.0-alpha.1",
            "1.0.0-alpha.beta",
            "1.0.0-beta",
            "1.0.0-beta.2",
            "1.0.0-beta.11",
            "1.0.0-rc.1",
            "1.0.0",
            "1.0.1",
            "1.1.0",
            "2.0.0",
        ];
        for pair in ordered.windows(2) {
            assert!(v(pair[0]) < v(pair[1]), "{} < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_numeric_identifier_lower_than_alphanumeric() {
        assert!(v("1.0.0-1") < v("1.0.0-a"));
        assert!(v("1.0.0-2") < v("1.0.0-10"));
    }

    #[test]
    fn test_ordering_consistent_with_equality() {
        let dotted = v("1.0.0-a.b");
        let dashed = v("1.0.0-a-b");
        assert_ne!(dotted, dashed);
        assert_ne!(dotted.cmp(&dashed), Ordering::Equal);
    }

    #[test]
    fn test_add_then_remove_qualifier_restores() {
        let original = v("1.2.3-beta");
        let restored = original.add_qualifier("beta").remove_qualifier("beta");
        assert_eq!(restored, original);
        assert_eq!(original.to_string(), "1.2.3-beta");
    }

    #[test]
    fn test_mutators_return_new_instances() {
        let base = v("1.2.3");
        let bumped = base.increment_patch().add_qualifier("5");
        assert_eq!(base.to_string(), "1.2.3");
        assert_eq!(bumped.to_string(), "1.2.4-5");
        assert_eq!(base.increment_minor().to_string(), "1.3.0");
        assert_eq!(base.increment_major().to_string(), "2.0.0");
        assert_eq!(bumped.no_qualifier().to_string(), "1.2.4");
    }

    #[test]
    fn test_add_empty_qualifier_is_noop() {
        assert_eq!(v("1.0.0").add_qualifier(""), v("1.0.0"));
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(Version::not_git_repository().to_string(), "0.0.0-NOT_GIT_VERSION");
        assert_eq!(
            Version::empty_repository().to_string(),
            "0.0.0-EMPTY_GIT_REPOSITORY"
        );
    }

    #[test]
    fn test_semver_conversion() {
        let strict = semver::Version::try_from(&v("1.2.3-rc.1-4")).unwrap();
        assert_eq!(strict.to_string(), "1.2.3-rc.1.4");
        assert!(semver::Version::try_from(&v("1.0.0-my_branch")).is_err());
    }
}
