//! Diagnostic values produced while computing a version

use crate::error::{GitVersionError, Result};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

macro_rules! metadata_keys {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Keys of the values registered during one computation
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Metadata {
            $($variant),+
        }

        impl Metadata {
            /// Every key, in declaration order
            pub const ALL: &'static [Metadata] = &[$(Metadata::$variant),+];

            pub fn name(&self) -> &'static str {
                match self {
                    $(Metadata::$variant => $name),+
                }
            }
        }
    };
}

metadata_keys! {
    CalculatedVersion => "CALCULATED_VERSION",
    BaseVersion => "BASE_VERSION",
    BaseTag => "BASE_TAG",
    BaseTagType => "BASE_TAG_TYPE",
    BaseCommitOnHead => "BASE_COMMIT_ON_HEAD",
    CommitDistance => "COMMIT_DISTANCE",
    CommitTimestamp => "COMMIT_TIMESTAMP",
    BranchName => "BRANCH_NAME",
    QualifiedBranchName => "QUALIFIED_BRANCH_NAME",
    DetachedHead => "DETACHED_HEAD",
    Dirty => "DIRTY",
    GitSha1Full => "GIT_SHA1_FULL",
    GitSha1Short => "GIT_SHA1_8",
    HeadTags => "HEAD_TAGS",
    HeadAnnotatedTags => "HEAD_ANNOTATED_TAGS",
    HeadLightweightTags => "HEAD_LIGHTWEIGHT_TAGS",
    AllTags => "ALL_TAGS",
    AllAnnotatedTags => "ALL_ANNOTATED_TAGS",
    AllLightweightTags => "ALL_LIGHTWEIGHT_TAGS",
    AllVersionTags => "ALL_VERSION_TAGS",
    AllVersionAnnotatedTags => "ALL_VERSION_ANNOTATED_TAGS",
    AllVersionLightweightTags => "ALL_VERSION_LIGHTWEIGHT_TAGS",
    NextMajorVersion => "NEXT_MAJOR_VERSION",
    NextMinorVersion => "NEXT_MINOR_VERSION",
    NextPatchVersion => "NEXT_PATCH_VERSION",
    CurrentVersionMajor => "CURRENT_VERSION_MAJOR",
    CurrentVersionMinor => "CURRENT_VERSION_MINOR",
    CurrentVersionPatch => "CURRENT_VERSION_PATCH",
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metadata {
    type Err = GitVersionError;

    fn from_str(s: &str) -> Result<Self> {
        Metadata::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GitVersionError::config(format!("Unknown metadata: '{}'", s)))
    }
}

/// Write-once store of metadata values, scoped to one computation
#[derive(Debug, Clone, Default)]
pub struct MetadataRegistry {
    values: HashMap<Metadata, String>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` for `key`. Later writes to the same key are ignored.
    pub fn register(&mut self, key: Metadata, value: impl Into<String>) {
        let value = value.into();
        match self.values.get(&key) {
            Some(existing) => {
                tracing::trace!(%key, %existing, ignored = %value, "metadata already registered");
            }
            None => {
                self.values.insert(key, value);
            }
        }
    }

    pub fn get(&self, key: Metadata) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }
}
