use crate::analyzer::distance::{breadth_first, breadth_first_until, DistanceCalculator};
use crate::domain::{Commit, TagRef, Version, VersionNamingConfiguration};
use crate::error::{GitVersionError, Result};
use crate::git::Repository;
use git2::Oid;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// How a base tag is chosen among several reachable candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupPolicy {
    /// Greatest version wins, first encountered on ties
    #[default]
    Max,
    Latest,
    Nearest,
}

impl LookupPolicy {
    /// Fails for the policies that have no defined tie-break semantics yet
    pub fn ensure_implemented(&self) -> Result<()> {
        match self {
            LookupPolicy::Max => Ok(()),
            other => Err(GitVersionError::config(format!(
                "Lookup policy {} is not implemented",
                other
            ))),
        }
    }
}

impl fmt::Display for LookupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupPolicy::Max => write!(f, "MAX"),
            LookupPolicy::Latest => write!(f, "LATEST"),
            LookupPolicy::Nearest => write!(f, "NEAREST"),
        }
    }
}

impl FromStr for LookupPolicy {
    type Err = GitVersionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "max" => Ok(LookupPolicy::Max),
            "latest" => Ok(LookupPolicy::Latest),
            "nearest" => Ok(LookupPolicy::Nearest),
            _ => Err(GitVersionError::config(format!(
                "Unknown lookup policy: '{}'",
                s
            ))),
        }
    }
}

/// A version tag with its parsed version
#[derive(Debug, Clone)]
struct VersionTag {
    tag: TagRef,
    version: Version,
}

/// Classifies tags and selects base commits.
///
/// Built once per computation from the repository's tag list.
#[derive(Debug)]
pub struct TagResolver {
    all_tags: Vec<TagRef>,
    version_tags: HashMap<Oid, Vec<VersionTag>>,
}

impl TagResolver {
    /// Classify `tags`; a tag is version-eligible when the naming
    /// configuration recognises its whole name and the extracted text parses
    /// as a version. A recognised tag that does not parse is skipped.
    pub fn new(naming: &VersionNamingConfiguration, tags: Vec<TagRef>) -> Self {
        let mut version_tags: HashMap<Oid, Vec<VersionTag>> = HashMap::new();

        for tag in &tags {
            match naming.extract_version(&tag.name) {
                Ok(Some(version)) => {
                    tracing::trace!(tag = %tag.name, kind = %tag.kind(), %version, "version tag");
                    version_tags.entry(tag.target).or_default().push(VersionTag {
                        tag: tag.clone(),
                        version,
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(tag = %tag.name, error = %e, "ignoring tag with unusable version");
                }
            }
        }

        TagResolver {
            all_tags: tags,
            version_tags,
        }
    }

    pub fn all_tags(&self) -> &[TagRef] {
        &self.all_tags
    }

    /// Every version-eligible tag, in repository order
    pub fn version_tags(&self) -> impl Iterator<Item = &TagRef> {
        self.all_tags.iter().filter(|tag| {
            self.version_tags
                .get(&tag.target)
                .is_some_and(|tags| tags.iter().any(|vt| vt.tag.name == tag.name))
        })
    }

    /// All tags, version-eligible or not, pointing at `id`
    pub fn tags_at(&self, id: Oid) -> impl Iterator<Item = &TagRef> {
        self.all_tags.iter().filter(move |tag| tag.target == id)
    }

    pub fn has_version_tags(&self, id: Oid) -> bool {
        self.version_tags.contains_key(&id)
    }

    /// Projection of `id` carrying its version tags
    pub fn commit(&self, id: Oid, head_distance: u32) -> Commit {
        let (annotated, light): (Vec<_>, Vec<_>) = self
            .version_tags
            .get(&id)
            .map(|tags| tags.iter().map(|vt| vt.tag.clone()).collect::<Vec<_>>())
            .unwrap_or_default()
            .into_iter()
            .partition(TagRef::is_annotated);

        Commit::new(id, head_distance, annotated, light)
    }

    /// Parsed version of a version-eligible tag
    pub fn version_of(&self, tag: &TagRef) -> Option<&Version> {
        self.version_tags
            .get(&tag.target)?
            .iter()
            .find(|vt| vt.tag.name == tag.name)
            .map(|vt| &vt.version)
    }

    /// Tag to take the version from on `commit`.
    ///
    /// Annotated tags win when `prefer_annotated` (the commit is the current
    /// position and the tree is clean); lightweight tags win otherwise. Within
    /// a kind the greatest version is used.
    pub fn tag_to_use<'c>(&self, commit: &'c Commit, prefer_annotated: bool) -> Option<&'c TagRef> {
        let greatest = |tags: &'c [TagRef]| -> Option<&'c TagRef> {
            let mut best: Option<(&'c TagRef, &Version)> = None;
            for tag in tags {
                if let Some(version) = self.version_of(tag) {
                    if best.map_or(true, |(_, current)| version > current) {
                        best = Some((tag, version));
                    }
                }
            }
            best.map(|(tag, _)| tag)
        };

        let (first, second) = if prefer_annotated {
            (&commit.annotated_tags, &commit.light_tags)
        } else {
            (&commit.light_tags, &commit.annotated_tags)
        };

        greatest(first).or_else(|| greatest(second))
    }

    /// Candidate base commits reachable from `head`, ordered by `policy`.
    ///
    /// The collecting walk does not look past a commit carrying a version
    /// tag, so each candidate's `head_distance` is measured again over the
    /// full graph. An empty result means no version tag is reachable within
    /// `max_depth`.
    pub fn candidate_bases<R: Repository>(
        &self,
        repo: &R,
        head: Oid,
        dirty: bool,
        max_depth: Option<u32>,
        policy: LookupPolicy,
    ) -> Result<Vec<Commit>> {
        policy.ensure_implemented()?;

        let walked = breadth_first_until(repo, head, max_depth, |id, _| {
            self.has_version_tags(id)
        })?;

        let distances = DistanceCalculator::new(repo, max_depth);
        let mut candidates = self.tagged(walked);
        for commit in &mut candidates {
            if let Some(distance) = distances.distance(head, commit.id)? {
                commit.head_distance = distance;
            }
        }
        tracing::debug!(count = candidates.len(), "candidate base commits");

        Ok(self.sort_by_version(candidates, head, dirty))
    }

    /// Every tagged commit within `search_depth` of `head`, greatest version
    /// first, without stopping at the nearest tags
    pub fn max_version_candidates<R: Repository>(
        &self,
        repo: &R,
        head: Oid,
        dirty: bool,
        search_depth: u32,
    ) -> Result<Vec<Commit>> {
        let walked = breadth_first(repo, head, Some(search_depth))?;

        Ok(self.sort_by_version(self.tagged(walked), head, dirty))
    }

    /// Synthetic base used when no version tag is reachable: the deepest
    /// ancestor within `max_depth`
    pub fn fallback_base<R: Repository>(
        &self,
        repo: &R,
        head: Oid,
        max_depth: Option<u32>,
    ) -> Result<Commit> {
        let walked = DistanceCalculator::new(repo, max_depth).reachable(head)?;
        let (id, distance) = walked.last().copied().unwrap_or((head, 0));

        tracing::debug!(%id, distance, "no version tag reachable, using deepest ancestor");
        Ok(Commit::untagged(id, distance))
    }

    fn tagged(&self, walked: Vec<(Oid, u32)>) -> Vec<Commit> {
        walked
            .into_iter()
            .filter(|(id, _)| self.has_version_tags(*id))
            .map(|(id, distance)| self.commit(id, distance))
            .collect()
    }

    /// Greatest version first; the sort is stable so walk order breaks ties
    fn sort_by_version(&self, mut commits: Vec<Commit>, head: Oid, dirty: bool) -> Vec<Commit> {
        let version = |commit: &Commit| -> Option<Version> {
            let prefer_annotated = commit.id == head && !dirty;
            self.tag_to_use(commit, prefer_annotated)
                .and_then(|tag| self.version_of(tag))
                .cloned()
        };

        commits.sort_by_cached_key(|commit| std::cmp::Reverse(version(commit)));
        commits
    }
}
