use super::tag::TagRef;
use git2::Oid;

/// Projection of a commit used by the version strategies.
///
/// Equality is by id alone; `head_distance` is informational.
#[derive(Debug, Clone)]
pub struct Commit {
    pub id: Oid,
    /// Edges between the current position and this commit
    pub head_distance: u32,
    pub annotated_tags: Vec<TagRef>,
    pub light_tags: Vec<TagRef>,
}

impl Commit {
    pub fn new(
        id: Oid,
        head_distance: u32,
        annotated_tags: Vec<TagRef>,
        light_tags: Vec<TagRef>,
    ) -> Self {
        Commit {
            id,
            head_distance,
            annotated_tags,
            light_tags,
        }
    }

    /// A commit without tags
    pub fn untagged(id: Oid, head_distance: u32) -> Self {
        Self::new(id, head_distance, Vec::new(), Vec::new())
    }

    pub fn has_tags(&self) -> bool {
        !self.annotated_tags.is_empty() || !self.light_tags.is_empty()
    }

    /// Full 40 character hex id
    pub fn sha1(&self) -> String {
        self.id.to_string()
    }

    /// Leading `len` hex characters of the id
    pub fn short_sha1(&self, len: usize) -> String {
        let full = self.sha1();
        full[..len.min(full.len())].to_string()
    }
}

impl PartialEq for Commit {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Commit {}
