use crate::domain::TagRef;
use crate::error::{GitVersionError, Result};
use crate::git::{CommitInfo, Repository};
use git2::{ObjectType, Oid};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct MockCommit {
    parents: Vec<Oid>,
    info: CommitInfo,
}

/// In-memory commit graph for testing without actual git operations
#[derive(Debug, Clone)]
pub struct MockRepository {
    commits: HashMap<Oid, MockCommit>,
    tags: Vec<TagRef>,
    head: Option<Oid>,
    branch: Option<String>,
    dirty: bool,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: HashMap::new(),
            tags: Vec::new(),
            head: None,
            branch: None,
            dirty: false,
        }
    }

    /// Add a commit with the given parents
    pub fn add_commit(&mut self, oid: Oid, parents: &[Oid]) {
        let time = 1_600_000_000 + self.commits.len() as i64 * 60;
        self.commits.insert(
            oid,
            MockCommit {
                parents: parents.to_vec(),
                info: CommitInfo {
                    id: oid,
                    author_name: "Mock Author".to_string(),
                    author_email: "mock@example.com".to_string(),
                    time,
                },
            },
        );
    }

    /// Add a lightweight tag pointing to an OID
    pub fn add_tag(&mut self, name: impl Into<String>, oid: Oid) {
        self.tags.push(TagRef::lightweight(name, oid));
    }

    /// Add an annotated tag pointing to an OID
    pub fn add_annotated_tag(&mut self, name: impl Into<String>, oid: Oid) {
        let name = name.into();
        let tag_object =
            Oid::hash_object(ObjectType::Tag, format!("tag {}", name).as_bytes()).unwrap_or(oid);
        let time = self.commits.get(&oid).map(|c| c.info.time);
        self.tags
            .push(TagRef::annotated(name, oid, tag_object, time));
    }

    /// Set a branch head and check it out
    pub fn set_branch_head(&mut self, branch: impl Into<String>, oid: Oid) {
        self.branch = Some(branch.into());
        self.head = Some(oid);
    }

    /// Check out a commit without a branch
    pub fn detach_head(&mut self, oid: Oid) {
        self.branch = None;
        self.head = Some(oid);
    }

    /// Mark the working tree as modified
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    fn commit(&self, id: Oid) -> Result<&MockCommit> {
        self.commits.get(&id).ok_or_else(|| {
            GitVersionError::Git(git2::Error::from_str(&format!("Commit not found: {}", id)))
        })
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn head(&self) -> Result<Option<Oid>> {
        Ok(self.head)
    }

    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.branch.clone())
    }

    fn is_dirty(&self) -> Result<bool> {
        Ok(self.dirty)
    }

    fn list_tags(&self) -> Result<Vec<TagRef>> {
        Ok(self.tags.clone())
    }

    fn parents(&self, id: Oid) -> Result<Vec<Oid>> {
        Ok(self.commit(id)?.parents.clone())
    }

    fn read_commit(&self, id: Oid) -> Result<CommitInfo> {
        Ok(self.commit(id)?.info.clone())
    }
}
