use crate::domain::TagRef;
use crate::error::{GitVersionError, Result};
use crate::git::CommitInfo;
use git2::{ErrorCode, Oid, Repository as Git2Repo, StatusOptions};
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn read_tag(&self, name: &str) -> Result<Option<TagRef>> {
        let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;

        let Some(target) = reference.target() else {
            return Ok(None);
        };

        let commit = match reference.peel_to_commit() {
            Ok(commit) => commit,
            Err(e) => {
                tracing::debug!(tag = name, error = %e, "tag does not resolve to a commit");
                return Ok(None);
            }
        };

        let tag = match self.repo.find_tag(target) {
            Ok(tag_object) => TagRef::annotated(
                name,
                commit.id(),
                tag_object.id(),
                tag_object.tagger().map(|sig| sig.when().seconds()),
            ),
            Err(e) if e.code() == ErrorCode::NotFound => TagRef::lightweight(name, commit.id()),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(tag))
    }
}

impl super::Repository for Git2Repository {
    fn head(&self) -> Result<Option<Oid>> {
        match self.repo.head() {
            Ok(reference) => Ok(Some(reference.peel_to_commit()?.id())),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn current_branch(&self) -> Result<Option<String>> {
        if self.repo.head_detached()? {
            return Ok(None);
        }

        match self.repo.head() {
            Ok(reference) if reference.is_branch() => {
                Ok(reference.shorthand().map(|s| s.to_string()))
            }
            Ok(_) => Ok(None),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn is_dirty(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(false)
            .include_ignored(false)
            .exclude_submodules(true);

        let statuses = self.repo.statuses(Some(&mut options))?;

        Ok(!statuses.is_empty())
    }

    fn list_tags(&self) -> Result<Vec<TagRef>> {
        let names = self.repo.tag_names(None)?;

        let mut tags = Vec::new();
        for name in names.iter().flatten() {
            if let Some(tag) = self.read_tag(name)? {
                tags.push(tag);
            }
        }

        Ok(tags)
    }

    fn parents(&self, id: Oid) -> Result<Vec<Oid>> {
        let commit = self.repo.find_commit(id)?;

        Ok(commit.parent_ids().collect())
    }

    fn read_commit(&self, id: Oid) -> Result<CommitInfo> {
        let commit = self.repo.find_commit(id)?;
        let author = commit.author();

        Ok(CommitInfo {
            id,
            author_name: author.name().unwrap_or("unknown").to_string(),
            author_email: author.email().unwrap_or("unknown").to_string(),
            time: author.when().seconds(),
        })
    }
}

impl std::fmt::Debug for Git2Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git2Repository")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl From<Git2Repo> for Git2Repository {
    fn from(repo: Git2Repo) -> Self {
        Git2Repository::from_git2(repo)
    }
}

/// Open `path`, mapping "not a repository" to `None`
pub fn open_if_repository<P: AsRef<Path>>(path: P) -> Result<Option<Git2Repository>> {
    match Git2Repository::open(path) {
        Ok(repo) => Ok(Some(repo)),
        Err(GitVersionError::Git(e)) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
