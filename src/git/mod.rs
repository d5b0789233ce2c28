//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the read-only
//! repository queries the version engine needs, allowing for a real
//! implementation backed by libgit2 and an in-memory one for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations are:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory commit graph for testing
//!
//! # Usage
//!
//! Engine code depends on the [Repository] trait rather than concrete
//! implementations.
//!
//! ```rust
//! # use git_semver::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> git_semver::Result<()> {
//! if let Some(head) = repo.head()? {
//!     for ancestor in repo.walk_ancestors(head, Some(10))? {
//!         println!("{} at distance {}", ancestor.id, ancestor.distance);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::analyzer::distance::breadth_first;
use crate::domain::TagRef;
use crate::error::Result;
use git2::Oid;

/// Author information of a commit
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    pub id: Oid,
    pub author_name: String,
    pub author_email: String,
    /// Author time in seconds since the epoch
    pub time: i64,
}

/// One entry of an ancestor walk
#[derive(Debug, Clone, PartialEq)]
pub struct Ancestor {
    pub id: Oid,
    /// `Name <email>` of the commit author
    pub author: String,
    /// Shortest number of parent edges from the walk start
    pub distance: u32,
}

/// Read-only repository queries consumed by the version engine
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to [crate::error::GitVersionError].
/// Absence (no commit yet, detached position) is expressed with `Option`,
/// never with an error.
///
/// ## Implementations
///
/// - [Git2Repository](repository::Git2Repository): Real Git implementation using the `git2` crate
/// - [MockRepository](mock::MockRepository): Test implementation with an in-memory graph
pub trait Repository {
    /// Commit at the current position
    ///
    /// # Returns
    /// * `Ok(Some(Oid))` - The commit currently checked out
    /// * `Ok(None)` - The repository has no commit yet
    fn head(&self) -> Result<Option<Oid>>;

    /// Name of the checked out branch
    ///
    /// # Returns
    /// * `Ok(Some(name))` - Short branch name, e.g. `main`
    /// * `Ok(None)` - Detached position or no commit yet
    fn current_branch(&self) -> Result<Option<String>>;

    /// True when the working tree has uncommitted modifications of tracked
    /// files relative to the current position
    fn is_dirty(&self) -> Result<bool>;

    /// Every tag of the repository that resolves to a commit
    fn list_tags(&self) -> Result<Vec<TagRef>>;

    /// Direct parents of a commit, in parent order
    fn parents(&self, id: Oid) -> Result<Vec<Oid>>;

    /// Author name, email and time of a commit
    fn read_commit(&self, id: Oid) -> Result<CommitInfo>;

    /// Ancestors of `start` (itself included) in breadth-first order with
    /// their shortest distance, limited to `max_depth` edges when given
    ///
    /// # Example
    /// ```rust
    /// # use git_semver::git::Repository;
    /// # use git2::Oid;
    /// # fn example<R: Repository>(repo: &R, head: Oid) -> git_semver::Result<()> {
    /// let walked = repo.walk_ancestors(head, Some(2))?;
    /// assert!(walked.iter().all(|a| a.distance <= 2));
    /// # Ok(())
    /// # }
    /// ```
    fn walk_ancestors(&self, start: Oid, max_depth: Option<u32>) -> Result<Vec<Ancestor>> {
        breadth_first(self, start, max_depth)?
            .into_iter()
            .map(|(id, distance)| {
                let info = self.read_commit(id)?;
                Ok(Ancestor {
                    id,
                    author: format!("{} <{}>", info.author_name, info.author_email),
                    distance,
                })
            })
            .collect()
    }
}
