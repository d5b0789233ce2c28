use crate::error::Result;
use crate::git::Repository;
use git2::Oid;
use std::collections::{HashSet, VecDeque};

/// Breadth-first walk over the full parent graph.
///
/// Returns `start` and its ancestors paired with their shortest edge count,
/// in non-decreasing distance order. Parents are visited in parent order so
/// the result is stable for a fixed repository state. With `max_depth`,
/// commits further than that many edges are not visited.
pub fn breadth_first<R: Repository + ?Sized>(
    repo: &R,
    start: Oid,
    max_depth: Option<u32>,
) -> Result<Vec<(Oid, u32)>> {
    breadth_first_until(repo, start, max_depth, |_, _| false)
}

/// Same walk as [breadth_first], but the parents of a commit for which
/// `stop` returns true are not explored (the commit itself is reported).
pub fn breadth_first_until<R, F>(
    repo: &R,
    start: Oid,
    max_depth: Option<u32>,
    mut stop: F,
) -> Result<Vec<(Oid, u32)>>
where
    R: Repository + ?Sized,
    F: FnMut(Oid, u32) -> bool,
{
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([(start, 0u32)]);
    let mut walked = Vec::new();

    while let Some((id, distance)) = queue.pop_front() {
        walked.push((id, distance));

        if max_depth.is_some_and(|max| distance >= max) || stop(id, distance) {
            continue;
        }

        for parent in repo.parents(id)? {
            if visited.insert(parent) {
                queue.push_back((parent, distance + 1));
            }
        }
    }

    Ok(walked)
}

/// Shortest distance between two commits along parent links
pub struct DistanceCalculator<'r, R: Repository> {
    repo: &'r R,
    max_depth: Option<u32>,
}

impl<'r, R: Repository> DistanceCalculator<'r, R> {
    /// Create a calculator; `max_depth` caps the number of edges walked
    pub fn new(repo: &'r R, max_depth: Option<u32>) -> Self {
        DistanceCalculator { repo, max_depth }
    }

    /// Number of edges from `from` back to `target`.
    ///
    /// # Returns
    /// * `Ok(Some(n))` - `target` is an ancestor of `from` (or `from` itself)
    ///   within the depth bound
    /// * `Ok(None)` - `target` is not reachable within the bound
    pub fn distance(&self, from: Oid, target: Oid) -> Result<Option<u32>> {
        if from == target {
            return Ok(Some(0));
        }

        let mut visited = HashSet::from([from]);
        let mut queue = VecDeque::from([(from, 0u32)]);

        while let Some((id, distance)) = queue.pop_front() {
            if self.max_depth.is_some_and(|max| distance >= max) {
                continue;
            }

            for parent in self.repo.parents(id)? {
                if parent == target {
                    return Ok(Some(distance + 1));
                }
                if visited.insert(parent) {
                    queue.push_back((parent, distance + 1));
                }
            }
        }

        Ok(None)
    }

    /// Every commit reachable from `from` within the bound, nearest first
    pub fn reachable(&self, from: Oid) -> Result<Vec<(Oid, u32)>> {
        breadth_first(self.repo, from, self.max_depth)
    }
}
