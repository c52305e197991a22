//! The set of paths changed by a pull request.
//!
//! Paths can be supplied directly, read from newline separated text, or
//! computed from a local git repository using git2.

use git2::{Commit, DiffFindOptions, Repository};
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::errors::{ChangeSetError, ChangeSetResult};

#[cfg(test)]
#[path = "change_set_tests.rs"]
mod tests;

/// Ordered, duplicate free list of repository-relative paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    paths: Vec<String>,
}

impl ChangeSet {
    /// Builds a change set from raw paths.
    ///
    /// Surrounding whitespace and leading `./` are removed, blank entries are
    /// dropped and repeated paths are kept only once (first occurrence wins).
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut change_set = Self::default();
        for path in paths {
            change_set.push(path.as_ref());
        }
        change_set
    }

    /// Reads newline separated paths, e.g. the output of `git diff --name-only`.
    ///
    /// # Errors
    ///
    /// Returns `ChangeSetError::ReadFailed` if the reader fails or yields
    /// invalid UTF-8.
    pub fn from_reader<R: BufRead>(reader: R, source_name: &str) -> ChangeSetResult<Self> {
        let mut change_set = Self::default();
        for line in reader.lines() {
            let line = line.map_err(|e| ChangeSetError::ReadFailed {
                source_name: source_name.to_string(),
                reason: e.to_string(),
            })?;
            change_set.push(&line);
        }

        debug!(
            source = source_name,
            path_count = change_set.len(),
            "Read changed paths"
        );
        Ok(change_set)
    }

    /// Computes the files changed between two revisions of a local repository.
    ///
    /// With `use_merge_base` the diff starts at the merge base of `base` and
    /// `head`, which is what a pull request shows. Otherwise the two trees
    /// are compared directly.
    ///
    /// Renamed files report their new path and deleted files their old path.
    ///
    /// # Errors
    ///
    /// * `ChangeSetError::RepositoryNotFound` - `repository` is not a git repository
    /// * `ChangeSetError::RevisionNotFound` - a revision does not resolve to a commit
    /// * `ChangeSetError::DiffFailed` - the merge base or diff cannot be computed
    pub fn from_git_diff(
        repository: &Path,
        base: &str,
        head: &str,
        use_merge_base: bool,
    ) -> ChangeSetResult<Self> {
        let repo = Repository::open(repository).map_err(|e| ChangeSetError::RepositoryNotFound {
            path: repository.display().to_string(),
            reason: e.message().to_string(),
        })?;

        let base_commit = resolve_commit(&repo, base)?;
        let head_commit = resolve_commit(&repo, head)?;

        let start_commit = if use_merge_base {
            let oid = repo
                .merge_base(base_commit.id(), head_commit.id())
                .map_err(diff_failed)?;
            debug!(base = base, head = head, merge_base = %oid, "Resolved merge base");
            repo.find_commit(oid).map_err(diff_failed)?
        } else {
            base_commit
        };

        let start_tree = start_commit.tree().map_err(diff_failed)?;
        let head_tree = head_commit.tree().map_err(diff_failed)?;

        let mut diff = repo
            .diff_tree_to_tree(Some(&start_tree), Some(&head_tree), None)
            .map_err(diff_failed)?;
        diff.find_similar(Some(DiffFindOptions::new().renames(true)))
            .map_err(diff_failed)?;

        let mut change_set = Self::default();
        for delta in diff.deltas() {
            match delta.new_file().path().or_else(|| delta.old_file().path()) {
                Some(path) => change_set.push(&path.to_string_lossy()),
                None => warn!(status = ?delta.status(), "Skipping diff entry without a path"),
            }
        }

        info!(
            base = base,
            head = head,
            use_merge_base = use_merge_base,
            path_count = change_set.len(),
            "Computed changed paths from git"
        );
        Ok(change_set)
    }

    /// Adds a path, applying the same normalization as [`ChangeSet::new`].
    pub fn push(&mut self, path: &str) {
        if let Some(path) = normalize_path(path) {
            if !self.paths.contains(&path) {
                self.paths.push(path);
            }
        }
    }

    /// Appends every path of `other` that is not already present.
    pub fn extend(&mut self, other: ChangeSet) {
        for path in other.paths {
            if !self.paths.contains(&path) {
                self.paths.push(path);
            }
        }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ChangeSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}

fn normalize_path(raw: &str) -> Option<String> {
    let mut path = raw.trim();
    while let Some(rest) = path.strip_prefix("./") {
        path = rest;
    }

    if path.is_empty() {
        None
    } else {
        Some(path.to_string())
    }
}

fn resolve_commit<'r>(repo: &'r Repository, revision: &str) -> ChangeSetResult<Commit<'r>> {
    repo.revparse_single(revision)
        .and_then(|object| object.peel_to_commit())
        .map_err(|e| ChangeSetError::RevisionNotFound {
            revision: revision.to_string(),
            reason: e.message().to_string(),
        })
}

fn diff_failed(error: git2::Error) -> ChangeSetError {
    ChangeSetError::DiffFailed {
        reason: error.message().to_string(),
    }
}
