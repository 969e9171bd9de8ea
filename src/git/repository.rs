use crate::error::Result;
use git2::Repository as Git2Repo;
use std::path::Path;

/// Read-only view of a local checkout, used when CI metadata is unavailable
pub struct LocalRepository {
    repo: Git2Repo,
}

impl LocalRepository {
    /// Open or discover a git repository at or above `path`
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(LocalRepository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        LocalRepository { repo }
    }

    /// Full hex id of the commit HEAD points at
    pub fn head_sha(&self) -> Result<String> {
        let commit = self.repo.head()?.peel_to_commit()?;

        Ok(commit.id().to_string())
    }

    /// Short name of the checked-out branch, or `None` on a detached HEAD
    pub fn current_branch(&self) -> Result<Option<String>> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Ok(None);
        }

        Ok(head.shorthand().map(|name| name.to_string()))
    }

    /// URL of the named remote, or `None` if no such remote is configured
    pub fn remote_url(&self, name: &str) -> Result<Option<String>> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(|url| url.to_string())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
