//! CI build context
//!
//! A [BuildContext] is built once at the start of a run, from the GitHub
//! Actions environment or from the local checkout, and is read-only after that.

use crate::error::{ImageTaggerError, Result};
use crate::git::{parse_remote_slug, LocalRepository};
use std::env;
use std::fs;
use std::path::Path;

/// Minimum number of hex characters a commit id must carry.
pub const MIN_COMMIT_SHA_LEN: usize = 8;

/// Kind of event that triggered the build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PullRequest,
    Other,
}

impl EventKind {
    /// Classify a GitHub event name; only `pull_request` is special
    pub fn from_event_name(name: &str) -> Self {
        if name == "pull_request" {
            EventKind::PullRequest
        } else {
            EventKind::Other
        }
    }
}

/// Everything the CI environment tells us about this build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    event: EventKind,
    repository_owner: String,
    repository_name: String,
    commit_sha: String,
    ref_name: Option<String>,
    pull_request_number: Option<u64>,
    head_ref_name: Option<String>,
}

impl BuildContext {
    /// Create a context for `owner/name` at `commit_sha`
    ///
    /// # Returns
    /// * `Err(Config)` - If owner or name is blank, or the commit id is not at
    ///   least 8 hex characters
    pub fn new(
        event: EventKind,
        repository_owner: impl Into<String>,
        repository_name: impl Into<String>,
        commit_sha: impl Into<String>,
    ) -> Result<Self> {
        let context = BuildContext {
            event,
            repository_owner: repository_owner.into(),
            repository_name: repository_name.into(),
            commit_sha: commit_sha.into(),
            ref_name: None,
            pull_request_number: None,
            head_ref_name: None,
        };
        context.validate()?;
        Ok(context)
    }

    /// Set the branch or tag name of a non-PR build
    pub fn with_ref_name(mut self, ref_name: Option<String>) -> Self {
        self.ref_name = ref_name;
        self
    }

    /// Set the pull request number and its source branch
    pub fn with_pull_request(mut self, number: Option<u64>, head_ref_name: Option<String>) -> Self {
        self.pull_request_number = number;
        self.head_ref_name = head_ref_name;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.repository_owner.trim().is_empty() {
            return Err(ImageTaggerError::config("repository owner is empty"));
        }
        if self.repository_name.trim().is_empty() {
            return Err(ImageTaggerError::config("repository name is empty"));
        }
        if self.commit_sha.len() < MIN_COMMIT_SHA_LEN
            || !self.commit_sha.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(ImageTaggerError::config(format!(
                "commit sha '{}' must be at least {} hex characters",
                self.commit_sha, MIN_COMMIT_SHA_LEN
            )));
        }
        Ok(())
    }

    /// Build the context from the process environment, falling back to the
    /// git repository in the current directory for anything CI did not set.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok(), Path::new("."))
    }

    /// Build the context from an arbitrary variable lookup
    ///
    /// Reads `GITHUB_EVENT_NAME`, `GITHUB_REPOSITORY`, `GITHUB_SHA`,
    /// `GITHUB_REF_NAME`, `GITHUB_HEAD_REF` and the PR number from the event
    /// payload at `GITHUB_EVENT_PATH`. Blank values count as unset.
    ///
    /// # Arguments
    /// * `lookup` - Variable source (the environment, or a map in tests)
    /// * `workdir` - Where to discover a git repository if `GITHUB_SHA` or
    ///   `GITHUB_REPOSITORY` is unset
    pub fn from_vars<F>(lookup: F, workdir: &Path) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let event_name = var("GITHUB_EVENT_NAME").unwrap_or_default();
        let event = EventKind::from_event_name(&event_name);
        let slug = var("GITHUB_REPOSITORY").and_then(|repository| {
            repository
                .split_once('/')
                .map(|(owner, name)| (owner.to_string(), name.to_string()))
        });
        let sha = var("GITHUB_SHA");

        let (owner, name, commit_sha, ref_name) = match (slug, sha) {
            (Some((owner, name)), Some(sha)) => (owner, name, sha, var("GITHUB_REF_NAME")),
            (slug, sha) => {
                let local = LocalRepository::discover(workdir).map_err(|e| {
                    ImageTaggerError::config(format!(
                        "GITHUB_REPOSITORY/GITHUB_SHA not set and no git repository found: {}",
                        e
                    ))
                })?;
                tracing::debug!("Reading build context from local repository");

                let (owner, name) = match slug {
                    Some(slug) => slug,
                    None => local
                        .remote_url("origin")?
                        .as_deref()
                        .and_then(parse_remote_slug)
                        .ok_or_else(|| {
                            ImageTaggerError::config(
                                "GITHUB_REPOSITORY not set and no usable 'origin' remote",
                            )
                        })?,
                };
                let commit_sha = match sha {
                    Some(sha) => sha,
                    None => local.head_sha()?,
                };
                let ref_name = match var("GITHUB_REF_NAME") {
                    Some(ref_name) => Some(ref_name),
                    None => local.current_branch()?,
                };
                (owner, name, commit_sha, ref_name)
            }
        };

        let context = BuildContext::new(event, owner, name, commit_sha)?.with_ref_name(ref_name);

        if event == EventKind::PullRequest {
            let number = var("GITHUB_EVENT_PATH")
                .and_then(|path| read_pull_request_number(Path::new(&path)));
            Ok(context.with_pull_request(number, var("GITHUB_HEAD_REF")))
        } else {
            Ok(context)
        }
    }

    pub fn event(&self) -> EventKind {
        self.event
    }

    pub fn is_pull_request(&self) -> bool {
        self.event == EventKind::PullRequest
    }

    pub fn repository_owner(&self) -> &str {
        &self.repository_owner
    }

    pub fn repository_name(&self) -> &str {
        &self.repository_name
    }

    pub fn commit_sha(&self) -> &str {
        &self.commit_sha
    }

    /// First `len` characters of the commit id
    pub fn short_sha(&self, len: usize) -> &str {
        // validated as ASCII hex, so any byte index is a char boundary
        &self.commit_sha[..len.min(self.commit_sha.len())]
    }

    pub fn ref_name(&self) -> Option<&str> {
        self.ref_name.as_deref()
    }

    pub fn pull_request_number(&self) -> Option<u64> {
        self.pull_request_number
    }

    pub fn head_ref_name(&self) -> Option<&str> {
        self.head_ref_name.as_deref()
    }
}

/// `pull_request.number` from a webhook payload; missing or unreadable gives `None`
fn read_pull_request_number(path: &Path) -> Option<u64> {
    let payload = fs::read_to_string(path).ok()?;
    let value: serde_json::Value = serde_json::from_str(&payload).ok()?;
    value.get("pull_request")?.get("number")?.as_u64()
}
