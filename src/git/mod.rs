//! Local git repository access
//!
//! CI runners export the build metadata through environment variables. When a
//! build runs outside CI the same facts come from the working copy itself:
//!
//! - [repository::LocalRepository]: HEAD commit, branch and remote URL via `git2`
//! - [parse_remote_slug]: `owner/name` from a remote URL
//!
//! Writes to the repository (commit, push) go through
//! [crate::exec::CommandRunner] instead, so they use the runner's own git
//! credentials.

pub mod repository;

pub use repository::LocalRepository;

/// Extract `(owner, name)` from a remote URL
///
/// Handles `https://host/owner/name(.git)`, `ssh://git@host/owner/name` and
/// scp-like `git@host:owner/name(.git)` forms.
///
/// # Returns
/// * `Some((owner, name))` - The last two path segments
/// * `None` - If the URL has fewer than two path segments
pub fn parse_remote_slug(url: &str) -> Option<(String, String)> {
    let trimmed = url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    let path = if let Some((_, rest)) = trimmed.split_once("://") {
        rest.split_once('/').map(|(_, path)| path)?
    } else if let Some((_, path)) = trimmed.split_once(':') {
        path
    } else {
        trimmed
    };

    let mut segments = path.rsplit('/').filter(|segment| !segment.is_empty());
    let name = segments.next()?;
    let owner = segments.next()?;

    Some((owner.to_string(), name.to_string()))
}
