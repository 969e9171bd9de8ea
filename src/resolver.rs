//! Image tag and version resolution
//!
//! Decides whether a build publishes from the trunk branch or is a
//! feature/PR snapshot, and derives the Docker tags for it.

use crate::boundary::{BoundaryWarning, UNKNOWN_BRANCH_NAME, UNKNOWN_PR_NUMBER};
use crate::context::BuildContext;
use crate::domain::tag::{fit_prefix, normalize_repository, sanitize_branch_name};
use crate::domain::{ImageVersion, TagsResult, Version};
use crate::error::{ImageTaggerError, Result};
use crate::store::FileStore;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Number of commit id characters used as a tag suffix.
pub const TAG_SHA_LEN: usize = 7;

/// Inputs that drive tag resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// JSON file holding the last released version
    pub version_file_path: PathBuf,
    /// Branch whose builds are published as releases
    pub trunk_branch: String,
    /// Version assumed before the version file is read
    pub default_trunk_version: String,
}

impl ResolverConfig {
    /// Create a resolver config, rejecting blank inputs with a `Config` error
    pub fn new(
        version_file_path: impl Into<PathBuf>,
        trunk_branch: impl Into<String>,
        default_trunk_version: impl Into<String>,
    ) -> Result<Self> {
        let config = ResolverConfig {
            version_file_path: version_file_path.into(),
            trunk_branch: trunk_branch.into(),
            default_trunk_version: default_trunk_version.into(),
        };

        if config.version_file_path.as_os_str().is_empty() {
            return Err(ImageTaggerError::config("Input required and not supplied: version-file"));
        }
        if config.trunk_branch.trim().is_empty() {
            return Err(ImageTaggerError::config("Input required and not supplied: trunk-branch"));
        }
        if config.default_trunk_version.trim().is_empty() {
            return Err(ImageTaggerError::config(
                "Input required and not supplied: default-trunk-version",
            ));
        }
        Ok(config)
    }
}

/// Branch name and tag suffix derived from the triggering event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventClassification {
    pub branch_name: String,
    pub tag_suffix: String,
    pub warnings: Vec<BoundaryWarning>,
}

/// Derive branch name and tag suffix from the event.
///
/// - Pull request: suffix `pr-<number>`, branch is the PR head ref
/// - Anything else: suffix is the 7-char short sha, branch is the ref name
///
/// Missing values fall back to fixed placeholders and add a warning.
pub fn classify_event(ctx: &BuildContext) -> EventClassification {
    let mut warnings = Vec::new();

    let (tag_suffix, branch_name) = if ctx.is_pull_request() {
        let number = match ctx.pull_request_number() {
            Some(number) => number.to_string(),
            None => {
                warnings.push(BoundaryWarning::MissingPullRequestNumber);
                UNKNOWN_PR_NUMBER.to_string()
            }
        };
        (format!("pr-{}", number), ctx.head_ref_name())
    } else {
        (ctx.short_sha(TAG_SHA_LEN).to_string(), ctx.ref_name())
    };

    let branch_name = match branch_name {
        Some(name) => name.to_string(),
        None => {
            warnings.push(BoundaryWarning::MissingBranchName {
                pull_request: ctx.is_pull_request(),
            });
            UNKNOWN_BRANCH_NAME.to_string()
        }
    };

    EventClassification {
        branch_name,
        tag_suffix,
        warnings,
    }
}

#[derive(Deserialize)]
struct VersionFile {
    version: Option<serde_json::Value>,
}

/// Resolves tags for a build, reading the version file through a [FileStore]
pub struct TagResolver<S: FileStore> {
    store: S,
}

impl<S: FileStore> TagResolver<S> {
    pub fn new(store: S) -> Self {
        TagResolver { store }
    }

    /// Resolve the image tags and version for this build.
    ///
    /// The version file is read only for trunk builds and pull requests. On a
    /// pull request it is validated but does not affect the result.
    ///
    /// # Returns
    /// * `Ok(TagsResult)` - Bumped patch version on trunk, `SNAPSHOT` otherwise
    /// * `Err(Io)` - Version file could not be read
    /// * `Err(VersionFileInvalid)` - Version file is not JSON or has no strict semver `version`
    pub fn resolve(&self, ctx: &BuildContext, config: &ResolverConfig) -> Result<TagsResult> {
        let repo = normalize_repository(ctx.repository_owner(), ctx.repository_name());

        let mut event = classify_event(ctx);
        if ctx.is_pull_request() {
            tracing::info!(
                "Detected Pull Request {} to {}",
                event.tag_suffix,
                event.branch_name
            );
        } else {
            tracing::info!("Detected branch/tag name: {}", event.branch_name);
        }

        let sanitized = sanitize_branch_name(&event.branch_name);
        if sanitized.is_empty() {
            event.warnings.push(BoundaryWarning::EmptyTagPrefix {
                branch: event.branch_name.clone(),
            });
        }
        for warning in &event.warnings {
            tracing::warn!("{}", warning);
        }

        let is_trunk = event.branch_name == config.trunk_branch;
        tracing::debug!(
            "Default trunk version: {}",
            config.default_trunk_version
        );

        let current = if is_trunk || ctx.is_pull_request() {
            Some(self.read_version_file(&config.version_file_path)?)
        } else {
            None
        };

        let result = match current {
            Some(current) if is_trunk => {
                tracing::info!("Detected trunk branch: {}", config.trunk_branch);
                let next = current
                    .bump_patch()
                    .map_err(|_| version_file_error(&config.version_file_path))?;
                let tag = next.to_string();
                TagsResult {
                    images: vec![
                        format!("{}:{}", repo, tag),
                        format!("{}:latest", repo),
                        format!("{}:{}", repo, event.tag_suffix),
                    ],
                    repo,
                    tag,
                    version: ImageVersion::Released(next),
                }
            }
            _ => {
                let prefix = fit_prefix(&sanitized, &event.tag_suffix);
                let tag = format!("{}-{}", prefix, event.tag_suffix);
                TagsResult {
                    images: vec![
                        format!("{}:{}-latest", repo, prefix),
                        format!("{}:{}", repo, tag),
                    ],
                    repo,
                    tag,
                    version: ImageVersion::Unreleased,
                }
            }
        };

        Ok(result)
    }

    /// Read and strictly validate the version file
    fn read_version_file(&self, path: &Path) -> Result<Version> {
        let bytes = self.store.read(path)?;

        let data: VersionFile =
            serde_json::from_slice(&bytes).map_err(|_| version_file_error(path))?;

        match data.version {
            Some(serde_json::Value::String(version)) => {
                Version::parse(&version).map_err(|_| version_file_error(path))
            }
            _ => Err(version_file_error(path)),
        }
    }
}

fn version_file_error(path: &Path) -> ImageTaggerError {
    ImageTaggerError::version_file(path.display().to_string())
}
