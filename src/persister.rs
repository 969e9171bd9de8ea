//! Version record persistence
//!
//! Writes the version record for every build. Released versions are also
//! committed and pushed; an empty commit or push is logged, not raised.

use crate::context::BuildContext;
use crate::domain::{TagsResult, Version, VersionRecord, SNAPSHOT};
use crate::error::{ImageTaggerError, Result};
use crate::exec::{CommandOutput, CommandRunner};
use crate::store::FileStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Phrases git prints when a commit has nothing staged.
const NOTHING_TO_COMMIT: [&str; 3] = [
    "nothing to commit",
    "nothing added to commit",
    "no changes added to commit",
];

/// Author identity used for the version commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitIdentity {
    pub name: String,
    pub email: String,
}

impl Default for GitIdentity {
    fn default() -> Self {
        GitIdentity {
            name: "github-actions[bot]".to_string(),
            email: "github-actions[bot]@users.noreply.github.com".to_string(),
        }
    }
}

/// Inputs that drive persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersisterConfig {
    pub version_record_path: PathBuf,
    pub identity: GitIdentity,
    /// Raise commit/push failures that are not "nothing to commit"
    pub strict_git: bool,
}

impl PersisterConfig {
    /// Config with the bot identity and lenient git handling
    pub fn new(version_record_path: impl Into<PathBuf>) -> Self {
        PersisterConfig {
            version_record_path: version_record_path.into(),
            identity: GitIdentity::default(),
            strict_git: false,
        }
    }
}

/// Result of the commit or push step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Applied,
    NoChanges,
}

/// What happened after the record was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Unreleased build: record written, git untouched
    Snapshot,
    Published {
        commit: StepOutcome,
        push: StepOutcome,
    },
}

/// Record written by [VersionPersister::persist] and the git outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistReport {
    pub record: VersionRecord,
    pub outcome: PersistOutcome,
}

/// Writes the version record and commits it for released versions
pub struct VersionPersister<S: FileStore, R: CommandRunner> {
    store: S,
    runner: R,
}

impl<S: FileStore, R: CommandRunner> VersionPersister<S, R> {
    pub fn new(store: S, runner: R) -> Self {
        VersionPersister { store, runner }
    }

    /// Persist the version resolved for `tags`
    pub fn persist_tags(
        &self,
        tags: &TagsResult,
        ctx: &BuildContext,
        config: &PersisterConfig,
    ) -> Result<PersistReport> {
        self.persist(&tags.version.to_string(), &tags.tag, ctx, config)
    }

    /// Write the version record, then commit and push it unless `version` is `SNAPSHOT`.
    ///
    /// `version` is validated again here before any git command runs.
    ///
    /// # Returns
    /// * `Ok(PersistReport)` - Record written; commit/push applied or had nothing to do
    /// * `Err(Io)` - Record could not be written
    /// * `Err(SemverValidation)` - `version` is neither `SNAPSHOT` nor strict semver
    /// * `Err(GitOperation)` - Identity setup or staging failed
    pub fn persist(
        &self,
        version: &str,
        tag: &str,
        ctx: &BuildContext,
        config: &PersisterConfig,
    ) -> Result<PersistReport> {
        let path = &config.version_record_path;
        let path_display = path.display().to_string();

        let record = VersionRecord::new(version, tag, ctx.commit_sha());
        self.store.write(path, record.to_json()?.as_bytes())?;
        tracing::info!("{} updated: {}", path_display, record.to_compact_json()?);

        if version == SNAPSHOT {
            return Ok(PersistReport {
                record,
                outcome: PersistOutcome::Snapshot,
            });
        }

        Version::parse(version)?;
        let identity = &config.identity;

        self.run_required(&["config", "--global", "user.name", identity.name.as_str()])?;
        self.run_required(&["config", "--global", "user.email", identity.email.as_str()])?;
        self.run_required(&["add", path_display.as_str()])?;

        let message = format!(
            "{} {} updated with image version {}",
            identity.name, path_display, version
        );
        let commit = self.commit(&message, config.strict_git)?;
        let push = self.push(config.strict_git)?;

        tracing::info!("{} committed and pushed to git", path_display);

        Ok(PersistReport {
            record,
            outcome: PersistOutcome::Published { commit, push },
        })
    }

    /// Run a git command whose failure aborts persistence
    fn run_required(&self, args: &[&str]) -> Result<()> {
        let output = self.runner.run("git", args)?;
        if output.success() {
            Ok(())
        } else {
            Err(git_failure(args, &output))
        }
    }

    fn commit(&self, message: &str, strict: bool) -> Result<StepOutcome> {
        let args = ["commit", "-m", message];
        match self.runner.run("git", &args) {
            Ok(output) if output.success() => Ok(StepOutcome::Applied),
            Ok(output) if strict && !reports_nothing_to_commit(&output) => {
                Err(git_failure(&args[..1], &output))
            }
            Err(e) if strict => Err(e),
            other => {
                if let Err(e) = other {
                    tracing::debug!("git commit did not run: {}", e);
                }
                tracing::info!("No changes to commit");
                Ok(StepOutcome::NoChanges)
            }
        }
    }

    fn push(&self, strict: bool) -> Result<StepOutcome> {
        let args = ["push"];
        match self.runner.run("git", &args) {
            Ok(output) if output.success() => Ok(StepOutcome::Applied),
            Ok(output) if strict => Err(git_failure(&args, &output)),
            Err(e) if strict => Err(e),
            other => {
                match other {
                    Ok(output) => tracing::debug!("git push exited with {}", output.code),
                    Err(e) => tracing::debug!("git push did not run: {}", e),
                }
                tracing::info!("No changes to push");
                Ok(StepOutcome::NoChanges)
            }
        }
    }
}

fn reports_nothing_to_commit(output: &CommandOutput) -> bool {
    let text = output.combined();
    NOTHING_TO_COMMIT.iter().any(|phrase| text.contains(phrase))
}

fn git_failure(args: &[&str], output: &CommandOutput) -> ImageTaggerError {
    let detail = match output.combined() {
        text if text.is_empty() => format!("exit code {}", output.code),
        text => format!("exit code {}: {}", output.code, text),
    };
    ImageTaggerError::git_operation(args.join(" "), detail)
}
