use std::fmt;

/// Placeholder tag suffix for a pull request without a number.
pub const UNKNOWN_PR_NUMBER: &str = "unknown-pr-number";

/// Placeholder branch name when CI did not report one.
pub const UNKNOWN_BRANCH_NAME: &str = "unknown-branch-name";

/// Warnings raised when the build context is incomplete.
/// These are non-fatal: resolution continues with a fallback value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryWarning {
    /// Pull request event without a pull request number
    MissingPullRequestNumber,
    /// No branch name was available for the event
    MissingBranchName { pull_request: bool },
    /// Branch name sanitized down to nothing
    EmptyTagPrefix { branch: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::MissingPullRequestNumber => {
                write!(
                    f,
                    "Pull request number not available, using '{}'",
                    UNKNOWN_PR_NUMBER
                )
            }
            BoundaryWarning::MissingBranchName { pull_request } => {
                let source = if *pull_request {
                    "pull request head ref"
                } else {
                    "branch/tag name"
                };
                write!(
                    f,
                    "No {} available, using '{}'",
                    source, UNKNOWN_BRANCH_NAME
                )
            }
            BoundaryWarning::EmptyTagPrefix { branch } => {
                write!(
                    f,
                    "Branch name '{}' contains no usable tag characters, tag prefix is empty",
                    branch
                )
            }
        }
    }
}
