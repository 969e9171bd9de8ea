use thiserror::Error;

/// Unified error type for image-tagger operations
#[derive(Error, Debug)]
pub enum ImageTaggerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid or missing version in {path}: must be a valid semver string (e.g., 1.2.3)")]
    VersionFileInvalid { path: String },

    #[error("Version '{0}' is not valid SemVer. Aborting git commit.")]
    SemverValidation(String),

    #[error("Git operation failed: git {command}: {detail}")]
    GitOperation { command: String, detail: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Git repository error: {0}")]
    Git(#[from] git2::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results in image-tagger
pub type Result<T> = std::result::Result<T, ImageTaggerError>;

impl ImageTaggerError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ImageTaggerError::Config(msg.into())
    }

    /// Create a version file error naming the offending file
    pub fn version_file(path: impl Into<String>) -> Self {
        ImageTaggerError::VersionFileInvalid { path: path.into() }
    }

    /// Create a semver validation error for a rejected version
    pub fn semver(version: impl Into<String>) -> Self {
        ImageTaggerError::SemverValidation(version.into())
    }

    /// Create a git operation error
    ///
    /// `command` is the git subcommand line without the leading `git`.
    pub fn git_operation(command: impl Into<String>, detail: impl Into<String>) -> Self {
        ImageTaggerError::GitOperation {
            command: command.into(),
            detail: detail.into(),
        }
    }
}
