use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Number of commit id characters kept in a version record.
pub const RECORD_COMMIT_LEN: usize = 8;

/// The version artifact committed back into the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub version: String,
    pub tag: String,
    pub commit: String,
}

impl VersionRecord {
    /// Create a record, keeping only the first 8 characters of `commit_sha`
    pub fn new(version: impl Into<String>, tag: impl Into<String>, commit_sha: &str) -> Self {
        VersionRecord {
            version: version.into(),
            tag: tag.into(),
            commit: commit_sha.chars().take(RECORD_COMMIT_LEN).collect(),
        }
    }

    /// Pretty-printed JSON with a trailing newline, as written to disk
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Single-line JSON, used for log output
    pub fn to_compact_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
