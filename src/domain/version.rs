use crate::error::{ImageTaggerError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Literal used for builds that produce no semantic version.
pub const SNAPSHOT: &str = "SNAPSHOT";

fn semver_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("semver pattern is valid"))
}

/// Returns true when `value` is exactly `MAJOR.MINOR.PATCH`.
///
/// No `v` prefix, pre-release suffix or build metadata is accepted.
pub fn is_strict_semver(value: &str) -> bool {
    semver_pattern().is_match(value)
}

/// Semantic version representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a strict `MAJOR.MINOR.PATCH` string (e.g., "1.2.3" -> Version(1,2,3))
    ///
    /// Components that overflow `u64` are rejected like any other malformed input.
    pub fn parse(value: &str) -> Result<Self> {
        if !is_strict_semver(value) {
            return Err(ImageTaggerError::semver(value));
        }

        let mut parts = value.split('.').map(str::parse::<u64>);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(Ok(major)), Some(Ok(minor)), Some(Ok(patch))) => {
                Ok(Version::new(major, minor, patch))
            }
            _ => Err(ImageTaggerError::semver(value)),
        }
    }

    /// Next patch release: `major.minor.(patch + 1)`
    pub fn bump_patch(&self) -> Result<Self> {
        let patch = self
            .patch
            .checked_add(1)
            .ok_or_else(|| ImageTaggerError::semver(self.to_string()))?;

        Ok(Version {
            major: self.major,
            minor: self.minor,
            patch,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Version attached to a build: a released semver or the unreleased sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageVersion {
    Released(Version),
    Unreleased,
}

impl ImageVersion {
    pub fn is_released(&self) -> bool {
        matches!(self, ImageVersion::Released(_))
    }
}

impl fmt::Display for ImageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageVersion::Released(version) => version.fmt(f),
            ImageVersion::Unreleased => f.write_str(SNAPSHOT),
        }
    }
}

impl FromStr for ImageVersion {
    type Err = ImageTaggerError;

    fn from_str(value: &str) -> Result<Self> {
        if value == SNAPSHOT {
            Ok(ImageVersion::Unreleased)
        } else {
            Version::parse(value).map(ImageVersion::Released)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
    }

    #[test]
    fn test_version_parse_leading_zeros() {
        assert_eq!(Version::parse("01.002.0").unwrap(), Version::new(1, 2, 0));
    }

    #[test]
    fn test_version_parse_rejects_decorations() {
        for input in [
            "v1.2.3",
            "1.2",
            "1.2.3.4",
            "1.2.3-rc.1",
            "1.2.3+build",
            " 1.2.3",
            "1.2.3\n",
            "not-semver",
            "",
        ] {
            assert!(Version::parse(input).is_err(), "accepted {:?}", input);
        }
    }

    #[test]
    fn test_version_parse_overflow() {
        assert!(Version::parse("1.2.99999999999999999999").is_err());
    }

    #[test]
    fn test_version_bump_patch() {
        let bumped = Version::new(1, 2, 3).bump_patch().unwrap();
        assert_eq!(bumped, Version::new(1, 2, 4));
    }

    #[test]
    fn test_version_bump_patch_keeps_minor() {
        let bumped = Version::new(0, 9, 9).bump_patch().unwrap();
        assert_eq!(bumped.to_string(), "0.9.10");
    }

    #[test]
    fn test_version_bump_patch_overflow() {
        assert!(Version::new(1, 0, u64::MAX).bump_patch().is_err());
    }

    #[test]
    fn test_image_version_display() {
        assert_eq!(ImageVersion::Released(Version::new(1, 2, 3)).to_string(), "1.2.3");
        assert_eq!(ImageVersion::Unreleased.to_string(), "SNAPSHOT");
    }

    #[test]
    fn test_image_version_from_str() {
        assert_eq!(
            "SNAPSHOT".parse::<ImageVersion>().unwrap(),
            ImageVersion::Unreleased
        );
        assert_eq!(
            "4.5.6".parse::<ImageVersion>().unwrap(),
            ImageVersion::Released(Version::new(4, 5, 6))
        );
        assert!("snapshot".parse::<ImageVersion>().is_err());
    }
}
