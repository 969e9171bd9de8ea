use crate::domain::version::ImageVersion;
use regex::Regex;
use std::sync::OnceLock;

/// Maximum length of a Docker image tag.
pub const MAX_TAG_LEN: usize = 128;

fn invalid_tag_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^a-z0-9_.-]").expect("tag pattern is valid"))
}

fn invalid_repo_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^a-z0-9_./-]").expect("repo pattern is valid"))
}

fn separator_runs() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[.-]{2,}").expect("separator pattern is valid"))
}

fn is_separator(c: char) -> bool {
    c == '.' || c == '-'
}

/// Normalizes one segment of a repository identity.
fn normalize_segment(segment: &str) -> String {
    invalid_repo_chars()
        .replace_all(&segment.to_lowercase(), "-")
        .into_owned()
}

/// Builds the canonical `owner/name` image repository.
///
/// Owner and name are lowercased independently and every character outside
/// `[a-z0-9_./-]` becomes `-`.
pub fn normalize_repository(owner: &str, name: &str) -> String {
    format!("{}/{}", normalize_segment(owner), normalize_segment(name))
}

/// Sanitizes a branch name into a Docker tag prefix of at most 128 characters.
///
/// Lowercase, replace invalid characters with `-`, strip leading/trailing
/// `.`/`-`, collapse separator runs into a single `-`, then truncate.
pub fn sanitize_branch_name(branch: &str) -> String {
    sanitize_with_limit(branch, MAX_TAG_LEN)
}

/// Same as [`sanitize_branch_name`] with an explicit length limit.
///
/// Truncation happens last; separators exposed at the cut are trimmed again so
/// the result never ends in `.` or `-`.
pub fn sanitize_with_limit(branch: &str, limit: usize) -> String {
    let lowered = branch.to_lowercase();
    let replaced = invalid_tag_chars().replace_all(&lowered, "-");
    let trimmed = replaced.trim_matches(is_separator);
    let collapsed = separator_runs().replace_all(trimmed, "-");

    // every remaining char is ASCII, so byte truncation is char-safe
    let mut prefix = collapsed.into_owned();
    prefix.truncate(limit);
    prefix.trim_end_matches(is_separator).to_string()
}

/// Joins a sanitized prefix and a suffix, keeping the full tag within 128 characters.
///
/// The prefix is shortened (never the suffix) so that both `{prefix}-{suffix}`
/// and `{prefix}-latest` stay valid tags.
pub fn fit_prefix(prefix: &str, suffix: &str) -> String {
    let reserved = 1 + suffix.len().max("latest".len());
    let budget = MAX_TAG_LEN.saturating_sub(reserved);
    if prefix.len() <= budget {
        prefix.to_string()
    } else {
        sanitize_with_limit(prefix, budget)
    }
}

/// Returns true when `tag` satisfies the Docker tag grammar used here.
pub fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty() && tag.len() <= MAX_TAG_LEN && !invalid_tag_chars().is_match(tag)
}

/// Tags and image references resolved for one build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagsResult {
    /// Normalized `owner/name`
    pub repo: String,
    /// Primary tag
    pub tag: String,
    /// Fully-qualified `repo:tag` references, in publishing order
    pub images: Vec<String>,
    pub version: ImageVersion,
}

impl TagsResult {
    /// Comma-separated image list, as handed to docker build tooling
    pub fn all_images(&self) -> String {
        self.images.join(",")
    }

    /// `repo:tag` for the primary tag
    pub fn primary_image(&self) -> String {
        format!("{}:{}", self.repo, self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::version::Version;

    fn assert_clean_prefix(prefix: &str) {
        assert!(prefix.len() <= MAX_TAG_LEN, "too long: {}", prefix.len());
        assert!(!invalid_tag_chars().is_match(prefix), "invalid chars: {}", prefix);
        assert!(!prefix.starts_with(is_separator), "leading separator: {}", prefix);
        assert!(!prefix.ends_with(is_separator), "trailing separator: {}", prefix);
        assert!(!separator_runs().is_match(prefix), "separator run: {}", prefix);
    }

    #[test]
    fn test_normalize_repository() {
        assert_eq!(normalize_repository("Owner", "My Repo!"), "owner/my-repo-");
        assert_eq!(normalize_repository("owner", "repo"), "owner/repo");
        assert_eq!(normalize_repository("Org_1", "svc.api-v2"), "org_1/svc.api-v2");
    }

    #[test]
    fn test_sanitize_simple_branch() {
        assert_eq!(sanitize_branch_name("feature/test"), "feature-test");
        assert_eq!(sanitize_branch_name("Release_2.0"), "release_2.0");
    }

    #[test]
    fn test_sanitize_strips_and_collapses() {
        assert_eq!(sanitize_branch_name("--fix..the---bug.."), "fix-the-bug");
        assert_eq!(sanitize_branch_name("a/-/b"), "a-b");
        assert_eq!(sanitize_branch_name("...---"), "");
    }

    #[test]
    fn test_sanitize_non_ascii() {
        let prefix = sanitize_branch_name("fïx/ünïcode 🚀 branch");
        assert_clean_prefix(&prefix);
        assert!(prefix.starts_with("f-x"));
    }

    #[test]
    fn test_sanitize_truncates_to_128() {
        let branch = "!!!___...my--branch--name...___!!!".repeat(10);
        let prefix = sanitize_branch_name(&branch);
        assert_clean_prefix(&prefix);
        assert!(prefix.starts_with("___-my-branch-name-___"));
    }

    #[test]
    fn test_sanitize_truncation_does_not_leave_separator() {
        // the 128th char lands on a '-'
        let branch = format!("{}-tail", "a".repeat(127));
        let prefix = sanitize_branch_name(&branch);
        assert_eq!(prefix, "a".repeat(127));
    }

    #[test]
    fn test_sanitize_property_over_samples() {
        let samples = [
            "main",
            "feature/JIRA-123_add.thing",
            "..hidden",
            "trailing..",
            "UPPER/lower/MiXeD",
            "a--b..c-.-d",
            "spaces in name",
            "tab\tand\nnewline",
            "",
            "-",
            "x".repeat(500).as_str(),
            "-.".repeat(200).as_str(),
        ]
        .map(|s| s.to_string());

        for sample in samples.iter() {
            assert_clean_prefix(&sanitize_branch_name(sample));
        }
    }

    #[test]
    fn test_fit_prefix_short_prefix_untouched() {
        assert_eq!(fit_prefix("feature-test", "pr-42"), "feature-test");
    }

    #[test]
    fn test_fit_prefix_keeps_full_tag_within_limit() {
        let prefix = sanitize_branch_name(&"b".repeat(300));
        let fitted = fit_prefix(&prefix, "abcdef1");
        assert!(is_valid_tag(&format!("{}-abcdef1", fitted)));
        assert!(is_valid_tag(&format!("{}-latest", fitted)));
        assert_eq!(fitted.len(), MAX_TAG_LEN - 1 - "abcdef1".len());
    }

    #[test]
    fn test_is_valid_tag() {
        assert!(is_valid_tag("1.2.4"));
        assert!(is_valid_tag("feature-test-pr-42"));
        assert!(!is_valid_tag(""));
        assert!(!is_valid_tag("Feature"));
        assert!(!is_valid_tag(&"a".repeat(129)));
    }

    #[test]
    fn test_tags_result_all_images() {
        let result = TagsResult {
            repo: "owner/repo".to_string(),
            tag: "1.2.4".to_string(),
            images: vec![
                "owner/repo:1.2.4".to_string(),
                "owner/repo:latest".to_string(),
                "owner/repo:abcdef1".to_string(),
            ],
            version: ImageVersion::Released(Version::new(1, 2, 4)),
        };
        assert_eq!(
            result.all_images(),
            "owner/repo:1.2.4,owner/repo:latest,owner/repo:abcdef1"
        );
        assert_eq!(result.primary_image(), "owner/repo:1.2.4");
    }
}
