//! User interface module - log grouping and console output.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Environment detection and log groups

use std::env;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{display_error, display_outputs, display_status, display_success};

/// Returns true when running as a GitHub Actions step (`GITHUB_ACTIONS=true`).
pub fn in_github_actions() -> bool {
    env::var("GITHUB_ACTIONS")
        .map(|value| value == "true")
        .unwrap_or(false)
}

/// A collapsible section of log output, closed when dropped.
///
/// Inside Actions this emits `::group::` / `::endgroup::`; elsewhere it prints
/// a bold header and nothing on close.
#[must_use = "the group closes as soon as the guard is dropped"]
pub struct LogGroup {
    actions: bool,
}

impl LogGroup {
    pub fn start(title: &str) -> Self {
        Self::start_with(title, in_github_actions())
    }

    pub fn start_with(title: &str, actions: bool) -> Self {
        println!("{}", formatter::format_group_start(title, actions));
        LogGroup { actions }
    }
}

impl Drop for LogGroup {
    fn drop(&mut self) {
        if self.actions {
            println!("::endgroup::");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_in_github_actions() {
        let previous = env::var("GITHUB_ACTIONS").ok();

        env::set_var("GITHUB_ACTIONS", "true");
        assert!(in_github_actions());
        env::set_var("GITHUB_ACTIONS", "false");
        assert!(!in_github_actions());
        env::remove_var("GITHUB_ACTIONS");
        assert!(!in_github_actions());

        if let Some(value) = previous {
            env::set_var("GITHUB_ACTIONS", value);
        }
    }

    #[test]
    fn test_log_group_remembers_mode() {
        let group = LogGroup::start_with("Update version.json", false);
        assert!(!group.actions);
    }
}
