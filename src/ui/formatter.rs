//! Pure formatting functions for UI output.
//!
//! Each message has two renderings: a GitHub Actions workflow command when
//! running inside Actions, and a styled console line otherwise.

use console::style;

/// Escape a value for use as workflow command data.
pub fn escape_command_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Line that opens a log group.
pub fn format_group_start(title: &str, actions: bool) -> String {
    if actions {
        format!("::group::{}", escape_command_data(title))
    } else {
        format!("{}", style(title).bold())
    }
}

/// Line that reports a failed run.
pub fn format_error(message: &str, actions: bool) -> String {
    if actions {
        format!("::error::{}", escape_command_data(message))
    } else {
        format!("{} {}", style("ERROR:").red().bold(), message)
    }
}

/// Format and print an error message.
///
/// Workflow commands must go to stdout; plain console errors go to stderr.
pub fn display_error(message: &str, actions: bool) {
    let line = format_error(message, actions);
    if actions {
        println!("{}", line);
    } else {
        eprintln!("{}", line);
    }
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Print step outputs as `name=value` lines for runs outside Actions.
pub fn display_outputs(pairs: &[(&str, &str)]) {
    for (name, value) in pairs {
        println!("{}={}", style(name).cyan(), value);
    }
}
