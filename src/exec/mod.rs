//! External command abstraction layer
//!
//! Git is driven as an external process through the [CommandRunner] trait.
//!
//! - [process::ProcessRunner]: spawns real processes
//! - [mock::MockRunner]: records calls and replays scripted failures
//!
//! A runner only reports what happened. Whether a non-zero exit status is
//! fatal is up to the caller.

pub mod mock;
pub mod process;

pub use mock::MockRunner;
pub use process::ProcessRunner;

use crate::error::Result;

/// Exit status and captured output of a finished command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code; `-1` when the process was terminated by a signal
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Output of a command that exited with status 0
    pub fn ok(stdout: impl Into<String>) -> Self {
        CommandOutput {
            code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Output of a command that exited with `code`
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        CommandOutput {
            code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// stdout and stderr joined, for diagnostics
    pub fn combined(&self) -> String {
        match (self.stdout.trim(), self.stderr.trim()) {
            ("", err) => err.to_string(),
            (out, "") => out.to_string(),
            (out, err) => format!("{}\n{}", out, err),
        }
    }
}

/// Capability for running external programs
///
/// ## Error Handling
///
/// `Err` means the program could not be run at all (not installed, not
/// executable). A program that ran and failed returns `Ok` with a non-zero
/// [CommandOutput::code].
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` and wait for it to finish
    ///
    /// # Arguments
    /// * `program` - Executable name or path (e.g., "git")
    /// * `args` - Arguments passed verbatim
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        (**self).run(program, args)
    }
}
