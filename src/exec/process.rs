use crate::error::{ImageTaggerError, Result};
use crate::exec::{CommandOutput, CommandRunner};
use std::path::PathBuf;
use std::process::Command;

/// Runs commands as child processes, blocking until they exit
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    current_dir: Option<PathBuf>,
}

impl ProcessRunner {
    /// Runner that inherits the current working directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner that executes every command inside `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        ProcessRunner {
            current_dir: Some(dir.into()),
        }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }

        tracing::debug!("[command]{} {}", program, args.join(" "));

        let output = cmd.output().map_err(|e| {
            ImageTaggerError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to execute {}: {}", program, e),
            ))
        })?;

        Ok(CommandOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
