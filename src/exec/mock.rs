use crate::error::{ImageTaggerError, Result};
use crate::exec::{CommandOutput, CommandRunner};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Scripted {
    Output(CommandOutput),
    SpawnError(String),
}

/// Mock command runner for testing without spawning processes
///
/// Every command succeeds with empty output unless a response was scripted
/// for its first argument (the git subcommand, e.g. `"commit"`).
#[derive(Debug, Default)]
pub struct MockRunner {
    calls: Mutex<Vec<Vec<String>>>,
    scripted: HashMap<String, Scripted>,
}

impl MockRunner {
    /// Create a runner where every command succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `subcommand` exit with `code` and the given stderr
    pub fn fail_on(mut self, subcommand: &str, code: i32, stderr: &str) -> Self {
        self.scripted.insert(
            subcommand.to_string(),
            Scripted::Output(CommandOutput::failed(code, stderr)),
        );
        self
    }

    /// Make `subcommand` finish with exactly `output`
    pub fn respond_to(mut self, subcommand: &str, output: CommandOutput) -> Self {
        self.scripted
            .insert(subcommand.to_string(), Scripted::Output(output));
        self
    }

    /// Make `subcommand` fail to start at all
    pub fn spawn_error_on(mut self, subcommand: &str, message: &str) -> Self {
        self.scripted.insert(
            subcommand.to_string(),
            Scripted::SpawnError(message.to_string()),
        );
        self
    }

    /// Every call as `[program, args...]`, in call order
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Every call joined into a single command line
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.join(" ")).collect()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().map(|arg| arg.to_string()));
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);

        let subcommand = args.first().copied().unwrap_or_default();
        match self.scripted.get(subcommand) {
            Some(Scripted::Output(output)) => Ok(output.clone()),
            Some(Scripted::SpawnError(message)) => Err(ImageTaggerError::Io(
                std::io::Error::new(std::io::ErrorKind::Other, message.clone()),
            )),
            None => Ok(CommandOutput::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_runner_records_calls() {
        let runner = MockRunner::new();
        runner.run("git", &["add", "version.json"]).unwrap();
        runner.run("git", &["push"]).unwrap();

        assert_eq!(
            runner.command_lines(),
            vec!["git add version.json".to_string(), "git push".to_string()]
        );
    }

    #[test]
    fn test_mock_runner_scripted_failure() {
        let runner = MockRunner::new().fail_on("commit", 1, "nothing to commit");

        let output = runner.run("git", &["commit", "-m", "msg"]).unwrap();
        assert_eq!(output.code, 1);
        assert_eq!(output.stderr, "nothing to commit");
        assert!(runner.run("git", &["push"]).unwrap().success());
    }

    #[test]
    fn test_mock_runner_spawn_error() {
        let runner = MockRunner::new().spawn_error_on("push", "git not installed");
        let err = runner.run("git", &["push"]).unwrap_err();
        assert!(err.to_string().contains("git not installed"));
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn test_mock_runner_default() {
        let runner = MockRunner::default();
        assert!(runner.calls().is_empty());
    }
}
