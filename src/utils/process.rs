//! Process execution utilities
//!
//! Provides safe process execution with proper error handling and logging.
//! Callers depend on the [`CommandRunner`] trait so tests can record
//! invocations instead of launching real programs.

use crate::error::{BitloopError, Result};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, info, instrument};

/// A fully described child process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program to launch, resolved through `PATH` when not absolute
    pub program: PathBuf,
    /// Arguments passed verbatim
    pub args: Vec<OsString>,
    /// Working directory for the child, inherited when `None`
    pub current_dir: Option<PathBuf>,
}

impl CommandSpec {
    /// Describe a program invocation with no arguments
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Append arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the child in `dir`
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Human-readable command line for logs and error messages
    pub fn display(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

/// Seam between handlers and the operating system's process launcher
pub trait CommandRunner {
    /// Launch the command, wait for it, and return its exit code.
    ///
    /// Only a failure to start the process is an `Err`; a nonzero exit is
    /// reported through the returned code.
    fn status(&self, spec: &CommandSpec) -> Result<i32>;

    /// Launch the command and fail unless it exits with code 0
    fn run(&self, spec: &CommandSpec) -> Result<()> {
        match self.status(spec)? {
            0 => Ok(()),
            code => Err(BitloopError::child_exit(spec.display(), Some(code))),
        }
    }
}

/// Utility for running external processes with inherited stdio
#[derive(Debug)]
pub struct ProcessRunner {
    debug: bool,
}

impl ProcessRunner {
    /// Create a new process runner
    #[must_use]
    pub const fn new(debug: bool) -> Self {
        Self { debug }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(false)
    }
}

impl CommandRunner for ProcessRunner {
    #[instrument(skip(self))]
    fn status(&self, spec: &CommandSpec) -> Result<i32> {
        let cmd_str = spec.display();

        if self.debug {
            debug!("Running command: {} (cwd: {:?})", cmd_str, spec.current_dir);
        } else {
            info!("+ {}", cmd_str);
        }

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        if let Some(dir) = &spec.current_dir {
            cmd.current_dir(dir);
        }

        let status = cmd
            .status()
            .map_err(|e| BitloopError::child_launch(cmd_str.clone(), e))?;

        let code = exit_code_of(status);
        debug!("Command finished with exit code {}", code);
        Ok(code)
    }
}

/// Exit code of a finished child; a signal death becomes `128 + signal`
#[must_use]
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_runner_creation() {
        let runner = ProcessRunner::new(true);
        assert!(runner.debug);

        let runner = ProcessRunner::default();
        assert!(!runner.debug);
    }

    #[test]
    fn test_command_spec_display() {
        let spec = CommandSpec::new("sudo").args(["apt-get", "install", "-y"]);
        assert_eq!(spec.display(), "sudo apt-get install -y");
        assert_eq!(spec.current_dir, None);
    }

    #[cfg(unix)]
    #[test]
    fn test_status_returns_exit_code() {
        let runner = ProcessRunner::new(false);
        assert_eq!(runner.status(&CommandSpec::new("true")).unwrap(), 0);
        assert_eq!(
            runner
                .status(&CommandSpec::new("sh").args(["-c", "exit 7"]))
                .unwrap(),
            7
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_run_failing_command() {
        let runner = ProcessRunner::new(false);
        let result = runner.run(&CommandSpec::new("false"));

        match result {
            Err(BitloopError::ChildProcess {
                command, exit_code, ..
            }) => {
                assert_eq!(command, "false");
                assert_eq!(exit_code, Some(1));
            }
            other => panic!("Expected ChildProcess error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_program_is_launch_error() {
        let runner = ProcessRunner::new(false);
        let err = runner
            .status(&CommandSpec::new("nonexistent_command_12345"))
            .unwrap_err();
        assert_eq!(err.exit_code(), 127);
    }

    #[cfg(unix)]
    #[test]
    fn test_signal_death_maps_to_128_plus_signal() {
        let runner = ProcessRunner::new(false);
        let code = runner
            .status(&CommandSpec::new("sh").args(["-c", "kill -9 $$"]))
            .unwrap();
        assert_eq!(code, 137);
    }
}
