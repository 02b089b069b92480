//! Internal trait abstracting `deluge-console` invocations.
//!
//! This module provides the [`ConsoleOps`] trait which abstracts spawning the console
//! executable, enabling mocking in tests, and [`ConsoleRunner`], the implementation
//! that actually spawns it.

use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use tracing::trace;

use deluge_console_types::{ConsoleError, DelugePaths};

/// Runs a single console command and returns its standard output.
///
/// Implementations block until the command has finished. The exit status is ignored:
/// callers decide from the output text whether the command failed.
#[cfg_attr(test, mockall::automock)]
pub trait ConsoleOps {
    /// Run `command` with `args` and return the trimmed standard output.
    fn run(&self, command: &str, args: &[String]) -> Result<String, ConsoleError>;
}

/// Spawns the `deluge-console` executable once per command.
///
/// There is no timeout: a console that never exits blocks the caller forever.
#[derive(Debug, Clone)]
pub struct ConsoleRunner {
    console_exe: PathBuf,
}

impl ConsoleRunner {
    /// Create a runner for an explicit console executable.
    pub fn new(console_exe: impl Into<PathBuf>) -> Self {
        Self {
            console_exe: console_exe.into(),
        }
    }

    /// Create a runner for the console found in `paths`.
    pub fn from_paths(paths: &DelugePaths) -> Self {
        Self::new(paths.console_exe())
    }

    /// The executable this runner spawns.
    pub fn console_exe(&self) -> &Path {
        &self.console_exe
    }
}

impl ConsoleOps for ConsoleRunner {
    fn run(&self, command: &str, args: &[String]) -> Result<String, ConsoleError> {
        trace!(exe = %self.console_exe.display(), command, ?args, "Running console command");
        let output = Command::new(&self.console_exe)
            .arg(command)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| {
                ConsoleError::Io(format!(
                    "failed to run {}: {}",
                    self.console_exe.display(),
                    e
                ))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        trace!(status = ?output.status, bytes = stdout.len(), "Console command finished");
        Ok(stdout)
    }
}
