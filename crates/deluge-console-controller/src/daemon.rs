//! Lifecycle of a locally spawned `deluged`.

use std::{
    path::{Path, PathBuf},
    process::{Child, Command, ExitStatus, Stdio},
};

use tracing::{debug, warn};

use deluge_console_types::{ConsoleError, DelugePaths};

/// Handle on a `deluged` process started by this program.
///
/// A daemon that was already running before [`DaemonProcess::start`] is never adopted:
/// `start` always spawns a new process when this handle owns none. Dropping a handle
/// that owns a running daemon stops it.
#[derive(Debug)]
pub struct DaemonProcess {
    daemon_exe: PathBuf,
    args: Vec<String>,
    child: Option<Child>,
}

impl DaemonProcess {
    /// Create a handle for the daemon found in `paths`. Nothing is spawned yet.
    pub fn new(paths: &DelugePaths) -> Self {
        Self::with_executable(paths.daemon_exe())
    }

    /// Create a handle for an explicit daemon executable.
    pub fn with_executable(daemon_exe: impl Into<PathBuf>) -> Self {
        Self {
            daemon_exe: daemon_exe.into(),
            args: Vec::new(),
            child: None,
        }
    }

    /// Extra arguments passed to the daemon on start, e.g. `-c <config dir>`.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// The executable this handle spawns.
    pub fn daemon_exe(&self) -> &Path {
        &self.daemon_exe
    }

    /// Start the daemon unless this handle already runs one.
    pub fn start(&mut self) -> Result<(), ConsoleError> {
        if self.is_running() {
            return Ok(());
        }

        debug!(exe = %self.daemon_exe.display(), args = ?self.args, "Starting Deluge daemon");
        let child = Command::new(&self.daemon_exe)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                ConsoleError::Io(format!(
                    "failed to start {}: {}",
                    self.daemon_exe.display(),
                    e
                ))
            })?;

        debug!(pid = child.id(), "Deluge daemon started");
        self.child = Some(child);
        Ok(())
    }

    /// Kill the daemon and wait for it to exit. Does nothing when not running.
    pub fn stop(&mut self) -> Result<(), ConsoleError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        debug!(pid = child.id(), "Stopping Deluge daemon");
        // The process may have exited on its own; kill then fails but wait still reaps it.
        if let Err(e) = child.kill() {
            debug!("Kill failed: {e}");
        }
        let status = child.wait()?;
        debug!(?status, "Deluge daemon stopped");
        Ok(())
    }

    /// Block until the daemon exits on its own. Returns `None` when not running.
    pub fn wait(&mut self) -> Result<Option<ExitStatus>, ConsoleError> {
        let Some(mut child) = self.child.take() else {
            return Ok(None);
        };

        let status = child.wait()?;
        debug!(?status, "Deluge daemon exited");
        Ok(Some(status))
    }

    /// Whether this handle owns a daemon process.
    pub fn is_running(&self) -> bool {
        self.child.is_some()
    }
}

impl Drop for DaemonProcess {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("Failed to stop Deluge daemon: {e}");
        }
    }
}
