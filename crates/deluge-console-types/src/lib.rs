//! # Deluge Console Types
//!
//! This crate defines common types and traits for controlling a Deluge daemon through
//! its `deluge-console` executable.

use std::{
    env::consts::EXE_SUFFIX,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Error type for Deluge console operations.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// The console printed an error after a `connect` or `exit` command.
    #[error("connection error: {0}")]
    Connection(String),

    /// The console output did not match the expected listing format.
    #[error("parse error: {0}")]
    Parse(String),

    /// A size carried a suffix other than KiB, MiB or GiB.
    #[error("unknown size unit: {0}")]
    UnknownSizeUnit(String),

    /// An add operation produced more than one new torrent.
    #[error("more than one torrent was added ({0} new ids)")]
    MultipleTorrentsAdded(usize),

    /// A required Deluge executable was not found.
    #[error("missing executable: {}", .0.display())]
    MissingExecutable(PathBuf),

    /// Spawning or waiting on a subprocess failed.
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ConsoleError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// DelugeController defines the operations available on a Deluge daemon.
///
/// Every call blocks until the console subprocess it spawns has exited.
pub trait DelugeController {
    /// Connect to the daemon. Does nothing when already connected.
    fn connect(&mut self) -> Result<(), ConsoleError>;
    /// Disconnect from the daemon. Does nothing when not connected.
    fn disconnect(&mut self) -> Result<(), ConsoleError>;
    /// List all torrents managed by the daemon, in the order the console reports them.
    fn list(&self) -> Result<Vec<Torrent>, ConsoleError>;
    /// Add a torrent file and wait for the daemon to pick it up.
    ///
    /// Returns `false` if no new torrent showed up within the poll budget. This is also
    /// the result when the torrent was already present.
    fn add(&self, torrent_file: &str) -> Result<bool, ConsoleError>;
    /// Remove a torrent by id and wait for it to disappear from the listing.
    fn remove(&self, id: &str) -> Result<bool, ConsoleError>;
}

/// A torrent as reported by `info -v`.
///
/// `size` and `progress` come from the torrent's own summary lines and are not
/// derived from `files`.
#[derive(Debug, Clone, PartialEq)]
pub struct Torrent {
    /// Opaque identifier assigned by the daemon (the info hash).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Approximate total size in bytes.
    pub size: u64,
    /// Download progress in `[0, 1]`.
    pub progress: f64,
    /// Files in the order the console lists them.
    pub files: Vec<TorrentFile>,
}

impl Torrent {
    /// Whether the torrent has finished downloading.
    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }
}

/// A single file within a [`Torrent`].
#[derive(Debug, Clone, PartialEq)]
pub struct TorrentFile {
    /// Path relative to the torrent's download directory.
    pub path: String,
    /// Approximate size in bytes.
    pub size: u64,
    /// Download progress in `[0, 1]`.
    pub progress: f64,
}

const GUI_EXE: &str = "deluge";
const DAEMON_EXE: &str = "deluged";
const CONSOLE_EXE: &str = "deluge-console";

/// Location of the Deluge executables.
///
/// Validation only checks that the files exist; no version check is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelugePaths {
    dir: PathBuf,
}

impl DelugePaths {
    /// Validate that `dir` contains `deluge`, `deluged` and `deluge-console`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ConsoleError> {
        let dir = dir.as_ref().to_path_buf();
        for name in [GUI_EXE, DAEMON_EXE, CONSOLE_EXE] {
            let exe = executable(&dir, name);
            if !exe.is_file() {
                return Err(ConsoleError::MissingExecutable(exe));
            }
        }
        Ok(Self { dir })
    }

    /// The directory holding the executables.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path to `deluge-console`.
    pub fn console_exe(&self) -> PathBuf {
        executable(&self.dir, CONSOLE_EXE)
    }

    /// Path to `deluged`.
    pub fn daemon_exe(&self) -> PathBuf {
        executable(&self.dir, DAEMON_EXE)
    }

    /// Path to `deluge`.
    pub fn gui_exe(&self) -> PathBuf {
        executable(&self.dir, GUI_EXE)
    }
}

fn executable(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}{EXE_SUFFIX}"))
}
