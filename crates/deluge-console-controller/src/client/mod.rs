//! Deluge console client implementation.

use std::collections::HashSet;

use tracing::debug;

use deluge_console_types::{ConsoleError, DelugeController, DelugePaths, Torrent};

use crate::ops::{ConsoleOps, ConsoleRunner};
use crate::parser::parse_torrents;
use crate::poll::{PollSchedule, poll_until};


/// Host used when none is given.
pub const DEFAULT_HOST: &str = "localhost";

/// DelugeConsoleClient controls a Deluge daemon by running `deluge-console` commands.
///
/// Callers must serialize access: nothing guards concurrent use of the same console.
#[derive(Debug)]
pub struct DelugeConsoleClient<T: ConsoleOps = ConsoleRunner> {
    console: T,
    host: String,
    port: Option<u16>,
    connected: bool,
    poll: PollSchedule,
}

impl DelugeConsoleClient {
    /// Create a new DelugeConsoleClient using the console found in `paths`.
    /// If no host is provided, it defaults to "localhost". Without a port the console's
    /// default port is used.
    pub fn new(paths: &DelugePaths, host: Option<&str>, port: Option<u16>) -> Self {
        Self::with_console(ConsoleRunner::from_paths(paths), host, port)
    }
}

impl<T: ConsoleOps> DelugeConsoleClient<T> {
    /// Create a DelugeConsoleClient with a custom console implementation.
    pub fn with_console(console: T, host: Option<&str>, port: Option<u16>) -> Self {
        Self {
            console,
            host: host.unwrap_or(DEFAULT_HOST).to_string(),
            port,
            connected: false,
            poll: PollSchedule::default(),
        }
    }

    /// Replace the retry budget used by [`DelugeController::add`] and
    /// [`DelugeController::remove`].
    pub fn with_poll_schedule(mut self, poll: PollSchedule) -> Self {
        self.poll = poll;
        self
    }

    /// Whether [`DelugeController::connect`] succeeded and no disconnect followed.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// The daemon host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The daemon port, if one was given.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// The retry budget for add and remove.
    pub fn poll_schedule(&self) -> PollSchedule {
        self.poll
    }

    /// Runs a command whose only output is an error message.
    fn run_silent(&self, command: &str, args: &[String]) -> Result<(), ConsoleError> {
        let response = self.console.run(command, args)?;
        if response.is_empty() {
            Ok(())
        } else {
            Err(ConsoleError::Connection(response))
        }
    }

    fn ids(&self) -> Result<HashSet<String>, ConsoleError> {
        Ok(self.list()?.into_iter().map(|t| t.id).collect())
    }
}

impl<T: ConsoleOps> DelugeController for DelugeConsoleClient<T> {
    fn connect(&mut self) -> Result<(), ConsoleError> {
        if self.connected {
            return Ok(());
        }

        debug!("Connecting to Deluge daemon at {}:{:?}", self.host, self.port);
        let mut args = vec![self.host.clone()];
        if let Some(port) = self.port {
            args.push(port.to_string());
        }
        self.run_silent("connect", &args)?;

        self.connected = true;
        debug!("Connected to Deluge daemon");
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), ConsoleError> {
        if !self.connected {
            return Ok(());
        }

        debug!("Disconnecting from Deluge daemon");
        self.run_silent("exit", &[])?;

        self.connected = false;
        debug!("Disconnected from Deluge daemon");
        Ok(())
    }

    fn list(&self) -> Result<Vec<Torrent>, ConsoleError> {
        debug!("Listing torrents");
        let output = self.console.run("info", &["-v".to_string()])?;
        let torrents = parse_torrents(&output)?;
        debug!("Torrents: {torrents:?}");

        Ok(torrents)
    }

    fn add(&self, torrent_file: &str) -> Result<bool, ConsoleError> {
        debug!("Adding torrent from file: {}", torrent_file);
        let before = self.ids()?;

        let response = self.console.run("add", &[torrent_file.to_string()])?;
        if !response.is_empty() {
            debug!("Console replied to add: {response}");
        }

        let added = poll_until(
            &self.poll,
            || Ok(self.ids()?.difference(&before).count()),
            |added| *added > 0,
        )?;

        match added {
            0 => {
                debug!("No new torrent appeared for {torrent_file}");
                Ok(false)
            }
            1 => {
                debug!("Added {torrent_file}");
                Ok(true)
            }
            n => Err(ConsoleError::MultipleTorrentsAdded(n)),
        }
    }

    fn remove(&self, id: &str) -> Result<bool, ConsoleError> {
        debug!("Removing torrent {id}");
        let response = self.console.run("del", &[id.to_string()])?;
        if !response.is_empty() {
            debug!("Console replied to del: {response}");
        }

        let still_present = poll_until(
            &self.poll,
            || Ok(self.ids()?.contains(id)),
            |present| !*present,
        )?;

        debug!("Torrent {id} removed: {}", !still_present);
        Ok(!still_present)
    }
}
