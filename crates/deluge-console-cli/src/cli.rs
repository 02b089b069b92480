use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI struct for the binary.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// Directory holding deluge, deluged and deluge-console.
    #[arg(short, long, env = "DELUGE_DIR")]
    pub dir: PathBuf,

    /// Host running the Deluge daemon.
    #[arg(long, env = "DELUGE_HOST", default_value = "localhost")]
    pub host: String,

    /// Daemon port. The console's default is used when omitted.
    #[arg(short, long, env = "DELUGE_PORT")]
    pub port: Option<u16>,

    /// Extra checks made while waiting for add or remove to take effect.
    #[arg(long, default_value_t = 3)]
    pub retries: u32,

    /// Milliseconds between those checks.
    #[arg(long, default_value_t = 100)]
    pub interval_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Operations on the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub(crate) enum Command {
    /// List torrents and their files.
    List,
    /// Add a torrent file.
    Add {
        /// Path to the .torrent file.
        path: String,
    },
    /// Remove a torrent by id.
    Remove {
        /// Torrent id as shown by `list`.
        id: String,
    },
    /// Run deluged in the foreground until it exits.
    StartDaemon,
}
