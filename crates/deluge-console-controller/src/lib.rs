//! # Deluge controller using `deluge-console`.
//!
//! Every operation spawns the console executable, waits for it to exit and scrapes its
//! standard output.
//!
//! usage:
//!
//! ```rust,ignore
//! use deluge_console_controller::DelugeConsoleClient;
//! use deluge_console_types::{DelugeController, DelugePaths};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let paths = DelugePaths::from_dir("/usr/bin")?;
//!     let mut client = DelugeConsoleClient::new(&paths, None, None);
//!     client.connect()?;
//!     if client.add("path/to/file.torrent")? {
//!         for torrent in client.list()? {
//!             println!("{} {:.0}%", torrent.name, torrent.progress * 100.0);
//!         }
//!     }
//!     client.disconnect()?;
//!     Ok(())
//! }
//! ```
//!

mod client;
mod daemon;
mod ops;
mod parser;
mod poll;
#[cfg(test)]
mod testutil;

#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tracing_subscriber as _;

pub use client::{DEFAULT_HOST, DelugeConsoleClient};
pub use daemon::DaemonProcess;
pub use ops::{ConsoleOps, ConsoleRunner};
pub use parser::{parse_size, parse_torrents};
pub use poll::PollSchedule;
