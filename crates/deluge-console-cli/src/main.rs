//! # Deluge Console CLI
//!
//! ## Usage
//!
//! ```sh,ignore
//! cargo run --release -p deluge-console-cli -- --dir /usr/bin list
//! ```

use std::{process::ExitCode, time::Duration};

use clap::Parser;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use deluge_console_controller::{DaemonProcess, DelugeConsoleClient, PollSchedule};
use deluge_console_types::{ConsoleError, DelugeController, DelugePaths, Torrent};

mod cli;

use cli::{Cli, Command};

/// Error variants for the CLI.
#[derive(Error, Debug)]
enum Error {
    /// The console or the library reported an error.
    #[error(transparent)]
    Console(#[from] ConsoleError),

    /// The daemon did not reflect the change within the poll budget.
    #[error("{0} was not confirmed by the daemon")]
    NotConfirmed(String),

    /// The foreground daemon exited unsuccessfully.
    #[error("deluged exited with {0}")]
    DaemonExited(String),
}

/// Initializes the tracing subscriber.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_torrent(torrent: &Torrent) {
    println!(
        "{}  {}  {} bytes  {:.2}%",
        torrent.id,
        torrent.name,
        torrent.size,
        torrent.progress * 100.0
    );
    for file in &torrent.files {
        println!(
            "    {}  {} bytes  {:.2}%",
            file.path,
            file.size,
            file.progress * 100.0
        );
    }
}

fn confirmed(ok: bool, what: String) -> Result<(), Error> {
    if ok {
        info!("Done {what}");
        Ok(())
    } else {
        Err(Error::NotConfirmed(what))
    }
}

/// Runs deluged in the foreground until it exits.
fn run_daemon(paths: &DelugePaths) -> Result<(), Error> {
    // -d keeps deluged in the foreground so the handle owns the real process.
    let mut daemon = DaemonProcess::new(paths).with_args(["-d"]);
    daemon.start()?;
    info!("deluged running from {}", paths.dir().display());

    match daemon.wait()? {
        Some(status) if !status.success() => Err(Error::DaemonExited(status.to_string())),
        _ => Ok(()),
    }
}

/// Connects, runs `f` and disconnects, also when `f` failed.
fn with_client<F>(cli: &Cli, paths: &DelugePaths, f: F) -> Result<(), Error>
where
    F: FnOnce(&DelugeConsoleClient) -> Result<(), Error>,
{
    let schedule = PollSchedule::new(cli.retries, Duration::from_millis(cli.interval_ms));
    let mut client =
        DelugeConsoleClient::new(paths, Some(&cli.host), cli.port).with_poll_schedule(schedule);
    client.connect()?;

    let result = f(&client);
    let disconnected = client.disconnect();
    result?;
    disconnected?;
    Ok(())
}

fn run(cli: &Cli) -> Result<(), Error> {
    let paths = DelugePaths::from_dir(&cli.dir)?;

    match &cli.command {
        Command::StartDaemon => run_daemon(&paths),
        Command::List => with_client(cli, &paths, |client| {
            let torrents = client.list()?;
            torrents.iter().for_each(print_torrent);
            info!("{} torrents", torrents.len());
            Ok(())
        }),
        Command::Add { path } => with_client(cli, &paths, |client| {
            confirmed(client.add(path)?, format!("adding {path}"))
        }),
        Command::Remove { id } => with_client(cli, &paths, |client| {
            confirmed(client.remove(id)?, format!("removing {id}"))
        }),
    }
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
