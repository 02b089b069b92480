//! Parser for the verbose torrent listing printed by `deluge-console info -v`.
//!
//! The console prints one block per torrent:
//!
//! ```text
//! Name: ubuntu.iso
//! ID: 3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0
//! State: Downloading Down Speed: 1.2 MiB/s Up Speed: 0.0 KiB/s ETA: 2m 3s
//! Seeds: 10 (50) Peers: 2 (30) Availability: 12.00
//! Size: 512.00 MiB/1.50 GiB Ratio: 0.000
//! Seed time: 0 days 00:00:00 Active: 0 days 00:05:12
//! Tracker status: ubuntu.com: Announce OK
//! Progress: 33.33% [#########~~~~~~~~~~~~~~~~~~]
//!   ::Files
//!     ubuntu.iso (1.50 GiB) Progress: 33.33% Priority: Normal
//!   ::Peers
//!     ...
//! ```
//!
//! Summary fields are read by line position. Seeding torrents omit the progress line,
//! in which case the torrent is reported as complete.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace, warn};

use deluge_console_types::{ConsoleError, Torrent, TorrentFile};

const FILES_MARKER: &str = "::Files";
const SECTION_MARKER: &str = "::";

const NAME_LINE: usize = 0;
const ID_LINE: usize = 1;
const SIZE_LINE: usize = 4;
const PROGRESS_LINE: usize = 7;

static TORRENT_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Name:").expect("valid torrent start pattern"));

static SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<magnitude>[0-9]+(?:\.[0-9]+)?) ?(?P<unit>[A-Za-z]+)$")
        .expect("valid size pattern")
});

static SIZE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^Size: (?:[0-9]+(?:\.[0-9]+)? [A-Za-z]+/)?(?P<size>[0-9]+(?:\.[0-9]+)? [A-Za-z]+)",
    )
    .expect("valid size field pattern")
});

static PROGRESS_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Progress: (?P<progress>[0-9]+(?:\.[0-9]+)?)%").expect("valid progress pattern")
});

static FILE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<path>.*) \((?P<size>[0-9]+(?:\.[0-9]+)? [A-Za-z]+)\) Progress: (?P<progress>[0-9]+(?:\.[0-9]+)?)% Priority: (?P<priority>.+)$",
    )
    .expect("valid file line pattern")
});

/// Parse the full output of `info -v` into torrents, in listing order.
///
/// Fails on the first malformed field; no partial listing is returned.
pub fn parse_torrents(listing: &str) -> Result<Vec<Torrent>, ConsoleError> {
    let listing = listing.replace('\r', "");
    let starts: Vec<usize> = TORRENT_START.find_iter(&listing).map(|m| m.start()).collect();

    let preamble = starts.first().map_or(listing.as_str(), |&s| &listing[..s]);
    if !preamble.trim().is_empty() {
        warn!(preamble = preamble.trim(), "Ignoring console output outside torrent blocks");
    }

    let torrents = starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(listing.len());
            parse_torrent(&listing[start..end])
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Parsed {} torrents", torrents.len());
    Ok(torrents)
}

/// Parse a human readable size such as `12.50 MiB` into bytes, rounded to the nearest byte.
///
/// Units are binary (KiB, MiB, GiB) and matched case-insensitively.
pub fn parse_size(size: &str) -> Result<u64, ConsoleError> {
    let caps = SIZE
        .captures(size.trim())
        .ok_or_else(|| ConsoleError::Parse(format!("invalid size: {size:?}")))?;

    let magnitude: f64 = parse_number(&caps["magnitude"], size)?;
    let multiplier = match caps["unit"].to_ascii_lowercase().as_str() {
        "kib" => 1024_f64,
        "mib" => 1024_f64 * 1024.0,
        "gib" => 1024_f64 * 1024.0 * 1024.0,
        _ => return Err(ConsoleError::UnknownSizeUnit(caps["unit"].to_string())),
    };

    Ok((magnitude * multiplier).round() as u64)
}

fn parse_torrent(block: &str) -> Result<Torrent, ConsoleError> {
    let marker = block.find(FILES_MARKER).ok_or_else(|| {
        ConsoleError::Parse(format!(
            "no {FILES_MARKER} section in torrent block starting {:?}",
            first_line(block)
        ))
    })?;
    let summary = &block[..marker];
    let files = &block[marker + FILES_MARKER.len()..];
    let files = files.find(SECTION_MARKER).map_or(files, |end| &files[..end]);

    let lines: Vec<&str> = summary.trim().split('\n').map(str::trim).collect();

    let name = field(&lines, NAME_LINE, "Name:")?;
    let id = field(&lines, ID_LINE, "ID:")?;

    let size_line = line(&lines, SIZE_LINE, "Size")?;
    let size = SIZE_FIELD
        .captures(size_line)
        .ok_or_else(|| ConsoleError::Parse(format!("invalid size line: {size_line:?}")))?;
    let size = parse_size(&size["size"])?;

    // Seeding torrents have no progress line.
    let progress = match lines
        .get(PROGRESS_LINE)
        .and_then(|l| PROGRESS_FIELD.captures(l))
    {
        Some(caps) => parse_percentage(&caps["progress"])?,
        None => 1.0,
    };

    let files = parse_files(files)?;
    trace!(id, name, size, progress, files = files.len(), "Parsed torrent block");

    Ok(Torrent {
        id: id.to_string(),
        name: name.to_string(),
        size,
        progress,
        files,
    })
}

fn parse_files(section: &str) -> Result<Vec<TorrentFile>, ConsoleError> {
    section
        .trim()
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(parse_file)
        .collect()
}

fn parse_file(file_line: &str) -> Result<TorrentFile, ConsoleError> {
    let caps = FILE_LINE
        .captures(file_line)
        .ok_or_else(|| ConsoleError::Parse(format!("invalid file line: {file_line:?}")))?;

    trace!(path = &caps["path"], priority = &caps["priority"], "Parsed file line");
    Ok(TorrentFile {
        path: caps["path"].to_string(),
        size: parse_size(&caps["size"])?,
        progress: parse_percentage(&caps["progress"])?,
    })
}

fn parse_percentage(percentage: &str) -> Result<f64, ConsoleError> {
    Ok(parse_number(percentage, percentage)? / 100.0)
}

fn parse_number(number: &str, context: &str) -> Result<f64, ConsoleError> {
    number
        .parse()
        .map_err(|e| ConsoleError::Parse(format!("invalid number in {context:?}: {e}")))
}

fn line<'a>(lines: &[&'a str], index: usize, what: &str) -> Result<&'a str, ConsoleError> {
    lines.get(index).copied().ok_or_else(|| {
        ConsoleError::Parse(format!(
            "torrent block has {} summary lines, expected {what} on line {index}",
            lines.len()
        ))
    })
}

fn field<'a>(lines: &[&'a str], index: usize, prefix: &str) -> Result<&'a str, ConsoleError> {
    let l = line(lines, index, prefix)?;
    l.strip_prefix(prefix)
        .map(str::trim)
        .ok_or_else(|| ConsoleError::Parse(format!("expected {prefix:?} on line {index}: {l:?}")))
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}
