//! Shared test utilities and fixtures.

/// Builder for one torrent block in the format printed by `info -v`.
#[derive(Debug, Clone)]
pub(crate) struct TorrentBlock {
    name: String,
    id: String,
    downloaded: Option<String>,
    size: String,
    progress: Option<String>,
    files: Vec<String>,
}

impl TorrentBlock {
    pub(crate) fn new(name: &str, id: &str) -> Self {
        Self {
            name: name.to_string(),
            id: id.to_string(),
            downloaded: None,
            size: "1.00 MiB".to_string(),
            progress: None,
            files: Vec::new(),
        }
    }

    pub(crate) fn downloaded(mut self, downloaded: &str) -> Self {
        self.downloaded = Some(downloaded.to_string());
        self
    }

    pub(crate) fn size(mut self, size: &str) -> Self {
        self.size = size.to_string();
        self
    }

    /// Adds the eighth summary line. Without it the block looks like a seeding torrent.
    pub(crate) fn progress(mut self, progress: &str) -> Self {
        self.progress = Some(progress.to_string());
        self
    }

    pub(crate) fn file(mut self, line: &str) -> Self {
        self.files.push(line.to_string());
        self
    }

    pub(crate) fn render(&self) -> String {
        let state = if self.progress.is_some() {
            "Downloading Down Speed: 1.2 MiB/s Up Speed: 0.0 KiB/s ETA: 2m 3s"
        } else {
            "Seeding Up Speed: 0.0 KiB/s"
        };
        let size = match &self.downloaded {
            Some(downloaded) => format!("{downloaded}/{}", self.size),
            None => self.size.clone(),
        };

        let mut out = format!(
            "Name: {}\nID: {}\nState: {state}\nSeeds: 10 (50) Peers: 2 (30) Availability: 12.00\n\
             Size: {size} Ratio: 0.000\nSeed time: 0 days 00:00:00 Active: 0 days 00:05:12\n\
             Tracker status: tracker.example.org: Announce OK\n",
            self.name, self.id
        );
        if let Some(progress) = &self.progress {
            out.push_str(&format!("Progress: {progress}% [#########~~~~~~~~~]\n"));
        }
        out.push_str("  ::Files\n");
        for file in &self.files {
            out.push_str(&format!("    {file}\n"));
        }
        out.push_str("  ::Peers\n    10.0.0.1:6881 Deluge 1.3.15 Down: 0.0 KiB/s\n");
        out
    }
}

/// Joins blocks the way the console separates torrents: with a blank line.
pub(crate) fn listing(blocks: &[TorrentBlock]) -> String {
    blocks
        .iter()
        .map(TorrentBlock::render)
        .collect::<Vec<_>>()
        .join("\n")
}

/// A listing holding one minimal torrent per id.
pub(crate) fn listing_with_ids(ids: &[&str]) -> String {
    let blocks: Vec<TorrentBlock> = ids
        .iter()
        .map(|id| {
            TorrentBlock::new(&format!("torrent-{id}"), id)
                .progress("50.00")
                .file(&format!(
                    "torrent-{id}/data.bin (1.00 MiB) Progress: 50.00% Priority: Normal"
                ))
        })
        .collect();
    listing(&blocks)
}
