// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Append-only, newline-delimited JSON write-ahead log.
//!
//! Each line is one [`WalEntry`]: a monotonically increasing sequence
//! number plus the `qntx_core::Event` it carries. Corruption (a line that
//! doesn't parse, or raw binary data) is expected to happen after an
//! unclean shutdown; `open` quarantines everything from the first bad
//! line onward into a rotated `.bak` file and keeps going with the valid
//! prefix rather than refusing to start.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use qntx_core::Event;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::snapshot::rotate_bak_path;

#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One recorded mutation, as written to the WAL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalEntry {
    pub seq: u64,
    pub event: Event,
}

/// Flush after this many unflushed appends even if nobody asked.
const NEEDS_FLUSH_THRESHOLD: u64 = 100;

/// An append-only log of events backed by a single file.
pub struct Wal {
    path: PathBuf,
    writer: BufWriter<File>,
    write_seq: u64,
    processed_seq: u64,
    /// Byte offset `next_unprocessed` will read from next.
    read_cursor: u64,
    unflushed: u64,
}

impl Wal {
    /// Open (or create) the WAL at `path`.
    ///
    /// `processed_seq` is the sequence number already durable in the last
    /// snapshot; entries at or below it are skipped by
    /// [`Wal::next_unprocessed`] on replay. Any trailing corruption is
    /// rotated out to a `.bak` file; the valid prefix is preserved.
    pub fn open(path: impl AsRef<Path>, processed_seq: u64) -> Result<Self, WalError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            File::create(&path)?;
        }

        let (valid_lines, write_seq, had_corruption) = Self::scan_valid_prefix(&path)?;

        if had_corruption {
            let bak = rotate_bak_path(&path);
            fs::rename(&path, &bak)?;
            let mut clean = File::create(&path)?;
            for line in &valid_lines {
                clean.write_all(line.as_bytes())?;
                clean.write_all(b"\n")?;
            }
            clean.flush()?;
        }

        let file = OpenOptions::new().append(true).open(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            write_seq,
            processed_seq,
            read_cursor: 0,
            unflushed: 0,
        })
    }

    /// Read every line, splitting into the valid JSON prefix and a flag
    /// for whether anything after it failed to parse.
    fn scan_valid_prefix(path: &Path) -> Result<(Vec<String>, u64, bool), WalError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut valid = Vec::new();
        let mut seq = 0u64;
        let mut corrupted = false;

        for raw in reader.split(b'\n') {
            let raw = raw?;
            if raw.is_empty() {
                continue;
            }
            let Ok(line) = String::from_utf8(raw) else {
                corrupted = true;
                break;
            };
            match serde_json::from_str::<WalEntry>(&line) {
                Ok(entry) => {
                    seq = entry.seq;
                    valid.push(line);
                }
                Err(_) => {
                    corrupted = true;
                    break;
                }
            }
        }

        Ok((valid, seq, corrupted))
    }

    /// Append an event, returning its assigned sequence number.
    ///
    /// Buffered: call [`Wal::flush`] to guarantee durability.
    pub fn append(&mut self, event: &Event) -> Result<u64, WalError> {
        self.write_seq += 1;
        let entry = WalEntry { seq: self.write_seq, event: event.clone() };
        let line = serde_json::to_string(&entry)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.unflushed += 1;
        Ok(entry.seq)
    }

    pub fn flush(&mut self) -> Result<(), WalError> {
        self.writer.flush()?;
        self.unflushed = 0;
        Ok(())
    }

    /// True once enough unflushed appends have piled up that the caller
    /// should flush soon.
    pub fn needs_flush(&self) -> bool {
        self.unflushed >= NEEDS_FLUSH_THRESHOLD
    }

    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }

    pub fn processed_seq(&self) -> u64 {
        self.processed_seq
    }

    pub fn mark_processed(&mut self, seq: u64) {
        self.processed_seq = self.processed_seq.max(seq);
    }

    /// Read the next not-yet-processed entry, advancing the internal
    /// cursor past it.
    ///
    /// Returns `Ok(None)` both at end-of-file and when the next line is
    /// corrupt (the cursor still advances past a corrupt line, so a
    /// later call can reach entries appended after it).
    pub fn next_unprocessed(&mut self) -> Result<Option<WalEntry>, WalError> {
        loop {
            let file = File::open(&self.path)?;
            let mut reader = BufReader::new(file);
            reader.seek_relative(self.read_cursor as i64)?;

            let mut line = Vec::new();
            let read = reader.read_until(b'\n', &mut line)?;
            if read == 0 {
                return Ok(None);
            }
            self.read_cursor += read as u64;

            if line.last() == Some(&b'\n') {
                line.pop();
            }
            if line.is_empty() {
                continue;
            }

            let parsed = std::str::from_utf8(&line).ok().and_then(|s| serde_json::from_str::<WalEntry>(s).ok());
            match parsed {
                Some(entry) if entry.seq > self.processed_seq => return Ok(Some(entry)),
                Some(_) => continue,
                None => return Ok(None),
            }
        }
    }

    /// All entries with `seq > after_seq`, in file order. Stops (without
    /// erroring) at the first line that fails to parse.
    pub fn entries_after(&self, after_seq: u64) -> Result<Vec<WalEntry>, WalError> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut out = Vec::new();

        for raw in reader.split(b'\n') {
            let raw = raw?;
            if raw.is_empty() {
                continue;
            }
            let Some(s) = std::str::from_utf8(&raw).ok() else { break };
            let Ok(entry) = serde_json::from_str::<WalEntry>(s) else { break };
            if entry.seq > after_seq {
                out.push(entry);
            }
        }

        Ok(out)
    }

    /// Compact the log, keeping only entries with `seq >= keep_from`.
    ///
    /// Used after a snapshot checkpoint to bound WAL size.
    pub fn truncate_before(&mut self, keep_from: u64) -> Result<(), WalError> {
        self.flush()?;
        let kept = self.entries_after(keep_from.saturating_sub(1))?;

        let mut clean = File::create(&self.path)?;
        for entry in &kept {
            let line = serde_json::to_string(entry)?;
            clean.write_all(line.as_bytes())?;
            clean.write_all(b"\n")?;
        }
        clean.flush()?;

        let file = OpenOptions::new().append(true).open(&self.path)?;
        self.writer = BufWriter::new(file);
        self.read_cursor = 0;
        Ok(())
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
