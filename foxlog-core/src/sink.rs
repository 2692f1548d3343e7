//! Append-only event persistence.
//!
//! Events land in one CSV file per war:
//!
//! ```text
//! <output_dir>/foxhole_events_war_<warNumber>.csv
//! ```
//!
//! The file's existence is the marker that its header has been written, so
//! initialisation never truncates and the tracker can resume appending to the
//! same war after a restart. Every append is its own open/write/flush/close;
//! a crash loses at most the row being written.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{FoxlogError, Result};
use crate::event::{CSV_HEADER, TransitionEvent};

/// Destination for transition events.
pub trait EventSink {
    /// Make sure the event file for `war_number` exists with its header.
    ///
    /// Returns `true` if the file was created by this call.
    ///
    /// # Errors
    /// Returns [`FoxlogError::Persistence`] if the file cannot be created.
    fn ensure_file_for_war(&mut self, war_number: u32) -> Result<bool>;

    /// Durably record one event.
    ///
    /// # Errors
    /// Returns [`FoxlogError::Persistence`] if the row cannot be written.
    fn append(&mut self, event: &TransitionEvent) -> Result<()>;
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Per-war CSV files under a single output directory.
#[derive(Debug, Clone)]
pub struct CsvEventSink {
    output_dir: PathBuf,
}

impl CsvEventSink {
    /// Sink writing under `output_dir` (created on first use).
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Directory the event files live in.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the event file for `war_number`.
    #[must_use]
    pub fn path_for(&self, war_number: u32) -> PathBuf {
        self.output_dir
            .join(format!("foxhole_events_war_{war_number}.csv"))
    }
}

impl EventSink for CsvEventSink {
    fn ensure_file_for_war(&mut self, war_number: u32) -> Result<bool> {
        let path = self.path_for(war_number);
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| FoxlogError::persistence(&self.output_dir, e))?;

        let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "Event file already present");
                return Ok(false);
            }
            Err(e) => return Err(FoxlogError::persistence(path, e)),
        };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .write_record(CSV_HEADER)
            .map_err(|e| FoxlogError::persistence(&path, e))?;
        writer
            .flush()
            .map_err(|e| FoxlogError::persistence(&path, e))?;

        info!(path = %path.display(), war_number, "Created event file");
        Ok(true)
    }

    fn append(&mut self, event: &TransitionEvent) -> Result<()> {
        self.ensure_file_for_war(event.war_number)?;
        let path = self.path_for(event.war_number);

        let file = OpenOptions::new()
            .append(true)
            .open(&path)
            .map_err(|e| FoxlogError::persistence(&path, e))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .serialize(event)
            .map_err(|e| FoxlogError::persistence(&path, e))?;
        writer
            .flush()
            .map_err(|e| FoxlogError::persistence(&path, e))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Sink that keeps everything in memory (useful for tests).
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Every war number a file was requested for, in call order.
    pub wars: Vec<u32>,
    /// Every appended event, in order.
    pub events: Vec<TransitionEvent>,
}

impl MemorySink {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for MemorySink {
    fn ensure_file_for_war(&mut self, war_number: u32) -> Result<bool> {
        let created = !self.wars.contains(&war_number);
        self.wars.push(war_number);
        Ok(created)
    }

    fn append(&mut self, event: &TransitionEvent) -> Result<()> {
        self.events.push(event.clone());
        Ok(())
    }
}
