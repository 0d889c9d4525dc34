//! Sequential batch pipelines: images to OCR records, OCR records to structured records.
//!
//! A failing item never stops a batch. It is recorded with an `error` field and the loop moves
//! on; only structural problems (missing input, missing credential) end a run early.

pub mod ocr;
pub mod structure;

use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// Image extensions picked up by the OCR batch, compared lowercase.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tiff", "bmp", "gif"];

/// How a single batch item ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    Success,
    /// Input was already unusable, so no work was attempted.
    Skipped,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Success => self.succeeded += 1,
            ItemOutcome::Skipped => self.skipped += 1,
            ItemOutcome::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }
}

/// Result of a batch run that did not hit an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Completed(BatchSummary),
    /// The input directory or file does not exist.
    InputMissing,
    /// The input directory holds no allow-listed images.
    NothingToDo,
}

/// Writes `value` as UTF-8 JSON indented by four spaces, leaving non-ASCII text unescaped.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut ser)
        .context("cannot serialize results")?;
    std::fs::write(path, buf).with_context(|| format!("cannot write {}", path.display()))
}

pub(crate) fn progress_bar(len: usize, show: bool, message: &'static str) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{msg}: {wide_bar} {pos}/{len} [{elapsed_precise}<{eta_precise}]")
    {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb
}
