//! OCR every allow-listed image in a directory into a list of [`OcrRecord`]s.
use std::path::{Path, PathBuf};

use anyhow::Result;
use docstruct_ocr::{OcrEngine, OcrInput};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::batch::{progress_bar, write_json_pretty, BatchOutcome, BatchSummary, ItemOutcome, ALLOWED_EXTENSIONS};

/// One image's OCR result. Exactly one of `extracted_text` and `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrRecord {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OcrRecord {
    pub fn success(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            extracted_text: Some(text.into()),
            error: None,
        }
    }

    pub fn failure(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            extracted_text: None,
            error: Some(error.into()),
        }
    }

    /// Text worth sending on: present, not blank, and not from an errored record.
    pub fn usable_text(&self) -> Option<&str> {
        if self.error.is_some() {
            return None;
        }
        self.extracted_text
            .as_deref()
            .filter(|text| !text.is_empty())
    }
}

pub struct OcrBatchOptions {
    pub input_dir: PathBuf,
    pub output_file_path: PathBuf,
    pub verbose: bool,
}

impl Default for OcrBatchOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input_images"),
            output_file_path: PathBuf::from("output_list.json"),
            verbose: true,
        }
    }
}

fn has_allowed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| ALLOWED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Files directly inside `dir` with an allow-listed extension, ordered by name.
/// Symlinks are resolved, so a link to an image counts as a file.
pub fn collect_image_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.into_path())
        .filter(|p| has_allowed_extension(p))
        .collect()
}

async fn ocr_file(engine: &dyn OcrEngine, path: &Path, filename: &str) -> (OcrRecord, ItemOutcome) {
    match engine.recognize(&OcrInput::FilePath(path.to_path_buf())).await {
        Ok(output) => (
            OcrRecord::success(filename, output.text.trim()),
            ItemOutcome::Success,
        ),
        Err(e) => {
            warn!(file = %filename, "could not process file: {e}");
            (
                OcrRecord::failure(filename, format!("Error processing file: {e}")),
                ItemOutcome::Failed,
            )
        }
    }
}

/// Runs OCR over the input directory and writes the records to the output file.
pub async fn run_ocr_batch(options: &OcrBatchOptions, engine: &dyn OcrEngine) -> Result<BatchOutcome> {
    if !options.input_dir.is_dir() {
        error!("input directory not found at '{}'", options.input_dir.display());
        return Ok(BatchOutcome::InputMissing);
    }

    let image_files = collect_image_files(&options.input_dir);
    if image_files.is_empty() {
        info!("no images found in '{}'", options.input_dir.display());
        return Ok(BatchOutcome::NothingToDo);
    }

    info!("found {} images to process, starting OCR", image_files.len());

    let pb = progress_bar(image_files.len(), options.verbose, "Processing Images");
    let mut records = Vec::with_capacity(image_files.len());
    let mut summary = BatchSummary::default();

    for path in &image_files {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (record, outcome) = ocr_file(engine, path, &filename).await;
        summary.record(outcome);
        records.push(record);
        pb.inc(1);
    }
    pb.finish_and_clear();

    write_json_pretty(&options.output_file_path, &records)?;

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "processed {} images, results saved to '{}'",
        summary.total(),
        options.output_file_path.display()
    );

    Ok(BatchOutcome::Completed(summary))
}
