//! Send each [`OcrRecord`] through the model and collect [`StructuredRecord`]s.
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::batch::ocr::OcrRecord;
use crate::batch::{progress_bar, write_json_pretty, BatchOutcome, BatchSummary, ItemOutcome};
use crate::error::PipelineError;
use crate::gemini::StructuringModel;
use crate::pipeline::structure_text;
use crate::response::ReplyFormat;

const NO_TEXT_ERROR: &str = "No text extracted during OCR.";
const PARSE_ERROR: &str = "Failed to parse LLM response";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredRecord {
    pub source_filename: String,
    pub structured_data: Value,
}

impl StructuredRecord {
    /// Whether `structured_data` is an error object rather than model output.
    pub fn is_error(&self) -> bool {
        self.structured_data.get("error").is_some()
    }
}

pub struct StructuringBatchOptions {
    pub input_file_path: PathBuf,
    pub output_file_path: PathBuf,
    pub verbose: bool,
}

impl Default for StructuringBatchOptions {
    fn default() -> Self {
        Self {
            input_file_path: PathBuf::from("output_list.json"),
            output_file_path: PathBuf::from("structured_output.json"),
            verbose: true,
        }
    }
}

/// Structures one record. Unusable records are answered locally without calling the model.
pub async fn structure_record(
    model: &dyn StructuringModel,
    record: &OcrRecord,
) -> (StructuredRecord, ItemOutcome) {
    let source_filename = record.filename.clone();

    let Some(text) = record.usable_text() else {
        let message = record.error.as_deref().unwrap_or(NO_TEXT_ERROR);
        return (
            StructuredRecord {
                source_filename,
                structured_data: json!({ "error": message }),
            },
            ItemOutcome::Skipped,
        );
    };

    match structure_text(model, text, ReplyFormat::Fenced).await {
        Ok(structured_data) => (
            StructuredRecord {
                source_filename,
                structured_data,
            },
            ItemOutcome::Success,
        ),
        Err(PipelineError::ResponseFormat(e)) => {
            warn!(file = %source_filename, "model did not return valid JSON, storing raw text");
            (
                StructuredRecord {
                    source_filename,
                    structured_data: json!({
                        "error": PARSE_ERROR,
                        "raw_response": e.raw_response(),
                    }),
                },
                ItemOutcome::Failed,
            )
        }
        Err(e) => {
            warn!(file = %source_filename, "error while structuring: {e}");
            (
                StructuredRecord {
                    source_filename,
                    structured_data: json!({ "error": e.to_string() }),
                },
                ItemOutcome::Failed,
            )
        }
    }
}

/// Converts one input item. An explicit `"error": null` still marks the record as errored.
fn read_record(item: Value) -> Result<OcrRecord, serde_json::Error> {
    let null_error = item.get("error").is_some_and(Value::is_null);
    let mut record: OcrRecord = serde_json::from_value(item)?;
    if null_error {
        record.error = Some(NO_TEXT_ERROR.to_string());
    }
    Ok(record)
}

/// Answers an input item that is not a usable OCR record.
fn invalid_record(item: &Value, err: &serde_json::Error) -> StructuredRecord {
    let source_filename = item
        .get("filename")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    warn!(file = %source_filename, "skipping malformed OCR record: {err}");
    StructuredRecord {
        source_filename,
        structured_data: json!({ "error": format!("Invalid OCR record: {err}") }),
    }
}

/// Reads the OCR records, structures each in order, and writes the results.
pub async fn run_structuring_batch(
    options: &StructuringBatchOptions,
    model: &dyn StructuringModel,
) -> Result<BatchOutcome> {
    let input = match tokio::fs::read_to_string(&options.input_file_path).await {
        Ok(input) => input,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error!(
                "input file not found at '{}', run the OCR batch first to generate it",
                options.input_file_path.display()
            );
            return Ok(BatchOutcome::InputMissing);
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("cannot read {}", options.input_file_path.display())));
        }
    };

    let records: Vec<Value> = serde_json::from_str(&input)
        .with_context(|| format!("{} is not a JSON list", options.input_file_path.display()))?;

    info!(model = model.name(), "processing {} text entries", records.len());

    let pb = progress_bar(records.len(), options.verbose, "Structuring with Gemini");
    let mut results = Vec::with_capacity(records.len());
    let mut summary = BatchSummary::default();

    for item in records {
        let (result, outcome) = match read_record(item.clone()) {
            Ok(record) => structure_record(model, &record).await,
            Err(e) => (invalid_record(&item, &e), ItemOutcome::Skipped),
        };
        summary.record(outcome);
        results.push(result);
        pb.inc(1);
    }
    pb.finish_and_clear();

    write_json_pretty(&options.output_file_path, &results)?;

    info!(
        succeeded = summary.succeeded,
        skipped = summary.skipped,
        failed = summary.failed,
        "processing complete, structured data saved to '{}'",
        options.output_file_path.display()
    );

    Ok(BatchOutcome::Completed(summary))
}
