//! # docstruct-rs
//!
//! Turn photos and scans of documents into structured JSON: OCR the image, hand the text to
//! Gemini, parse what comes back.
//!
//! ## Features
//!
//! - **HTTP service**: `POST /process-image/` takes one multipart upload and answers with the
//!   structured JSON (or a `detail` error)
//! - **Batch OCR**: OCR every allow-listed image in a directory into a list of records
//! - **Batch structuring**: send each OCR record through Gemini and collect the results
//! - **Pluggable engines**: OCR and inference sit behind async traits so either can be swapped
//!
//! ## Quick Start
//!
//! ```ignore
//! use docstruct_rs::prelude::*;
//!
//! let model = GeminiClient::new(&GeminiConfig::from_env())?;
//! let ocr = TesseractOcrEngine::new();
//!
//! let bytes = std::fs::read("receipt.png")?;
//! let data = process_image(&ocr, &model, bytes).await?;
//! println!("{}", serde_json::to_string_pretty(&data)?);
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod gemini;
pub mod pipeline;
pub mod prompt;
pub mod response;
pub mod server;

pub use batch::ocr::{run_ocr_batch, OcrBatchOptions, OcrRecord};
pub use batch::structure::{run_structuring_batch, StructuredRecord, StructuringBatchOptions};
pub use batch::{BatchOutcome, BatchSummary, ItemOutcome, ALLOWED_EXTENSIONS};
pub use config::{build_ocr_engine, GeminiConfig, OcrConfig};
pub use error::PipelineError;
pub use gemini::{GeminiClient, InferenceError, StructuringModel};
pub use pipeline::{process_image, structure_text};
pub use prompt::create_prompt;
pub use response::{strip_code_fences, ReplyFormat, ResponseFormatError};
pub use server::{router, AppState, ServerOptions};

pub use docstruct_ocr::{OcrEngine, OcrError, OcrInput, OcrOutput, TesseractOcrEngine};

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```ignore
/// use docstruct_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        build_ocr_engine, create_prompt, process_image, run_ocr_batch, run_structuring_batch,
        strip_code_fences, structure_text, BatchOutcome, BatchSummary, GeminiClient, GeminiConfig,
        InferenceError, ItemOutcome, OcrBatchOptions, OcrConfig, OcrEngine, OcrError, OcrInput,
        OcrOutput, OcrRecord, PipelineError, ReplyFormat, StructuredRecord, StructuringBatchOptions,
        StructuringModel, TesseractOcrEngine,
    };
}
