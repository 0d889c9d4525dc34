use docstruct_ocr::OcrError;
use thiserror::Error;

use crate::gemini::InferenceError;
use crate::response::ResponseFormatError;

/// Everything that can go wrong turning one image into structured data.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The model could not be set up at startup; stays this way until restart.
    #[error("Gemini model is not configured. Check server logs.")]
    NotConfigured,
    #[error("Error during OCR processing: {0}")]
    Ocr(#[from] OcrError),
    #[error("OCR could not extract any text from the provided image.")]
    NoText,
    #[error("An error occurred with the Gemini API: {0}")]
    Inference(#[from] InferenceError),
    #[error("Failed to parse Gemini's response as JSON.")]
    ResponseFormat(#[from] ResponseFormatError),
}

impl PipelineError {
    /// Whether the caller's input, rather than the server, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PipelineError::NoText)
    }

    pub fn raw_response(&self) -> Option<&str> {
        match self {
            PipelineError::ResponseFormat(e) => Some(e.raw_response()),
            _ => None,
        }
    }
}
