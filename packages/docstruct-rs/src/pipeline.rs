//! Image bytes to structured JSON, one document at a time.
use docstruct_ocr::{OcrEngine, OcrInput};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::PipelineError;
use crate::gemini::StructuringModel;
use crate::prompt::create_prompt;
use crate::response::ReplyFormat;

/// Prompts the model with `text` and parses its reply.
pub async fn structure_text(
    model: &dyn StructuringModel,
    text: &str,
    format: ReplyFormat,
) -> Result<Value, PipelineError> {
    let prompt = create_prompt(text);
    let raw = model.generate(&prompt).await?;
    debug!(model = model.name(), reply_chars = raw.len(), "model replied");
    Ok(format.parse(&raw)?)
}

/// OCRs an uploaded image and structures the text.
///
/// An image without readable text never reaches the model.
pub async fn process_image(
    ocr: &dyn OcrEngine,
    model: &dyn StructuringModel,
    image_bytes: Vec<u8>,
) -> Result<Value, PipelineError> {
    let output = ocr.recognize(&OcrInput::Bytes(image_bytes)).await?;
    if !output.has_text() {
        return Err(PipelineError::NoText);
    }
    info!(chars = output.text.len(), "ocr extracted text");

    structure_text(model, &output.text, ReplyFormat::Strict).await
}
