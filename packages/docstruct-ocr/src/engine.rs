use std::borrow::Cow;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone)]
pub enum OcrInput {
    FilePath(PathBuf),
    Bytes(Vec<u8>),
}

impl OcrInput {
    /// Raw encoded image bytes, read from disk for `FilePath` inputs.
    pub async fn bytes(&self) -> Result<Cow<'_, [u8]>, OcrError> {
        match self {
            OcrInput::FilePath(path) => Ok(Cow::Owned(tokio::fs::read(path).await?)),
            OcrInput::Bytes(data) => Ok(Cow::Borrowed(data.as_slice())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OcrOutput {
    pub text: String,
}

impl OcrOutput {
    /// Whether the engine found anything besides whitespace.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("cannot read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image has zero width or height")]
    EmptyImage,
    #[error("engine error: {0}")]
    EngineError(String),
}

#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, input: &OcrInput) -> Result<OcrOutput, OcrError>;
}
