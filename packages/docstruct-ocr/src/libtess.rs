//! In-process Tesseract through `leptess`, enabled with the `leptess` feature.
use std::path::PathBuf;

use async_trait::async_trait;

use crate::decode::{decode_image, encode_png};
use crate::engine::{OcrEngine, OcrError, OcrInput, OcrOutput};

pub struct LeptessOcrEngine {
    /// `None` uses the tessdata location compiled into libtesseract.
    tessdata_path: Option<PathBuf>,
    language: String,
}

impl LeptessOcrEngine {
    pub fn new(tessdata_path: Option<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            tessdata_path,
            language: language.into(),
        }
    }

    pub fn tessdata_path(&self) -> Option<&PathBuf> {
        self.tessdata_path.as_ref()
    }
}

fn recognize_blocking(
    bytes: &[u8],
    tessdata: Option<&str>,
    language: &str,
) -> Result<String, OcrError> {
    // Leptonica reads fewer formats than `image`, so it always gets PNG.
    let png = encode_png(&decode_image(bytes)?)?;

    // LepTess is not Send, so each call builds its own instance on the blocking thread.
    let mut lt = ::leptess::LepTess::new(tessdata, language)
        .map_err(|e| OcrError::EngineError(format!("cannot initialise tesseract: {e}")))?;

    lt.set_image_from_mem(&png)
        .map_err(|_| OcrError::EngineError("leptonica could not read the image".to_string()))?;

    lt.get_utf8_text()
        .map_err(|e| OcrError::EngineError(e.to_string()))
}

#[async_trait]
impl OcrEngine for LeptessOcrEngine {
    async fn recognize(&self, input: &OcrInput) -> Result<OcrOutput, OcrError> {
        let bytes = input.bytes().await?.into_owned();
        let tessdata = self
            .tessdata_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());
        let language = self.language.clone();

        let text = tokio::task::spawn_blocking(move || {
            recognize_blocking(&bytes, tessdata.as_deref(), &language)
        })
        .await
        .map_err(|e| OcrError::EngineError(e.to_string()))??;

        Ok(OcrOutput { text })
    }
}
