//! Runtime configuration for the inference client and the OCR engine.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use docstruct_ocr::{OcrEngine, TesseractOcrEngine};
use tracing::debug;

pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Where and as whom to reach Gemini.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl GeminiConfig {
    /// Reads the API key from `GOOGLE_API_KEY`, leaving everything else at its default.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).ok(),
            ..Self::default()
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

/// Which OCR engine to run and how.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Path or name of the `tesseract` executable.
    pub command: PathBuf,
    pub language: String,
    /// Run tesseract in-process through libtesseract instead of the CLI.
    pub embedded: bool,
    pub tessdata_path: Option<PathBuf>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: PathBuf::from(docstruct_ocr::tesseract::DEFAULT_COMMAND),
            language: docstruct_ocr::tesseract::DEFAULT_LANGUAGE.to_string(),
            embedded: false,
            tessdata_path: None,
        }
    }
}

pub fn build_ocr_engine(config: &OcrConfig) -> Result<Arc<dyn OcrEngine>> {
    if config.embedded {
        return build_embedded_engine(config);
    }
    debug!(command = %config.command.display(), language = %config.language, "using tesseract CLI");
    Ok(Arc::new(TesseractOcrEngine::with_command(
        config.command.clone(),
        config.language.clone(),
    )))
}

#[cfg(feature = "leptess")]
fn build_embedded_engine(config: &OcrConfig) -> Result<Arc<dyn OcrEngine>> {
    debug!(language = %config.language, "using in-process tesseract");
    Ok(Arc::new(docstruct_ocr::LeptessOcrEngine::new(
        config.tessdata_path.clone(),
        config.language.clone(),
    )))
}

#[cfg(not(feature = "leptess"))]
fn build_embedded_engine(_config: &OcrConfig) -> Result<Arc<dyn OcrEngine>> {
    Err(anyhow::anyhow!(
        "in-process OCR requested but docstruct was built without the `leptess` feature"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_defaults() {
        let config = GeminiConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, "gemini-1.5-flash-latest");
        assert_eq!(config.base_url, "https://generativelanguage.googleapis.com");
    }

    #[test]
    fn cli_engine_is_the_default() {
        assert!(build_ocr_engine(&OcrConfig::default()).is_ok());
    }

    #[cfg(not(feature = "leptess"))]
    #[test]
    fn embedded_engine_needs_feature() {
        let config = OcrConfig {
            embedded: true,
            ..OcrConfig::default()
        };
        let err = build_ocr_engine(&config).err().unwrap();
        assert!(err.to_string().contains("leptess"));
    }
}
