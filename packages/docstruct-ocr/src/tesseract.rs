//! OCR engine wrapping the `tesseract` command line tool.
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::decode::{decode_image, encode_png};
use crate::engine::{OcrEngine, OcrError, OcrInput, OcrOutput};

pub const DEFAULT_COMMAND: &str = "tesseract";
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Runs `tesseract <image> stdout -l <lang>` once per recognition.
///
/// Input is decoded and re-encoded as PNG first, so any format the `image`
/// crate understands (including animated GIF, of which only the first frame is
/// read) reaches tesseract in a form it accepts.
#[derive(Debug, Clone)]
pub struct TesseractOcrEngine {
    command: PathBuf,
    language: String,
}

impl TesseractOcrEngine {
    pub fn new() -> Self {
        Self::with_command(DEFAULT_COMMAND, DEFAULT_LANGUAGE)
    }

    pub fn with_command(command: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
        }
    }

    pub fn command(&self) -> &PathBuf {
        &self.command
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl Default for TesseractOcrEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrEngine for TesseractOcrEngine {
    async fn recognize(&self, input: &OcrInput) -> Result<OcrOutput, OcrError> {
        let bytes = input.bytes().await?.into_owned();
        let png = tokio::task::spawn_blocking(move || {
            let image = decode_image(&bytes)?;
            encode_png(&image)
        })
        .await
        .map_err(|e| OcrError::EngineError(e.to_string()))??;

        let tmpdir = tempfile::TempDir::with_prefix("docstruct-tesseract")?;
        let input_path = tmpdir.path().join("input.png");
        tokio::fs::write(&input_path, &png).await?;

        debug!(
            command = %self.command.display(),
            language = %self.language,
            bytes = png.len(),
            "running tesseract"
        );

        let output = Command::new(&self.command)
            .arg(&input_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                OcrError::EngineError(format!(
                    "cannot run {}: {}",
                    self.command.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::EngineError(format!(
                "{} exited with {}: {}",
                self.command.display(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(OcrOutput {
            text: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};

    fn white_png(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 255, 255])));
        encode_png(&image).unwrap()
    }

    async fn tesseract_available() -> bool {
        Command::new(DEFAULT_COMMAND)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    #[test]
    fn defaults() {
        let engine = TesseractOcrEngine::default();
        assert_eq!(engine.command(), &PathBuf::from("tesseract"));
        assert_eq!(engine.language(), "eng");
    }

    #[tokio::test]
    async fn undecodable_bytes_fail_before_running_tesseract() {
        let engine = TesseractOcrEngine::with_command("/nonexistent/tesseract", "eng");
        let err = engine
            .recognize(&OcrInput::Bytes(b"GIF89a-truncated".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn missing_binary_is_engine_error() {
        let engine = TesseractOcrEngine::with_command("/nonexistent/tesseract", "eng");
        let err = engine
            .recognize(&OcrInput::Bytes(white_png(64, 32)))
            .await
            .unwrap_err();
        match err {
            OcrError::EngineError(msg) => assert!(msg.contains("/nonexistent/tesseract")),
            other => panic!("expected engine error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn blank_page_yields_no_text() {
        if !tesseract_available().await {
            eprintln!("skipping test: tesseract not found on PATH");
            return;
        }
        let engine = TesseractOcrEngine::new();
        let output = engine
            .recognize(&OcrInput::Bytes(white_png(400, 200)))
            .await
            .unwrap();
        assert!(!output.has_text(), "unexpected text: {:?}", output.text);
    }
}
