//! Command line arguments backing the `docstruct` binary.
use clap::{Args as ClapArgs, Parser, Subcommand};
use docstruct_rs::config::{DEFAULT_GEMINI_BASE_URL, DEFAULT_MODEL};
use docstruct_rs::server::{DEFAULT_BIND, DEFAULT_MAX_UPLOAD_BYTES};
use docstruct_rs::{GeminiConfig, OcrConfig};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
  name = "docstruct",
  about = "OCR images and turn the extracted text into structured JSON with Gemini",
  version
)]
pub struct Args {
  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Print version information
  Version,
  /// Serve POST /process-image/ over HTTP
  Serve {
    /// Address to listen on
    #[arg(long, env = "DOCSTRUCT_BIND", default_value = DEFAULT_BIND)]
    bind: SocketAddr,

    /// Largest accepted request body, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,

    #[command(flatten)]
    gemini: GeminiArgs,

    #[command(flatten)]
    ocr: OcrArgs,
  },
  /// OCR every image in a directory into a list of records
  Ocr {
    /// Directory holding the images
    #[arg(long, short = 'i', default_value = "input_images")]
    input_dir: PathBuf,

    /// Where to write the OCR records
    #[arg(long, short = 'o', default_value = "output_list.json")]
    output: PathBuf,

    /// Hide the progress bar
    #[arg(long)]
    quiet: bool,

    #[command(flatten)]
    ocr: OcrArgs,
  },
  /// Structure previously extracted OCR records with Gemini
  Structure {
    /// OCR records produced by `docstruct ocr`
    #[arg(long, short = 'i', default_value = "output_list.json")]
    input: PathBuf,

    /// Where to write the structured records
    #[arg(long, short = 'o', default_value = "structured_output.json")]
    output: PathBuf,

    /// Hide the progress bar
    #[arg(long)]
    quiet: bool,

    #[command(flatten)]
    gemini: GeminiArgs,
  },
}

#[derive(ClapArgs, Debug)]
pub struct GeminiArgs {
  /// Gemini API key
  #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
  pub api_key: Option<String>,

  /// Gemini model name
  #[arg(long, env = "DOCSTRUCT_MODEL", default_value = DEFAULT_MODEL)]
  pub model: String,

  /// Base URL of the Gemini API
  #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
  pub gemini_base_url: String,
}

impl From<GeminiArgs> for GeminiConfig {
  fn from(args: GeminiArgs) -> Self {
    Self {
      api_key: args.api_key,
      model: args.model,
      base_url: args.gemini_base_url,
    }
  }
}

#[derive(ClapArgs, Debug)]
pub struct OcrArgs {
  /// tesseract executable
  #[arg(long, env = "TESSERACT_CMD", default_value = "tesseract")]
  pub tesseract_cmd: PathBuf,

  /// tesseract language
  #[arg(long, env = "TESSERACT_LANG", default_value = "eng")]
  pub lang: String,

  /// Run tesseract in-process (requires the `leptess` feature)
  #[arg(long)]
  pub embedded: bool,

  /// tessdata directory for in-process OCR
  #[arg(long, env = "TESSDATA_PREFIX")]
  pub tessdata: Option<PathBuf>,
}

impl From<OcrArgs> for OcrConfig {
  fn from(args: OcrArgs) -> Self {
    Self {
      command: args.tesseract_cmd,
      language: args.lang,
      embedded: args.embedded,
      tessdata_path: args.tessdata,
    }
  }
}
