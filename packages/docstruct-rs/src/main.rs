mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Commands};
use docstruct_rs::batch::BatchOutcome;
use docstruct_rs::server::{self, AppState, ServerOptions};
use docstruct_rs::{
  build_ocr_engine, run_ocr_batch, run_structuring_batch, GeminiClient, GeminiConfig, InferenceError,
  OcrBatchOptions, StructuringBatchOptions,
};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();
}

fn report(outcome: BatchOutcome) {
  if let BatchOutcome::Completed(summary) = outcome {
    println!(
      "{} processed: {} succeeded, {} skipped, {} failed",
      summary.total(),
      summary.succeeded,
      summary.skipped,
      summary.failed
    );
  }
}

async fn run(args: Args) -> Result<()> {
  match args.command {
    Commands::Version => {
      println!("docstruct {}", env!("CARGO_PKG_VERSION"));
    }
    Commands::Serve {
      bind,
      max_upload_bytes,
      gemini,
      ocr,
    } => {
      let engine = build_ocr_engine(&ocr.into())?;
      let state = AppState::new(engine, GeminiClient::new(&GeminiConfig::from(gemini)));
      server::serve(
        ServerOptions {
          bind,
          max_upload_bytes,
        },
        state,
      )
      .await?;
    }
    Commands::Ocr {
      input_dir,
      output,
      quiet,
      ocr,
    } => {
      let engine = build_ocr_engine(&ocr.into())?;
      let options = OcrBatchOptions {
        input_dir,
        output_file_path: output,
        verbose: !quiet,
      };
      report(run_ocr_batch(&options, engine.as_ref()).await?);
    }
    Commands::Structure {
      input,
      output,
      quiet,
      gemini,
    } => {
      let model = match GeminiClient::new(&GeminiConfig::from(gemini)) {
        Ok(model) => model,
        Err(e @ InferenceError::MissingApiKey) => {
          error!("{e} Set it in the environment or a .env file.");
          return Ok(());
        }
        Err(e) => return Err(e.into()),
      };
      let options = StructuringBatchOptions {
        input_file_path: input,
        output_file_path: output,
        verbose: !quiet,
      };
      report(run_structuring_batch(&options, &model).await?);
    }
  }
  Ok(())
}

#[tokio::main]
async fn main() {
  let _ = dotenvy::dotenv();
  init_tracing();

  let args = Args::parse();

  if let Err(e) = run(args).await {
    eprintln!("Error: {:#}", e);
    std::process::exit(1);
  }
}
