use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use serde::Serialize;
use whisper_txt::{
    pipeline, AudioTranscriber, Completed, DevicePreference, Failure, Transcript,
    TranscriberOptions, MODEL_NAME,
};

const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(
    name = "whisper-txt",
    about = "Transcribe an audio file and save the text next to it as .txt"
)]
struct Cli {
    /// Audio file to transcribe.
    #[arg(default_value = "audiofile.mp3")]
    input: PathBuf,

    /// Run on the CPU even if a GPU backend is available.
    #[arg(long)]
    cpu: bool,

    /// GPU device ID.
    #[arg(long, default_value = "0")]
    gpu_device: u32,

    /// Print a JSON summary of the result to stdout.
    #[arg(long)]
    json: bool,
}

/// Why a run ended without a saved transcript summary.
#[derive(Debug)]
enum CliError {
    Environment(whisper_txt::Error),
    Pipeline(Failure),
    Json(serde_json::Error),
}

impl CliError {
    /// Lines printed to stderr before exiting.
    fn lines(&self) -> Vec<String> {
        match self {
            CliError::Environment(e) => vec![format!("Error: {e}")],
            CliError::Pipeline(failure) => {
                let mut lines = vec![format!("Error: {failure}")];
                if let Some(hint) = failure.hint() {
                    lines.push(format!("  {hint}"));
                }
                if matches!(failure, Failure::Transcription(_)) {
                    lines.push("Transcription failed; no output file was written.".into());
                }
                lines
            }
            CliError::Json(e) => vec![format!("JSON error: {e}")],
        }
    }

    fn exit_code(&self) -> i32 {
        EXIT_FAILURE
    }
}

/// JSON printed by `--json` after a successful run.
#[derive(Serialize)]
struct Summary<'a> {
    output_path: String,
    transcript: &'a Transcript,
}

fn summary_json(completed: &Completed) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Summary {
        output_path: completed.output_path.display().to_string(),
        transcript: &completed.transcript,
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("whisper_txt=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli).await {
        for line in e.lines() {
            eprintln!("{line}");
        }
        exit(e.exit_code());
    }
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    pipeline::ensure_input(&cli.input).map_err(CliError::Pipeline)?;
    whisper_txt::environment::check()
        .await
        .map_err(CliError::Environment)?;

    let options = build_options(cli);
    eprintln!("Loading {MODEL_NAME} model, this might take a few minutes on first run...");

    let completed = pipeline::run(&cli.input, || AudioTranscriber::initialize(&options))
        .await
        .map_err(CliError::Pipeline)?;

    if completed.transcript.is_empty() {
        eprintln!("No speech detected; wrote an empty transcript.");
    }
    eprintln!("Transcription saved to: {}", completed.output_path.display());

    if cli.json {
        println!("{}", summary_json(&completed).map_err(CliError::Json)?);
    }
    Ok(())
}

fn build_options(cli: &Cli) -> TranscriberOptions {
    let device = if cli.cpu {
        DevicePreference::Cpu
    } else {
        DevicePreference::Auto
    };
    TranscriberOptions::new()
        .device(device)
        .gpu_device(cli.gpu_device)
}
