//! Transcribe a local audio file on the CPU and save it as .txt next to it.
//!
//! Usage: cargo run --example basic -- path/to/audio.mp3

use whisper_txt::{DevicePreference, TranscriberOptions};

#[tokio::main]
async fn main() {
    let path = std::env::args()
        .nth(1)
        .expect("usage: basic <audio-file>");

    let opts = TranscriberOptions::new()
        .device(DevicePreference::Cpu);

    match whisper_txt::transcribe_to_file(&path, &opts).await {
        Ok(done) => {
            println!("{}", done.transcript.text);
            eprintln!("saved to {}", done.output_path.display());
        }
        Err(e) => eprintln!("error: {e}"),
    }
}
