//! Speech-to-Text example using OpenAI Whisper.
//!
//! ```bash
//! export OPENAI_API_KEY=sk-...
//! cargo run --example voice_to_text -- path/to/voice.m4a
//! ```

#![allow(clippy::print_stdout)]

use openai_lite::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter("openai_lite=debug")
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "test_voice.m4a".to_owned());

    let client = Client::from_env()?;
    let params = AudioParams::new(path, WHISPER_1).with_response_format("verbose_json");
    let response = client.create_transcription(&params).await?;

    println!("\nTranscription:");
    println!("{}", response.text);

    if let Some(lang) = &response.language {
        println!("\nDetected language: {lang}");
    }
    if let Some(duration) = response.duration {
        println!("Duration: {duration:.2}s");
    }

    Ok(())
}
