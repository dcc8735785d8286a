//! Image generation example using DALL-E.
//!
//! ```bash
//! export OPENAI_API_KEY=sk-...
//! cargo run --example generate_image
//! ```

#![allow(clippy::print_stdout)]

use openai_lite::image::{MODEL_DALL_E_2, RESPONSE_FORMAT_URL, SIZE_512X512};
use openai_lite::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter("openai_lite=debug")
        .init();

    let client = Client::from_env()?;

    let params = GenerateImageParams::new("Pixel programming cat with a hat")
        .with_model(MODEL_DALL_E_2)
        .with_size(SIZE_512X512)
        .with_response_format(RESPONSE_FORMAT_URL)
        .with_n(1);

    let response = client.generate_image(&params).await?;

    for image in &response.data {
        if let Some(url) = &image.url {
            println!("{url}");
        }
    }

    Ok(())
}
