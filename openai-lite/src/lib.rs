//! openai-lite - A lightweight async client for the OpenAI audio and image APIs
//!
//! Each call encodes its parameters (multipart for audio uploads, JSON for
//! image generation), sends exactly one HTTP request and returns either the
//! decoded response or a typed [`Error`].
//!
//! ```rust,ignore
//! use openai_lite::prelude::*;
//!
//! let client = Client::from_env()?;
//! let params = AudioParams::new("voice.m4a", WHISPER_1);
//! let transcript = client.create_transcription(&params).await?;
//! println!("{}", transcript.text);
//! ```

pub mod audio;
mod body;
mod client;
pub mod config;
pub mod error;
pub mod image;
mod multipart;
pub mod prelude;

pub use audio::{AudioParams, AudioResponse};
pub use client::Client;
pub use config::ClientConfig;
pub use error::{ApiError, EncodeError, Error, RequestError, Result};
pub use image::{GenerateImageParams, GenerateImageResponse, ImageData};
pub use tokio_util::sync::CancellationToken;
