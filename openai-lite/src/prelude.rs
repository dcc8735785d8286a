//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust,ignore
//! use openai_lite::prelude::*;
//! ```

pub use crate::audio::{AudioParams, AudioResponse, WHISPER_1};
pub use crate::client::Client;
pub use crate::config::ClientConfig;
pub use crate::error::{ApiError, Error, RequestError, Result};
pub use crate::image::{GenerateImageParams, GenerateImageResponse, ImageData};
pub use tokio_util::sync::CancellationToken;
