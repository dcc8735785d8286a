//! Image generation API (DALL-E).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::body::RequestBody;
use crate::client::Client;
use crate::error::Result;

/// DALL-E 2.
pub const MODEL_DALL_E_2: &str = "dall-e-2";
/// DALL-E 3.
pub const MODEL_DALL_E_3: &str = "dall-e-3";

/// Finer details and greater consistency (`dall-e-3` only).
pub const QUALITY_HD: &str = "hd";
/// Standard quality.
pub const QUALITY_STANDARD: &str = "standard";

/// Return images as URLs.
pub const RESPONSE_FORMAT_URL: &str = "url";
/// Return images as base64-encoded JSON.
pub const RESPONSE_FORMAT_B64_JSON: &str = "b64_json";

/// 256x256 (`dall-e-2`).
pub const SIZE_256X256: &str = "256x256";
/// 512x512 (`dall-e-2`).
pub const SIZE_512X512: &str = "512x512";
/// 1024x1024.
pub const SIZE_1024X1024: &str = "1024x1024";
/// 1792x1024 (`dall-e-3`).
pub const SIZE_1792X1024: &str = "1792x1024";
/// 1024x1792 (`dall-e-3`).
pub const SIZE_1024X1792: &str = "1024x1792";

/// Hyper-real and dramatic (`dall-e-3` only).
pub const STYLE_VIVID: &str = "vivid";
/// More natural, less hyper-real (`dall-e-3` only).
pub const STYLE_NATURAL: &str = "natural";

/// Parameters of an image generation request.
///
/// Fields holding their zero value are not serialized, so the service only
/// sees options that were set explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerateImageParams {
    /// Text description of the desired image(s).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub prompt: String,
    /// Model to use for image generation.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub model: String,
    /// Number of images to generate (1-10; `dall-e-3` supports only 1).
    #[serde(skip_serializing_if = "is_zero")]
    pub n: u32,
    /// Image quality, see [`QUALITY_HD`].
    #[serde(skip_serializing_if = "String::is_empty")]
    pub quality: String,
    /// `url` or `b64_json`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub response_format: String,
    /// Size of the generated images.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub size: String,
    /// `vivid` or `natural`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub style: String,
    /// End-user identifier used for abuse monitoring.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user: String,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl GenerateImageParams {
    /// Creates parameters for the given prompt.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the number of images.
    #[must_use]
    pub const fn with_n(mut self, n: u32) -> Self {
        self.n = n;
        self
    }

    /// Sets the quality.
    #[must_use]
    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = quality.into();
        self
    }

    /// Sets the response format.
    #[must_use]
    pub fn with_response_format(mut self, format: impl Into<String>) -> Self {
        self.response_format = format.into();
        self
    }

    /// Sets the image size.
    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    /// Sets the style.
    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Sets the end-user identifier.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }
}

/// Response of the image generation endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GenerateImageResponse {
    /// Unix timestamp of creation.
    pub created: i64,
    /// Generated images, in request order.
    #[serde(default)]
    pub data: Vec<ImageData>,
}

/// A single generated image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImageData {
    /// URL of the image (`url` format).
    #[serde(default)]
    pub url: Option<String>,
    /// Base64-encoded image (`b64_json` format).
    #[serde(default)]
    pub b64_json: Option<String>,
    /// Prompt the model actually used, if it rewrote it.
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

impl ImageData {
    /// Decodes the base64 payload, if present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Base64`](crate::Error::Base64) if the payload is not
    /// valid base64.
    pub fn decode_b64_json(&self) -> Result<Option<Vec<u8>>> {
        self.b64_json
            .as_deref()
            .map(|data| STANDARD.decode(data))
            .transpose()
            .map_err(Into::into)
    }
}

impl Client {
    /// Generates images from a prompt.
    ///
    /// # Errors
    ///
    /// Returns any encoding, transport, service or decoding error of the call.
    pub async fn generate_image(
        &self,
        params: &GenerateImageParams,
    ) -> Result<GenerateImageResponse> {
        self.check_cancelled()?;
        let body = RequestBody::json(params)?;
        self.send(Method::POST, "/images/generations", body).await
    }
}
