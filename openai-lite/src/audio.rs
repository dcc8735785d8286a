//! Audio API: transcription and translation (Whisper).

use std::path::PathBuf;

use reqwest::Method;
use serde::Deserialize;

use crate::client::Client;
use crate::error::Result;
use crate::multipart;

/// The Whisper v1 speech recognition model.
pub const WHISPER_1: &str = "whisper-1";

/// Transcript formats returned as plain text rather than JSON.
const PLAIN_TEXT_FORMATS: [&str; 3] = ["text", "srt", "vtt"];

/// Parameters of a transcription or translation request.
///
/// Empty strings and a zero temperature mean "not set" and are left out of
/// the upload form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioParams {
    /// Path of the audio file to upload: flac, mp3, mp4, mpeg, mpga, m4a,
    /// ogg, wav or webm.
    pub file_path: PathBuf,
    /// ID of the model to use, e.g. [`WHISPER_1`].
    pub model: String,
    /// Language of the input audio in ISO-639-1 format.
    pub language: String,
    /// Text to guide the model's style or continue a previous segment.
    pub prompt: String,
    /// Transcript format: `json`, `text`, `srt`, `verbose_json` or `vtt`.
    pub response_format: String,
    /// Sampling temperature between 0 and 1.
    pub temperature: f32,
}

impl AudioParams {
    /// Creates parameters for uploading `file_path` to `model`.
    #[must_use]
    pub fn new(file_path: impl Into<PathBuf>, model: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            model: model.into(),
            ..Self::default()
        }
    }

    /// Sets the input language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the guiding prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Sets the transcript format.
    #[must_use]
    pub fn with_response_format(mut self, format: impl Into<String>) -> Self {
        self.response_format = format.into();
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn expects_plain_text(&self) -> bool {
        PLAIN_TEXT_FORMATS.contains(&self.response_format.as_str())
    }
}

/// Response of the audio endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AudioResponse {
    /// The transcribed or translated text.
    pub text: String,
    /// Detected language (`verbose_json` only).
    #[serde(default)]
    pub language: Option<String>,
    /// Duration of the input audio in seconds (`verbose_json` only).
    #[serde(default)]
    pub duration: Option<f32>,
}

impl Client {
    /// Transcribes audio into the input language.
    ///
    /// # Errors
    ///
    /// Returns an encoding error if the file cannot be read (no request is
    /// sent), or any transport, service or decoding error of the call.
    pub async fn create_transcription(&self, params: &AudioParams) -> Result<AudioResponse> {
        self.call_audio_api(params, "/audio/transcriptions").await
    }

    /// Translates audio into English.
    ///
    /// # Errors
    ///
    /// Same as [`Client::create_transcription`].
    pub async fn create_translation(&self, params: &AudioParams) -> Result<AudioResponse> {
        self.call_audio_api(params, "/audio/translations").await
    }

    async fn call_audio_api(&self, params: &AudioParams, suffix: &str) -> Result<AudioResponse> {
        self.check_cancelled()?;
        let body = multipart::audio_form(params).await?;

        if params.expects_plain_text() {
            let bytes = self.send_raw(Method::POST, suffix, body).await?;
            return Ok(AudioResponse {
                text: String::from_utf8_lossy(&bytes).into_owned(),
                ..AudioResponse::default()
            });
        }

        self.send(Method::POST, suffix, body).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod audio_params {
        use super::*;

        #[test]
        fn new_leaves_optionals_unset() {
            let params = AudioParams::new("voice.m4a", WHISPER_1);

            assert_eq!(params.file_path, PathBuf::from("voice.m4a"));
            assert_eq!(params.model, "whisper-1");
            assert!(params.language.is_empty());
            assert!(params.prompt.is_empty());
            assert!(params.response_format.is_empty());
            assert!(params.temperature.abs() < f32::EPSILON);
        }

        #[test]
        fn plain_text_formats() {
            for format in ["text", "srt", "vtt"] {
                let params = AudioParams::new("a.mp3", WHISPER_1).with_response_format(format);
                assert!(params.expects_plain_text(), "{format} should be plain text");
            }
            for format in ["", "json", "verbose_json"] {
                let params = AudioParams::new("a.mp3", WHISPER_1).with_response_format(format);
                assert!(!params.expects_plain_text(), "{format} should be JSON");
            }
        }
    }

    mod audio_response {
        use super::*;

        #[test]
        fn deserializes_minimal_response() {
            let response: AudioResponse = serde_json::from_str(r#"{"text": "Hello world"}"#).unwrap();

            assert_eq!(response.text, "Hello world");
            assert!(response.language.is_none());
            assert!(response.duration.is_none());
        }

        #[test]
        fn deserializes_verbose_response() {
            let json = r#"{
                "task": "transcribe",
                "text": "Hello world",
                "language": "english",
                "duration": 2.5,
                "segments": []
            }"#;

            let response: AudioResponse = serde_json::from_str(json).unwrap();

            assert_eq!(response.text, "Hello world");
            assert_eq!(response.language.as_deref(), Some("english"));
            assert!((response.duration.unwrap() - 2.5).abs() < 0.001);
        }

        #[test]
        fn rejects_missing_text() {
            assert!(serde_json::from_str::<AudioResponse>(r#"{"language":"en"}"#).is_err());
        }
    }
}
