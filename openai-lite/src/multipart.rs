//! `multipart/form-data` encoding of audio uploads.

use std::path::Path;

use reqwest::header::HeaderValue;
use reqwest::multipart::{Form, Part};

use crate::audio::AudioParams;
use crate::body::RequestBody;
use crate::error::{EncodeError, Error, Result};

/// Builds the upload form for an audio request.
///
/// Parts are written in a fixed order: `file`, `model`, then `prompt`,
/// `language`, `response_format` and `temperature` when set.
pub(crate) async fn audio_form(params: &AudioParams) -> Result<RequestBody> {
    let file = file_part(&params.file_path).await?;

    let mut form = Form::new()
        .part("file", file)
        .text("model", params.model.clone());

    for (name, value) in optional_fields(params) {
        form = form.text(name, value);
    }

    let content_type = content_type(&form)?;
    Ok(RequestBody::Multipart { form, content_type })
}

/// Optional text fields that carry a non-default value, in wire order.
fn optional_fields(params: &AudioParams) -> Vec<(&'static str, String)> {
    let mut fields = Vec::with_capacity(4);

    if !params.prompt.is_empty() {
        fields.push(("prompt", params.prompt.clone()));
    }
    if !params.language.is_empty() {
        fields.push(("language", params.language.clone()));
    }
    if !params.response_format.is_empty() {
        fields.push(("response_format", params.response_format.clone()));
    }
    if params.temperature != 0.0 {
        fields.push(("temperature", format!("{:.2}", params.temperature)));
    }

    fields
}

/// Reads the whole file into a part named after its base name.
///
/// The file handle lives only for the duration of the read.
async fn file_part(path: &Path) -> Result<Part> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|source| EncodeError::File {
            path: path.to_path_buf(),
            source,
        })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    tracing::trace!(file = %file_name, bytes = data.len(), mime = %mime, "encoded upload file");

    Part::bytes(data)
        .file_name(file_name)
        .mime_str(mime.as_ref())
        .map_err(|e| EncodeError::Part(e).into())
}

fn content_type(form: &Form) -> Result<HeaderValue> {
    HeaderValue::from_str(&format!("multipart/form-data; boundary={}", form.boundary()))
        .map_err(|e| Error::config(format!("invalid multipart boundary: {e}")))
}
