//! Outgoing request bodies and the JSON encoder.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use serde::Serialize;

use crate::error::{EncodeError, Result};

/// Content type of JSON request bodies.
pub(crate) const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// An encoded request body, ready to hand to the transport.
#[derive(Debug)]
pub(crate) enum RequestBody {
    /// Serialized JSON.
    Json(Vec<u8>),
    /// A `multipart/form-data` form plus its boundary-bearing content type.
    Multipart {
        form: Form,
        content_type: HeaderValue,
    },
}

impl RequestBody {
    /// Serializes `value` as JSON.
    ///
    /// Fields are emitted in declaration order, so encoding the same value
    /// twice yields identical bytes.
    pub(crate) fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(value).map_err(EncodeError::Json)?;
        Ok(Self::Json(bytes))
    }

    /// Headers this body requires; they take precedence over client defaults.
    pub(crate) fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        match self {
            Self::Json(_) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
            }
            Self::Multipart { content_type, .. } => {
                headers.insert(CONTENT_TYPE, content_type.clone());
            }
        }
        headers
    }

    /// Short label for tracing.
    pub(crate) const fn kind(&self) -> &'static str {
        match self {
            Self::Json(_) => "json",
            Self::Multipart { .. } => "multipart",
        }
    }

    /// Attaches the body to a request builder.
    pub(crate) fn apply(self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::Json(bytes) => builder.body(bytes),
            Self::Multipart { form, .. } => builder.multipart(form),
        }
    }
}
