//! Error types for the VPC classic client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the service rejected the call". Other
//! non-expected statuses land in `Http` with the status, the first message of
//! the service's error envelope, and the raw body.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A `{placeholder}` of the path template was not supplied or was empty.
    #[error("missing required path parameter `{0}`")]
    MissingParameter(String),

    /// The operation sends a JSON body and none was supplied.
    #[error("operation `{0}` requires a request body")]
    MissingBody(&'static str),

    /// A model constructor was given an empty required field.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("invalid field `{0}`: {1}")]
    InvalidField(&'static str, String),

    /// The service returned 404.
    #[error("resource not found: {message}")]
    NotFound { message: String },

    /// The service returned a status other than the one the operation expects.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        body: String,
    },

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// No response was received.
    #[error("transport failed: {0}")]
    Transport(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// Polling gave up before the resource reached the wanted status.
    #[error("timed out waiting for status `{wanted}` (last seen `{last}`)")]
    Timeout { wanted: String, last: String },
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<ErrorItem>,
}

#[derive(Deserialize)]
struct ErrorItem {
    message: String,
}

/// Pull the first `errors[].message` out of a service error body, falling
/// back to the raw body.
pub(crate) fn service_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|env| env.errors.into_iter().next())
        .map(|item| item.message)
        .unwrap_or_else(|| body.to_string())
}
