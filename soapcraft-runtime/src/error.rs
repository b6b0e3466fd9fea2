//! Error types for SOAP client runtime (spec.md §7 "Runtime errors are
//! disjoint: HTTPNotOk, InvalidMimeType, XMLParseError, SOAPFault,
//! DeserializationFailure").

use thiserror::Error;

/// Result type for SOAP operations
pub type SoapResult<T> = std::result::Result<T, SoapError>;

/// Errors that can occur during SOAP operations
#[derive(Error, Debug)]
pub enum SoapError {
    /// The transport itself failed (connection refused, timed out, TLS
    /// failure, ...) before a status code was ever produced.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// A status code outside `{200, 500}` was returned (spec.md §6:
    /// "Accept HTTP 200 ... and 500 ... All other status codes raise
    /// HTTPNotOk(code, body)").
    #[error("HTTP request returned status {status}: {body}")]
    HttpNotOk { status: u16, body: String },

    /// The response `Content-Type` did not start with `text/xml`
    /// (spec.md §6).
    #[error("Invalid response Content-Type: '{content_type}' (expected text/xml)")]
    InvalidMimeType { content_type: String },

    /// XML parsing error
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// SOAP fault received from server (spec.md §6 "Fault mapping":
    /// faultcode/faultstring/faultactor/detail).
    #[error("SOAP fault: {code} - {message}")]
    SoapFault {
        code: String,
        message: String,
        actor: Option<String>,
        detail: Option<String>,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// Invalid response format
    #[error("Invalid SOAP response: {0}")]
    InvalidResponse(String),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Other errors
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl From<quick_xml::Error> for SoapError {
    fn from(err: quick_xml::Error) -> Self {
        SoapError::XmlError(err.to_string())
    }
}

impl From<quick_xml::DeError> for SoapError {
    fn from(err: quick_xml::DeError) -> Self {
        SoapError::DeserializationError(err.to_string())
    }
}
