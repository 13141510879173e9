//! Error kinds produced while decoding TMX/TSX documents.

use thiserror::Error;

/// Fatal conversion failures.
///
/// Every variant aborts the whole import: no partially decoded map is ever
/// handed to the host. Missing component templates are not errors, they are
/// reported as warnings by the scene conversion layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TmxError {
    /// Unparsable XML, wrong root element or a missing/unparsable required attribute.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Encoding, compression or orientation this importer does not implement.
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// Payload bytes or tile references that contradict the declared layout.
    #[error("Corrupt data: {0}")]
    CorruptData(String),

    /// Referenced external tileset or image could not be found.
    #[error("Missing asset: {0}")]
    MissingAsset(String),
}

impl From<xml::reader::Error> for TmxError {
    fn from(err: xml::reader::Error) -> Self {
        Self::MalformedDocument(err.to_string())
    }
}

impl From<base64::DecodeError> for TmxError {
    fn from(err: base64::DecodeError) -> Self {
        Self::CorruptData(format!("invalid base64 payload: {err}"))
    }
}
