//! Layer payload codec: base64 text, optional gzip/zlib, little-endian GIDs.

use std::io::Read;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use flate2::read::{DeflateDecoder, GzDecoder};

use crate::error::TmxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Zlib,
}

impl Compression {
    /// `None` and `""` both mean uncompressed.
    pub fn from_attr(value: Option<&str>) -> Result<Self, TmxError> {
        match value.unwrap_or_default() {
            "" => Ok(Self::None),
            "gzip" => Ok(Self::Gzip),
            "zlib" => Ok(Self::Zlib),
            other => Err(TmxError::UnsupportedFeature(format!(
                "layer compression '{other}'"
            ))),
        }
    }
}

/// Only base64 is implemented; CSV and per-tile XML payloads are rejected.
pub fn check_encoding(encoding: Option<&str>) -> Result<(), TmxError> {
    match encoding {
        Some("base64") => Ok(()),
        Some(other) => Err(TmxError::UnsupportedFeature(format!(
            "layer encoding '{other}'"
        ))),
        None => Err(TmxError::UnsupportedFeature(
            "uncompressed XML tile data".into(),
        )),
    }
}

/// Decode base64 text, ignoring the whitespace Tiled wraps payloads in.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, TmxError> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(STANDARD.decode(compact)?)
}

pub fn decompress(bytes: &[u8], method: Compression) -> Result<Vec<u8>, TmxError> {
    match method {
        Compression::None => Ok(bytes.to_vec()),
        Compression::Gzip => gunzip(bytes),
        Compression::Zlib => inflate_zlib(bytes),
    }
}

/// Gzip streams end with the uncompressed size (ISIZE, little-endian).
/// Exactly that many bytes are read so writer padding is never consumed.
fn gunzip(bytes: &[u8]) -> Result<Vec<u8>, TmxError> {
    let Some(size_field) = bytes.len().checked_sub(4).map(|start| &bytes[start..]) else {
        return Err(TmxError::CorruptData("gzip payload is truncated".into()));
    };
    let expected = u32::from_le_bytes([size_field[0], size_field[1], size_field[2], size_field[3]]);

    let mut out = Vec::new();
    GzDecoder::new(bytes)
        .take(u64::from(expected))
        .read_to_end(&mut out)
        .map_err(|err| TmxError::CorruptData(format!("gzip payload: {err}")))?;

    if out.len() != expected as usize {
        return Err(TmxError::CorruptData(format!(
            "gzip payload declares {expected} bytes but holds {}",
            out.len()
        )));
    }
    Ok(out)
}

/// Skip the two-byte zlib header and inflate the raw deflate stream to its end.
fn inflate_zlib(bytes: &[u8]) -> Result<Vec<u8>, TmxError> {
    let Some(stream) = bytes.get(2..) else {
        return Err(TmxError::CorruptData("zlib payload is truncated".into()));
    };

    let mut out = Vec::new();
    DeflateDecoder::new(stream)
        .read_to_end(&mut out)
        .map_err(|err| TmxError::CorruptData(format!("zlib payload: {err}")))?;
    Ok(out)
}

pub fn bytes_to_gids(bytes: &[u8]) -> Result<Vec<u32>, TmxError> {
    if bytes.len() % 4 != 0 {
        return Err(TmxError::CorruptData(format!(
            "tile data is {} bytes, not a multiple of 4",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|word| u32::from_le_bytes([word[0], word[1], word[2], word[3]]))
        .collect())
}

/// Full pipeline for one `<data>`/`<chunk>` payload.
pub fn decode_gids(
    payload: &str,
    encoding: Option<&str>,
    compression: Option<&str>,
) -> Result<Vec<u32>, TmxError> {
    check_encoding(encoding)?;
    let compression = Compression::from_attr(compression)?;
    let raw = decode_base64(payload)?;
    let bytes = decompress(&raw, compression)?;
    bytes_to_gids(&bytes)
}
