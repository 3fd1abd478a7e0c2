//! The blueprint string format: a version character followed by base64 of
//! zlib-compressed JSON.

use crate::schema::{BlueprintString, RootData};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use std::io::{Read, Write};
use tracing::debug;

/// The only version character the game has ever written.
pub const VERSION_BYTE: char = '0';

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid blueprint string: too short")]
    TooShort,
    #[error("unsupported blueprint version: {0}")]
    UnsupportedVersion(char),
    #[error("invalid blueprint string: bad base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("invalid blueprint: not valid zlib data: {0}")]
    Inflate(#[source] std::io::Error),
    #[error("invalid blueprint: malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid blueprint: must contain 'blueprint' or 'blueprint_book'")]
    MissingRoot,
}

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("failed to serialize blueprint: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to compress blueprint: {0}")]
    Deflate(#[from] std::io::Error),
}

/// Decode a blueprint string.
pub fn decode(input: &str) -> Result<BlueprintString, DecodeError> {
    let trimmed = input.trim();
    let mut chars = trimmed.chars();
    let (Some(version), Some(_)) = (chars.next(), chars.clone().next()) else {
        return Err(DecodeError::TooShort);
    };
    if version != VERSION_BYTE {
        return Err(DecodeError::UnsupportedVersion(version));
    }

    let payload: String = chars.filter(|c| !c.is_ascii_whitespace()).collect();
    let compressed = STANDARD.decode(payload)?;

    let mut json = Vec::new();
    ZlibDecoder::new(compressed.as_slice())
        .read_to_end(&mut json)
        .map_err(DecodeError::Inflate)?;
    debug!(
        compressed = compressed.len(),
        inflated = json.len(),
        "inflated blueprint payload"
    );

    let root: RootData = serde_json::from_slice(&json)?;
    match (root.blueprint, root.blueprint_book) {
        (Some(bp), _) => Ok(BlueprintString::Blueprint(bp)),
        (None, Some(book)) => Ok(BlueprintString::Book(book)),
        (None, None) => Err(DecodeError::MissingRoot),
    }
}

/// Encode a blueprint string. Inverse of [`decode`].
pub fn encode(root: &BlueprintString) -> Result<String, EncodeError> {
    let json = serde_json::to_vec(root)?;
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&json)?;
    let compressed = encoder.finish()?;

    let mut out = String::with_capacity(1 + compressed.len() * 4 / 3 + 4);
    out.push(VERSION_BYTE);
    STANDARD.encode_string(compressed, &mut out);
    Ok(out)
}
