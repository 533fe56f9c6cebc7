//! Object codec: serialize → deflate → base64, plus SHA-256 content hashing
//!
//! A blob is the raw deflate stream of the CBOR encoding of a value, with no
//! header of its own. A transport string is the padded standard base64 of a
//! blob. Every composite operation either returns the full result or an
//! error; no stage output escapes a failed call.

use crate::error::{CodecError, CodecResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::write::DeflateEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::Write;
use tracing::trace;

/// Smallest output buffer handed to the inflater.
const MIN_INFLATE_BUFFER: usize = 256;

//==============================================================================
// Stages
//==============================================================================

/// Encode `value` as self-describing CBOR.
///
/// Every field is written, including empty strings, zeros and `false`, so a
/// decode never has to invent a default.
pub fn serialize<T: Serialize + ?Sized>(value: &T) -> CodecResult<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf)
        .map_err(|e| CodecError::Serialization(e.to_string()))?;
    trace!(bytes = buf.len(), "serialized value");
    Ok(buf)
}

/// Decode a value previously produced by [`serialize`].
pub fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> CodecResult<T> {
    ciborium::from_reader(bytes).map_err(|e| CodecError::Deserialization(e.to_string()))
}

/// Raw deflate at the fastest level.
pub fn compress(bytes: &[u8]) -> CodecResult<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(
        Vec::with_capacity(bytes.len() / 2 + 16),
        Compression::fast(),
    );
    encoder
        .write_all(bytes)
        .map_err(|e| CodecError::Compression(e.to_string()))?;
    let compressed = encoder
        .finish()
        .map_err(|e| CodecError::Compression(e.to_string()))?;
    trace!(input = bytes.len(), output = compressed.len(), "deflated");
    Ok(compressed)
}

/// Inverse of [`compress`].
///
/// The stream must reach its final block; a stream that runs out of input
/// before that is reported as truncated instead of yielding partial output.
/// Bytes left over after the final block are rejected as well.
pub fn decompress(bytes: &[u8]) -> CodecResult<Vec<u8>> {
    let mut inflater = Decompress::new(false);
    let mut out = Vec::with_capacity(bytes.len().saturating_mul(3).max(MIN_INFLATE_BUFFER));

    loop {
        let in_before = inflater.total_in();
        let out_before = inflater.total_out();
        let consumed = usize::try_from(in_before).unwrap_or(bytes.len()).min(bytes.len());

        let status = inflater
            .decompress_vec(&bytes[consumed..], &mut out, FlushDecompress::None)
            .map_err(|e| CodecError::Decompression(e.to_string()))?;

        if status == Status::StreamEnd {
            if inflater.total_in() < bytes.len() as u64 {
                return Err(CodecError::Decompression(
                    "trailing data after deflate stream".to_string(),
                ));
            }
            break;
        }
        if out.len() == out.capacity() {
            out.reserve(out.capacity().max(MIN_INFLATE_BUFFER));
            continue;
        }

        let stalled = inflater.total_in() == in_before && inflater.total_out() == out_before;
        let exhausted = inflater.total_in() >= bytes.len() as u64;
        if stalled || exhausted {
            return Err(CodecError::Decompression("truncated deflate stream".to_string()));
        }
    }

    trace!(input = bytes.len(), output = out.len(), "inflated");
    Ok(out)
}

/// Standard base64 with padding.
pub fn text_encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Inverse of [`text_encode`]; rejects foreign characters and non-canonical padding.
pub fn text_decode(text: &str) -> CodecResult<Vec<u8>> {
    STANDARD
        .decode(text)
        .map_err(|e| CodecError::Encoding(e.to_string()))
}

/// Lowercase hex SHA-256 of the UTF-8 bytes of `text`.
pub fn hash(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

//==============================================================================
// Composite operations
//==============================================================================

/// `compress(serialize(value))`
pub fn compress_object<T: Serialize + ?Sized>(value: &T) -> CodecResult<Vec<u8>> {
    compress(&serialize(value)?)
}

/// `deserialize(decompress(blob))`
pub fn decompress_object<T: DeserializeOwned>(blob: &[u8]) -> CodecResult<T> {
    deserialize(&decompress(blob)?)
}

/// `text_encode(compress(serialize(value)))`
pub fn compress_object_to_text<T: Serialize + ?Sized>(value: &T) -> CodecResult<String> {
    Ok(text_encode(&compress_object(value)?))
}

/// `deserialize(decompress(text_decode(text)))`
pub fn decompress_object_from_text<T: DeserializeOwned>(text: &str) -> CodecResult<T> {
    decompress_object(&text_decode(text)?)
}

/// Deflate raw bytes (e.g. a rendered workbook file) into a transport string.
pub fn compress_bytes_to_text(bytes: &[u8]) -> CodecResult<String> {
    Ok(text_encode(&compress(bytes)?))
}

/// Inverse of [`compress_bytes_to_text`].
pub fn decompress_text_to_bytes(text: &str) -> CodecResult<Vec<u8>> {
    decompress(&text_decode(text)?)
}
