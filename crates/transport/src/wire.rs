// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Wire format for the plugin RPC transport.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload (spec §4.E).

use serde::{de::DeserializeOwned, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::TransportError;

/// Frames larger than this are rejected outright rather than trusted off a
/// socket — a malformed or hostile length prefix should not drive an
/// unbounded allocation.
pub const MAX_FRAME_BYTES: usize = 64 * 1024 * 1024;

/// Serializes `value` to its raw JSON bytes (no length prefix).
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, TransportError> {
    Ok(serde_json::to_vec(value)?)
}

/// Deserializes raw JSON bytes back into `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, TransportError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Writes `payload` prefixed with its big-endian u32 length.
pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    payload: &[u8],
) -> Result<(), TransportError> {
    if payload.len() > MAX_FRAME_BYTES {
        return Err(TransportError::FrameTooLarge { len: payload.len(), max: MAX_FRAME_BYTES });
    }
    let len = payload.len() as u32;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads one length-prefixed message, rejecting frames over
/// [`MAX_FRAME_BYTES`] before allocating the buffer.
pub async fn read_message<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, TransportError> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await?;
    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_FRAME_BYTES {
        return Err(TransportError::FrameTooLarge { len, max: MAX_FRAME_BYTES });
    }
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(payload)
}

/// Writes a value as one length-prefixed JSON message.
pub async fn write_json<W: AsyncWrite + Unpin, T: Serialize>(
    writer: &mut W,
    value: &T,
) -> Result<(), TransportError> {
    write_message(writer, &encode(value)?).await
}

/// Reads one length-prefixed message and decodes it as JSON.
pub async fn read_json<R: AsyncRead + Unpin, T: DeserializeOwned>(
    reader: &mut R,
) -> Result<T, TransportError> {
    decode(&read_message(reader).await?)
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
