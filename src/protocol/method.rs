//! Method-name codec.
//!
//! Every call frame starts with the target procedure's name: a u32 BE byte
//! length followed by that many bytes of UTF-8.

use bytes::{BufMut, BytesMut};
use tokio::io::AsyncRead;

use super::{FrameReader, MAX_SEGMENT_LEN};
use crate::error::{Result, WirecallError};

/// Append the method-name block to `buf`.
pub fn encode(name: &str, buf: &mut BytesMut) {
    buf.put_u32(name.len() as u32);
    buf.put_slice(name.as_bytes());
}

/// Decode a method name from the stream.
///
/// Truncation mid-name surfaces as `ConnectionClosed` from the reader;
/// an oversized length or invalid UTF-8 is a `MalformedFrame`.
pub async fn decode<R: AsyncRead + Unpin>(reader: &mut FrameReader<R>) -> Result<String> {
    let len = reader.read_u32().await?;
    if len > MAX_SEGMENT_LEN {
        return Err(WirecallError::MalformedFrame(format!(
            "method name length {} exceeds maximum {}",
            len, MAX_SEGMENT_LEN
        )));
    }

    let bytes = reader.read_exact(len as usize).await?;
    String::from_utf8(bytes.to_vec())
        .map_err(|_| WirecallError::MalformedFrame("method name is not valid UTF-8".to_string()))
}
