//! Result-frame codec.
//!
//! The outcome of a call is a tagged variant, materialized here and nowhere
//! else: tag `1` carries an f32 BE success value, tag `2` a length-prefixed
//! UTF-8 fault message. Layers above treat a decoded fault as an error to
//! raise, never as a normal return value.

use bytes::{Buf, BufMut, BytesMut};
use tokio::io::AsyncRead;

use super::{FrameReader, FAULT_TAG, MAX_SEGMENT_LEN, SUCCESS_TAG};
use crate::error::{Result, WirecallError, DEFAULT_FAULT_MESSAGE};

/// Decoded outcome of one call.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnValue {
    /// Successful call result.
    Value(f32),
    /// Application fault message.
    Fault(String),
}

/// Append the result frame for `value` to `buf`.
///
/// A fault with an empty message is sent with [`DEFAULT_FAULT_MESSAGE`]
/// instead; the wire never carries an empty fault.
pub fn encode(value: &ReturnValue, buf: &mut BytesMut) {
    match value {
        ReturnValue::Value(v) => {
            buf.put_u8(SUCCESS_TAG);
            buf.put_f32(*v);
        }
        ReturnValue::Fault(message) => {
            let message = if message.is_empty() {
                DEFAULT_FAULT_MESSAGE
            } else {
                message.as_str()
            };
            buf.put_u8(FAULT_TAG);
            buf.put_u32(message.len() as u32);
            buf.put_slice(message.as_bytes());
        }
    }
}

/// Decode a result frame from the stream.
pub async fn decode<R: AsyncRead + Unpin>(reader: &mut FrameReader<R>) -> Result<ReturnValue> {
    let tag = reader.read_u8().await?;
    match tag {
        SUCCESS_TAG => {
            let mut bytes = reader.read_exact(4).await?;
            Ok(ReturnValue::Value(bytes.get_f32()))
        }
        FAULT_TAG => {
            let len = reader.read_u32().await?;
            if len > MAX_SEGMENT_LEN {
                return Err(WirecallError::MalformedFrame(format!(
                    "fault message length {} exceeds maximum {}",
                    len, MAX_SEGMENT_LEN
                )));
            }
            let bytes = reader.read_exact(len as usize).await?;
            let message = String::from_utf8(bytes.to_vec()).map_err(|_| {
                WirecallError::MalformedFrame("fault message is not valid UTF-8".to_string())
            })?;
            Ok(ReturnValue::Fault(message))
        }
        other => Err(WirecallError::MalformedFrame(format!(
            "unknown result tag {}",
            other
        ))),
    }
}
