//! Schema-driven argument codec.
//!
//! The argument block is a u32 BE byte length followed by tagged values:
//! a 1-byte position tag, then the fixed-width Big Endian encoding of the
//! value, repeated. Optional parameters equal to their declared default are
//! omitted from the block; decoding stops as soon as the declared length has
//! been consumed, which is how absent trailing optionals are detected.

use bytes::{BufMut, BytesMut};
use tokio::io::AsyncRead;

use super::{FrameReader, MAX_SEGMENT_LEN};
use crate::error::{Result, WirecallError};
use crate::schema::{Args, Schema};

/// Append the length-prefixed argument block for `args` to `buf`.
///
/// Parameters are emitted in schema (position) order. A required parameter
/// missing from `args` is a `MissingArgument`; a value whose type disagrees
/// with the schema is a `TypeMismatch`.
pub fn encode(schema: &Schema, args: &Args, buf: &mut BytesMut) -> Result<()> {
    let mut block = BytesMut::new();

    for param in schema.params() {
        match args.value(param.name) {
            Some(value) => {
                if value.wire_type() != param.ty {
                    return Err(WirecallError::TypeMismatch(param.name));
                }
                if param.omit_if_default.as_ref() == Some(value) {
                    continue;
                }
                block.put_u8(param.position);
                value.encode_into(&mut block);
            }
            None => {
                if param.omit_if_default.is_none() {
                    return Err(WirecallError::MissingArgument(param.name));
                }
            }
        }
    }

    buf.put_u32(block.len() as u32);
    buf.extend_from_slice(&block);
    Ok(())
}

/// Decode an argument block into a named argument set.
///
/// Reads tag/value pairs until the declared block length is consumed. The
/// loop is general over any number of parameters and any mix of optional
/// ones; termination is "stop once the declared length is consumed".
pub async fn decode<R: AsyncRead + Unpin>(
    reader: &mut FrameReader<R>,
    schema: &Schema,
) -> Result<Args> {
    let declared = reader.read_u32().await?;
    if declared > MAX_SEGMENT_LEN {
        return Err(WirecallError::MalformedFrame(format!(
            "argument block length {} exceeds maximum {}",
            declared, MAX_SEGMENT_LEN
        )));
    }
    let declared = declared as usize;

    let mut args = Args::new();
    let mut have = 0;

    while have < declared {
        let position = reader.read_u8().await?;
        have += 1;

        let param = schema
            .by_position(position)
            .ok_or(WirecallError::UnknownArgumentPosition(position))?;

        if have + param.ty.size() > declared {
            return Err(WirecallError::MalformedFrame(format!(
                "argument at position {} overruns declared block length {}",
                position, declared
            )));
        }

        if args.contains(param.name) {
            return Err(WirecallError::MalformedFrame(format!(
                "repeated argument position {}",
                position
            )));
        }

        let bytes = reader.read_exact(param.ty.size()).await?;
        have += param.ty.size();
        args.insert(param.name, param.ty.decode(bytes));
    }

    // The frame must carry every parameter the schema marks required.
    for param in schema.params() {
        if param.omit_if_default.is_none() && !args.contains(param.name) {
            return Err(WirecallError::MalformedFrame(format!(
                "missing required argument {}",
                param.name
            )));
        }
    }

    Ok(args)
}
