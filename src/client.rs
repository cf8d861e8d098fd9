//! Client-side connection channel and call stub.
//!
//! [`Channel`] turns a host/port pair into a connected byte stream;
//! [`ClientStub`] owns one connection and a set of client-side schemas and
//! performs exactly one request/response round trip per [`ClientStub::invoke`].
//!
//! # Example
//!
//! ```ignore
//! use wirecall::{Args, Channel, ClientStub, ParamSpec, Schema, Value, WireType};
//!
//! let channel = Channel::new("127.0.0.1", 8000);
//! let mut stub = ClientStub::builder()
//!     .schema(
//!         "divide",
//!         Schema::new(vec![
//!             ParamSpec::required(1, "num1", WireType::I32),
//!             ParamSpec::optional(2, "num2", Value::I32(1)),
//!         ]),
//!     )
//!     .connect(&channel)
//!     .await?;
//!
//! let value = stub
//!     .invoke("divide", &Args::new().with_i32("num1", 200).with_i32("num2", 100))
//!     .await?;
//! assert_eq!(value, 2.0);
//! ```

use std::collections::HashMap;

use bytes::BytesMut;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use crate::error::{Result, WirecallError};
use crate::protocol::{args, method, result, FrameReader, ReturnValue};
use crate::schema::{Args, Schema};

/// Client-side transport endpoint: a host/port pair to connect to.
#[derive(Debug, Clone)]
pub struct Channel {
    host: String,
    port: u16,
}

impl Channel {
    /// Create a channel for the given server address.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Open a new connection to the server.
    pub async fn connect(&self) -> Result<TcpStream> {
        let stream = TcpStream::connect((self.host.as_str(), self.port)).await?;
        tracing::debug!("connected to {}:{}", self.host, self.port);
        Ok(stream)
    }
}

/// Builder for configuring the schemas a [`ClientStub`] can call.
#[derive(Default)]
pub struct ClientStubBuilder {
    schemas: HashMap<String, Schema>,
}

impl ClientStubBuilder {
    /// Declare a procedure this stub may invoke.
    ///
    /// The schema must match the one registered on the server; the wire
    /// format carries no schema information of its own.
    pub fn schema(mut self, name: &str, schema: Schema) -> Self {
        self.schemas.insert(name.to_string(), schema);
        self
    }

    /// Connect to the server and build the stub.
    pub async fn connect(self, channel: &Channel) -> Result<ClientStub> {
        let stream = channel.connect().await?;
        let (read_half, write_half) = stream.into_split();
        Ok(ClientStub {
            schemas: self.schemas,
            reader: FrameReader::new(read_half),
            writer: write_half,
        })
    }
}

/// Client-side adapter translating local calls into wire frames.
///
/// Owns one connection for its lifetime. `invoke` takes `&mut self`, so a
/// stub cannot be shared across concurrent callers without external
/// serialization; there is no pipelining.
pub struct ClientStub {
    schemas: HashMap<String, Schema>,
    reader: FrameReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl ClientStub {
    /// Create a new stub builder.
    pub fn builder() -> ClientStubBuilder {
        ClientStubBuilder::default()
    }

    /// Invoke a remote procedure and wait for its result.
    ///
    /// Marshals `call_args` per the declared schema, writes the full call
    /// frame, then decodes the result frame. A success value is returned
    /// directly; a fault is surfaced as
    /// [`WirecallError::Application`] carrying the decoded message.
    pub async fn invoke(&mut self, name: &str, call_args: &Args) -> Result<f32> {
        let schema = self
            .schemas
            .get(name)
            .ok_or_else(|| WirecallError::UnknownMethod(name.to_string()))?;

        let mut frame = BytesMut::new();
        method::encode(name, &mut frame);
        args::encode(schema, call_args, &mut frame)?;

        // write_all either delivers every byte or fails; a short write
        // never passes silently.
        self.writer.write_all(&frame).await?;
        self.writer.flush().await?;

        match result::decode(&mut self.reader).await? {
            ReturnValue::Value(v) => Ok(v),
            ReturnValue::Fault(message) => Err(WirecallError::Application(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_fields() {
        let channel = Channel::new("127.0.0.1", 8000);
        assert_eq!(channel.host, "127.0.0.1");
        assert_eq!(channel.port, 8000);
    }

    #[test]
    fn test_builder_collects_schemas() {
        use crate::schema::{ParamSpec, WireType};

        let builder = ClientStub::builder()
            .schema(
                "divide",
                Schema::new(vec![ParamSpec::required(1, "num1", WireType::I32)]),
            )
            .schema(
                "add",
                Schema::new(vec![ParamSpec::required(1, "lhs", WireType::I32)]),
            );

        assert_eq!(builder.schemas.len(), 2);
        assert!(builder.schemas.contains_key("divide"));
        assert!(builder.schemas.contains_key("add"));
    }
}
