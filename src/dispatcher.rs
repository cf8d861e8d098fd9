//! Per-connection dispatch loop.
//!
//! Each accepted connection gets its own [`Dispatcher`] running the
//! decode→invoke→encode state machine:
//!
//! ```text
//! AwaitingMethodName → AwaitingArguments → Invoking → SendingResult ─┐
//!         ▲                                                          │
//!         └──────────────────────────────────────────────────────────┘
//! ```
//!
//! One call is processed end-to-end before the next method name is read;
//! there is no intra-connection concurrency. The loop ends when the peer
//! closes between frames (normal) or on a fatal decode/protocol error.

use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::error::{Result, WirecallError};
use crate::protocol::{args, method, result, FrameReader, ReturnValue};
use crate::registry::ProcedureRegistry;

/// Server-side loop serving one connection.
pub struct Dispatcher {
    registry: Arc<ProcedureRegistry>,
}

impl Dispatcher {
    /// Create a dispatcher over the shared procedure registry.
    pub fn new(registry: Arc<ProcedureRegistry>) -> Self {
        Self { registry }
    }

    /// Serve calls on `stream` until the peer disconnects or a fatal
    /// protocol error occurs.
    ///
    /// Application faults returned by handlers are encoded as fault frames
    /// and the loop continues; every other error terminates the connection.
    pub async fn run(self, stream: TcpStream) -> Result<()> {
        let (read_half, mut writer) = stream.into_split();
        let mut reader = FrameReader::new(read_half);

        loop {
            // AwaitingMethodName: a close here is the normal end of the
            // connection, not an error.
            let name = match method::decode(&mut reader).await {
                Ok(name) => name,
                Err(WirecallError::ConnectionClosed) => {
                    tracing::debug!("peer closed connection");
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            // AwaitingArguments
            let (schema, handler) = self
                .registry
                .lookup(&name)
                .ok_or_else(|| WirecallError::UnknownMethod(name.clone()))?;
            let call_args = args::decode(&mut reader, schema).await?;

            // Invoking: only declared application faults are recoverable.
            let outcome = match handler.call(call_args).await {
                Ok(value) => ReturnValue::Value(value),
                Err(WirecallError::Application(message)) => {
                    tracing::debug!(method = %name, %message, "handler raised application fault");
                    ReturnValue::Fault(message)
                }
                Err(e) => return Err(e),
            };

            // SendingResult
            let mut frame = BytesMut::new();
            result::encode(&outcome, &mut frame);
            writer.write_all(&frame).await?;
            writer.flush().await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Args, ParamSpec, Schema, Value, WireType};
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    fn divide_registry() -> Arc<ProcedureRegistry> {
        let mut registry = ProcedureRegistry::new();
        registry.register(
            "divide",
            Schema::new(vec![
                ParamSpec::required(1, "num1", WireType::I32),
                ParamSpec::optional(2, "num2", Value::I32(1)),
            ]),
            |args: Args| async move {
                let num1 = args.i32("num1")?;
                let num2 = args.i32_or("num2", 1);
                if num2 == 0 {
                    return Err(WirecallError::invalid_operation());
                }
                Ok(num1 as f32 / num2 as f32)
            },
        );
        Arc::new(registry)
    }

    /// Connect a dispatcher-backed server socket to a raw client socket.
    async fn serve_one() -> (TcpStream, tokio::task::JoinHandle<Result<()>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = TcpStream::connect(addr).await.unwrap();
        let (server_side, _) = listener.accept().await.unwrap();

        let dispatcher = Dispatcher::new(divide_registry());
        let task = tokio::spawn(dispatcher.run(server_side));
        (client, task)
    }

    fn encode_call(name: &str, call_args: &Args, schema: &Schema) -> BytesMut {
        let mut frame = BytesMut::new();
        method::encode(name, &mut frame);
        args::encode(schema, call_args, &mut frame).unwrap();
        frame
    }

    #[tokio::test]
    async fn test_unknown_method_terminates_connection() {
        let (mut client, task) = serve_one().await;

        let mut frame = BytesMut::new();
        method::encode("multiply", &mut frame);
        client.write_all(&frame).await.unwrap();

        assert!(matches!(
            task.await.unwrap(),
            Err(WirecallError::UnknownMethod(name)) if name == "multiply"
        ));

        // Server closed its end; the client read hits EOF.
        let mut buf = [0u8; 1];
        assert_eq!(client.read(&mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_fault_keeps_connection_alive() {
        let (mut client, task) = serve_one().await;
        let schema = Schema::new(vec![
            ParamSpec::required(1, "num1", WireType::I32),
            ParamSpec::optional(2, "num2", Value::I32(1)),
        ]);

        // First call divides by zero and must come back as a fault frame.
        let frame = encode_call(
            "divide",
            &Args::new().with_i32("num1", 200).with_i32("num2", 0),
            &schema,
        );
        client.write_all(&frame).await.unwrap();

        let mut reader = FrameReader::new(&mut client);
        match result::decode(&mut reader).await.unwrap() {
            ReturnValue::Fault(m) => assert_eq!(m, "invalid operation"),
            other => panic!("expected fault, got {other:?}"),
        }

        // Second call on the same connection still succeeds.
        let frame = encode_call(
            "divide",
            &Args::new().with_i32("num1", 200).with_i32("num2", 100),
            &schema,
        );
        client.write_all(&frame).await.unwrap();

        let mut reader = FrameReader::new(&mut client);
        assert_eq!(
            result::decode(&mut reader).await.unwrap(),
            ReturnValue::Value(2.0)
        );

        drop(client);
        assert!(task.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_clean_close_between_frames() {
        let (client, task) = serve_one().await;
        drop(client);
        assert!(task.await.unwrap().is_ok());
    }
}
