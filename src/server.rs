//! RPC server: bind, accept loop, one dispatcher task per connection.
//!
//! [`ServerBuilder`] provides a fluent API for registering procedures, and
//! [`Server`] owns the listening socket's lifecycle: bind (with address
//! reuse) → accept loop → per-connection spawn. Connection tasks are
//! spawned unbounded; a stalled peer occupies only its own task.
//!
//! # Example
//!
//! ```ignore
//! use wirecall::{Args, ParamSpec, Schema, Server, Value, WireType, WirecallError};
//!
//! let server = Server::builder()
//!     .procedure(
//!         "divide",
//!         Schema::new(vec![
//!             ParamSpec::required(1, "num1", WireType::I32),
//!             ParamSpec::optional(2, "num2", Value::I32(1)),
//!         ]),
//!         |args: Args| async move {
//!             let num1 = args.i32("num1")?;
//!             let num2 = args.i32_or("num2", 1);
//!             if num2 == 0 {
//!                 return Err(WirecallError::invalid_operation());
//!             }
//!             Ok(num1 as f32 / num2 as f32)
//!         },
//!     )
//!     .bind("127.0.0.1:8000".parse()?)
//!     .await?;
//!
//! server.serve().await?;
//! ```

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpSocket};

use crate::dispatcher::Dispatcher;
use crate::error::Result;
use crate::registry::{HandlerResult, ProcedureRegistry};
use crate::schema::{Args, Schema};

/// Listen backlog for the accepting socket.
const LISTEN_BACKLOG: u32 = 128;

/// Builder for configuring and binding a [`Server`].
#[derive(Default)]
pub struct ServerBuilder {
    registry: ProcedureRegistry,
}

impl ServerBuilder {
    /// Create a new server builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a procedure with its parameter schema and handler.
    pub fn procedure<F, Fut>(mut self, name: &str, schema: Schema, handler: F) -> Self
    where
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.registry.register(name, schema, handler);
        self
    }

    /// Bind the listening socket with SO_REUSEADDR and build the server.
    ///
    /// The registry is frozen here; no procedure can be added to a running
    /// server.
    pub async fn bind(self, addr: SocketAddr) -> Result<Server> {
        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;
        let listener = socket.listen(LISTEN_BACKLOG)?;

        tracing::debug!("listening on {}", listener.local_addr()?);

        Ok(Server {
            listener,
            registry: Arc::new(self.registry),
        })
    }
}

/// A bound RPC server.
pub struct Server {
    listener: TcpListener,
    registry: Arc<ProcedureRegistry>,
}

impl Server {
    /// Create a new server builder.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Address the server is listening on.
    ///
    /// Useful when binding port 0 and needing the assigned port.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Run the accept loop, spawning a dispatcher per connection.
    ///
    /// A failing connection only ends its own task; the loop keeps
    /// accepting until the listener itself errors.
    pub async fn serve(self) -> Result<()> {
        loop {
            let (stream, addr) = self.listener.accept().await?;
            tracing::debug!("accepted connection from {}", addr);

            let dispatcher = Dispatcher::new(self.registry.clone());
            tokio::spawn(async move {
                match dispatcher.run(stream).await {
                    Ok(()) => tracing::debug!("connection from {} closed", addr),
                    Err(e) => tracing::warn!("connection from {} failed: {}", addr, e),
                }
            });
        }
    }
}
