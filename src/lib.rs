//! # wirecall
//!
//! Minimal RPC over TCP with a compact big-endian binary wire format.
//!
//! A client issues a named call with typed arguments; the server decodes
//! the call, dispatches it to a registered procedure, and returns either a
//! result value or a structured fault.
//!
//! ## Architecture
//!
//! - **Wire protocol** ([`protocol`]): length-prefixed method name, tagged
//!   argument block, tagged success/fault result frame.
//! - **Schemas** ([`schema`]): declarative per-procedure parameter tables
//!   driving argument encode/decode.
//! - **Client** ([`client`]): [`Channel`] + [`ClientStub`], one
//!   request/response round trip per invoke.
//! - **Server** ([`server`], [`dispatcher`]): accept loop spawning one
//!   sequential dispatch task per connection over a shared, read-only
//!   [`ProcedureRegistry`].
//!
//! ## Example
//!
//! ```ignore
//! use wirecall::{Args, Channel, ClientStub, ParamSpec, Schema, Server, Value, WireType};
//!
//! let server = Server::builder()
//!     .procedure("divide", divide_schema(), divide)
//!     .bind("127.0.0.1:8000".parse()?)
//!     .await?;
//! tokio::spawn(server.serve());
//!
//! let mut stub = ClientStub::builder()
//!     .schema("divide", divide_schema())
//!     .connect(&Channel::new("127.0.0.1", 8000))
//!     .await?;
//! let value = stub
//!     .invoke("divide", &Args::new().with_i32("num1", 200).with_i32("num2", 100))
//!     .await?;
//! assert_eq!(value, 2.0);
//! ```

pub mod client;
pub mod dispatcher;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod schema;
pub mod server;

pub use client::{Channel, ClientStub, ClientStubBuilder};
pub use dispatcher::Dispatcher;
pub use error::{Result, WirecallError, DEFAULT_FAULT_MESSAGE};
pub use protocol::{FrameReader, ReturnValue};
pub use registry::{Handler, HandlerResult, ProcedureRegistry};
pub use schema::{Args, ParamSpec, Schema, Value, WireType};
pub use server::{Server, ServerBuilder};
