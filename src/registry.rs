//! Procedure registry for dispatching calls by method name.
//!
//! The registry maps method names to their parameter schema and handler.
//! It is built before the server starts and never mutated afterwards, so
//! connections share it through an `Arc` without locking.
//!
//! # Example
//!
//! ```
//! use wirecall::{Args, ParamSpec, ProcedureRegistry, Schema, WireType, WirecallError};
//!
//! let mut registry = ProcedureRegistry::new();
//! registry.register(
//!     "divide",
//!     Schema::new(vec![ParamSpec::required(1, "num1", WireType::I32)]),
//!     |args: Args| async move {
//!         let num1 = args.i32("num1")?;
//!         Ok(num1 as f32)
//!     },
//! );
//!
//! assert!(registry.lookup("divide").is_some());
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use crate::error::Result;
use crate::schema::{Args, Schema};

/// Result type for handler functions.
pub type HandlerResult = Result<f32>;

/// Boxed future for handler results.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait for registered procedure handlers.
///
/// Handlers signal domain failures by returning
/// [`WirecallError::Application`](crate::WirecallError::Application); any
/// other error is treated as fatal for the calling connection.
pub trait Handler: Send + Sync + 'static {
    /// Invoke the procedure with decoded named arguments.
    fn call(&self, args: Args) -> BoxFuture<'static, HandlerResult>;
}

/// Adapter implementing [`Handler`] for async closures.
struct FnHandler<F> {
    handler: F,
}

impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, args: Args) -> BoxFuture<'static, HandlerResult> {
        Box::pin((self.handler)(args))
    }
}

/// Entry for a registered procedure.
struct ProcedureEntry {
    schema: Schema,
    handler: Box<dyn Handler>,
}

/// Registry mapping method names to schemas and handlers.
#[derive(Default)]
pub struct ProcedureRegistry {
    procedures: HashMap<String, ProcedureEntry>,
}

impl ProcedureRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a procedure under `name`.
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register<F, Fut>(&mut self, name: &str, schema: Schema, handler: F)
    where
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.procedures.insert(
            name.to_string(),
            ProcedureEntry {
                schema,
                handler: Box::new(FnHandler { handler }),
            },
        );
    }

    /// Look up the schema and handler for a method name.
    pub fn lookup(&self, name: &str) -> Option<(&Schema, &dyn Handler)> {
        self.procedures
            .get(name)
            .map(|entry| (&entry.schema, entry.handler.as_ref()))
    }

    /// Registered method names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.procedures.keys().map(|s| s.as_str())
    }

    /// Number of registered procedures.
    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    /// Whether no procedures are registered.
    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }
}
