//! Error types for wirecall.

use thiserror::Error;

/// Fallback message for an application fault raised without one.
pub const DEFAULT_FAULT_MESSAGE: &str = "invalid operation";

/// Main error type for all wirecall operations.
#[derive(Debug, Error)]
pub enum WirecallError {
    /// I/O error on the underlying socket.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Peer closed the stream before a full frame was read.
    ///
    /// Between frames this is the normal end of a connection; mid-frame it
    /// means the peer went away with a call in flight.
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// Length or tag fields inconsistent with the declared frame layout,
    /// or bytes that fail UTF-8 validation. Fatal for the connection.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// Decoded method name has no registry entry.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// Argument position tag not present in the procedure's schema.
    #[error("unknown argument position: {0}")]
    UnknownArgumentPosition(u8),

    /// A required parameter was not supplied when encoding a call.
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    /// A supplied argument value does not match the schema's wire type.
    #[error("argument type mismatch for {0}")]
    TypeMismatch(&'static str),

    /// Handler-signaled domain failure. Round-trips on the wire as a fault
    /// frame; never aborts the connection.
    #[error("application error: {0}")]
    Application(String),
}

impl WirecallError {
    /// Build an application fault with the given message.
    ///
    /// An empty message falls back to [`DEFAULT_FAULT_MESSAGE`].
    pub fn application(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            Self::Application(DEFAULT_FAULT_MESSAGE.to_string())
        } else {
            Self::Application(message)
        }
    }

    /// Build an application fault with the default message.
    pub fn invalid_operation() -> Self {
        Self::Application(DEFAULT_FAULT_MESSAGE.to_string())
    }
}

/// Result type alias using WirecallError.
pub type Result<T> = std::result::Result<T, WirecallError>;
