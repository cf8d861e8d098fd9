//! Wire protocol: framing constants and codecs.
//!
//! All multi-byte integers are Big Endian. A call frame is:
//!
//! ```text
//! ┌──────────┬────────────┬──────────┬────────────┐
//! │ NameLen  │ NameBytes  │ ArgsLen  │ ArgsBlock  │
//! │ u32 BE   │ utf8       │ u32 BE   │ (Pos Value)*│
//! └──────────┴────────────┴──────────┴────────────┘
//! ```
//!
//! and a result frame is a 1-byte tag followed by either an f32 BE value
//! (success) or a length-prefixed UTF-8 message (fault).

pub mod args;
pub mod method;
pub mod reader;
pub mod result;

pub use reader::FrameReader;
pub use result::ReturnValue;

/// Result-frame tag for a successful call.
pub const SUCCESS_TAG: u8 = 1;

/// Result-frame tag for an application fault.
pub const FAULT_TAG: u8 = 2;

/// Maximum accepted value for any length-prefixed field (1 MiB).
///
/// A u32 length straight off the wire is an allocation hazard; anything
/// larger than this is treated as a malformed frame.
pub const MAX_SEGMENT_LEN: u32 = 1 << 20;
