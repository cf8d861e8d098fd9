//! Declarative per-procedure parameter schemas.
//!
//! A [`Schema`] is the table driving argument encode/decode for one
//! procedure: each wire position maps to a parameter name, a fixed-width
//! wire type, and an optional omit-when-default rule. New procedures and
//! parameters are added by declaring table rows, not by writing codec code.
//!
//! # Example
//!
//! ```
//! use wirecall::{Args, ParamSpec, Schema, Value, WireType};
//!
//! let schema = Schema::new(vec![
//!     ParamSpec::required(1, "num1", WireType::I32),
//!     ParamSpec::optional(2, "num2", Value::I32(1)),
//! ]);
//!
//! let args = Args::new().with_i32("num1", 200).with_i32("num2", 100);
//! assert_eq!(args.i32("num1").unwrap(), 200);
//! assert_eq!(args.i32_or("missing", 1), 1);
//! # let _ = schema;
//! ```

use std::collections::HashMap;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, WirecallError};

/// Fixed-width wire type of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    /// Signed 32-bit integer, Big Endian.
    I32,
    /// IEEE-754 single-precision float, Big Endian.
    F32,
}

impl WireType {
    /// Encoded size in bytes.
    pub fn size(self) -> usize {
        match self {
            WireType::I32 => 4,
            WireType::F32 => 4,
        }
    }

    /// Decode a value of this type from exactly `size()` bytes.
    pub(crate) fn decode(self, mut bytes: Bytes) -> Value {
        match self {
            WireType::I32 => Value::I32(bytes.get_i32()),
            WireType::F32 => Value::F32(bytes.get_f32()),
        }
    }
}

/// A primitive argument value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    I32(i32),
    F32(f32),
}

impl Value {
    /// The wire type this value encodes as.
    pub fn wire_type(&self) -> WireType {
        match self {
            Value::I32(_) => WireType::I32,
            Value::F32(_) => WireType::F32,
        }
    }

    /// Append the Big Endian encoding of this value to `buf`.
    pub(crate) fn encode_into(&self, buf: &mut BytesMut) {
        match self {
            Value::I32(v) => buf.put_i32(*v),
            Value::F32(v) => buf.put_f32(*v),
        }
    }
}

/// One row of a procedure's parameter table.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    /// Position tag on the wire (small positive integer).
    pub position: u8,
    /// Parameter name handlers look values up by.
    pub name: &'static str,
    /// Fixed-width wire type.
    pub ty: WireType,
    /// `Some(v)`: optional parameter, omitted on the wire when equal to `v`.
    /// `None`: required, always emitted.
    pub omit_if_default: Option<Value>,
}

impl ParamSpec {
    /// A required parameter, always present on the wire.
    pub fn required(position: u8, name: &'static str, ty: WireType) -> Self {
        Self {
            position,
            name,
            ty,
            omit_if_default: None,
        }
    }

    /// An optional parameter, omitted on the wire when equal to `default`.
    pub fn optional(position: u8, name: &'static str, default: Value) -> Self {
        Self {
            position,
            name,
            ty: default.wire_type(),
            omit_if_default: Some(default),
        }
    }
}

/// Ordered parameter table for one procedure.
#[derive(Debug, Clone)]
pub struct Schema {
    params: Vec<ParamSpec>,
}

impl Schema {
    /// Build a schema from parameter rows, ordered by wire position.
    ///
    /// # Panics
    ///
    /// Panics on duplicate positions or names. Schemas are declared at
    /// registration time, so a clash is a programming error.
    pub fn new(mut params: Vec<ParamSpec>) -> Self {
        params.sort_by_key(|p| p.position);
        for pair in params.windows(2) {
            assert_ne!(
                pair[0].position, pair[1].position,
                "duplicate parameter position {}",
                pair[0].position
            );
        }
        // Names can clash at non-adjacent positions, so they need their own
        // check rather than piggybacking on the sorted walk.
        let mut names = std::collections::HashSet::new();
        for param in &params {
            assert!(names.insert(param.name), "duplicate parameter name {}", param.name);
        }
        Self { params }
    }

    /// Parameter rows in position order.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Look up the row for a wire position tag.
    pub fn by_position(&self, position: u8) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.position == position)
    }
}

/// Named argument set for one call.
///
/// Built fluently on the client side and produced by argument decoding on
/// the server side. Optional parameters absent from the wire are simply not
/// present; handlers apply their own defaults via [`Args::i32_or`] /
/// [`Args::f32_or`].
#[derive(Debug, Clone, Default)]
pub struct Args {
    values: HashMap<&'static str, Value>,
}

impl Args {
    /// Create an empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an i32 argument.
    pub fn with_i32(mut self, name: &'static str, value: i32) -> Self {
        self.values.insert(name, Value::I32(value));
        self
    }

    /// Add an f32 argument.
    pub fn with_f32(mut self, name: &'static str, value: f32) -> Self {
        self.values.insert(name, Value::F32(value));
        self
    }

    pub(crate) fn insert(&mut self, name: &'static str, value: Value) {
        self.values.insert(name, value);
    }

    /// Raw value for a parameter name, if present.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether a value is present for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of arguments present.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Required i32 argument.
    ///
    /// Missing → `MissingArgument`; wrong type → `TypeMismatch`. For
    /// server-side handlers a miss is connection-fatal, which is the
    /// documented contract for a frame that disagrees with the schema.
    pub fn i32(&self, name: &'static str) -> Result<i32> {
        match self.values.get(name) {
            Some(Value::I32(v)) => Ok(*v),
            Some(_) => Err(WirecallError::TypeMismatch(name)),
            None => Err(WirecallError::MissingArgument(name)),
        }
    }

    /// Optional i32 argument with a handler-side default.
    pub fn i32_or(&self, name: &'static str, default: i32) -> i32 {
        match self.values.get(name) {
            Some(Value::I32(v)) => *v,
            _ => default,
        }
    }

    /// Required f32 argument.
    pub fn f32(&self, name: &'static str) -> Result<f32> {
        match self.values.get(name) {
            Some(Value::F32(v)) => Ok(*v),
            Some(_) => Err(WirecallError::TypeMismatch(name)),
            None => Err(WirecallError::MissingArgument(name)),
        }
    }

    /// Optional f32 argument with a handler-side default.
    pub fn f32_or(&self, name: &'static str, default: f32) -> f32 {
        match self.values.get(name) {
            Some(Value::F32(v)) => *v,
            _ => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn divide_schema() -> Schema {
        Schema::new(vec![
            ParamSpec::required(1, "num1", WireType::I32),
            ParamSpec::optional(2, "num2", Value::I32(1)),
        ])
    }

    #[test]
    fn test_schema_ordered_by_position() {
        let schema = Schema::new(vec![
            ParamSpec::optional(2, "b", Value::I32(0)),
            ParamSpec::required(1, "a", WireType::I32),
        ]);
        assert_eq!(schema.params()[0].name, "a");
        assert_eq!(schema.params()[1].name, "b");
    }

    #[test]
    fn test_by_position() {
        let schema = divide_schema();
        assert_eq!(schema.by_position(1).unwrap().name, "num1");
        assert_eq!(schema.by_position(2).unwrap().name, "num2");
        assert!(schema.by_position(3).is_none());
    }

    #[test]
    #[should_panic(expected = "duplicate parameter position")]
    fn test_duplicate_position_panics() {
        Schema::new(vec![
            ParamSpec::required(1, "a", WireType::I32),
            ParamSpec::required(1, "b", WireType::I32),
        ]);
    }

    #[test]
    #[should_panic(expected = "duplicate parameter name")]
    fn test_duplicate_name_at_non_adjacent_positions_panics() {
        Schema::new(vec![
            ParamSpec::required(1, "a", WireType::I32),
            ParamSpec::required(2, "b", WireType::I32),
            ParamSpec::required(3, "a", WireType::I32),
        ]);
    }

    #[test]
    fn test_wire_type_sizes() {
        assert_eq!(WireType::I32.size(), 4);
        assert_eq!(WireType::F32.size(), 4);
    }

    #[test]
    fn test_args_len_tracks_inserts() {
        let args = Args::new();
        assert!(args.is_empty());
        assert_eq!(args.len(), 0);

        let args = args.with_i32("num1", 200).with_f32("rate", 0.5);
        assert!(!args.is_empty());
        assert_eq!(args.len(), 2);

        // Re-inserting under the same name replaces, not grows.
        let args = args.with_i32("num1", 300);
        assert_eq!(args.len(), 2);
        assert_eq!(args.i32("num1").unwrap(), 300);
    }

    #[test]
    fn test_typed_getters() {
        let args = Args::new().with_i32("num1", 200).with_f32("rate", 0.5);

        assert_eq!(args.i32("num1").unwrap(), 200);
        assert_eq!(args.f32("rate").unwrap(), 0.5);
        assert_eq!(args.i32_or("num2", 1), 1);
        assert_eq!(args.f32_or("scale", 2.0), 2.0);

        assert!(matches!(
            args.i32("rate"),
            Err(WirecallError::TypeMismatch("rate"))
        ));
        assert!(matches!(
            args.i32("absent"),
            Err(WirecallError::MissingArgument("absent"))
        ));
    }
}
