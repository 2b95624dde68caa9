//! Opaque values and the side encoder that serializes them.
//!
//! Any `serde::Serialize` type is [`Reflected`]. The human encoder does not
//! render such values itself; it asks a [`ReflectedEncoder`] to write them
//! into a side buffer and splices the result into the record. The default
//! side encoder is [`JsonReflectedEncoder`].

use std::fmt;
use std::io;
use std::sync::Arc;

use pool::Buffer;
use serde::Serialize;

use crate::error::EncodeError;

/// A value rendered through the configured [`ReflectedEncoder`].
pub trait Reflected: Send + Sync {
    /// Writes the value to `out` as compact JSON, fields in declaration order.
    fn write_json(&self, out: &mut dyn io::Write) -> Result<(), serde_json::Error>;

    /// Converts the value into a JSON document tree.
    fn to_json(&self) -> Result<serde_json::Value, serde_json::Error>;
}

impl<T> Reflected for T
where
    T: Serialize + Send + Sync,
{
    fn write_json(&self, out: &mut dyn io::Write) -> Result<(), serde_json::Error> {
        serde_json::to_writer(out, self)
    }

    fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl fmt::Debug for dyn Reflected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_json() {
            Ok(value) => write!(f, "Reflected({value})"),
            Err(_) => f.write_str("Reflected(<unserializable>)"),
        }
    }
}

/// Serializes opaque values into a buffer.
///
/// One instance is created lazily per encoder state and reused for every
/// opaque value that state renders. Output may end with a single newline;
/// the caller strips it.
pub trait ReflectedEncoder: Send + Sync {
    /// Writes `value` into `out`.
    fn encode(&mut self, out: &mut Buffer, value: &dyn Reflected) -> Result<(), EncodeError>;
}

/// Builds a fresh [`ReflectedEncoder`].
pub type ReflectedEncoderFactory = Arc<dyn Fn() -> Box<dyn ReflectedEncoder> + Send + Sync>;

/// Compact single-line JSON, terminated by a newline.
///
/// Like every `serde_json` writer it leaves `<`, `>` and `&` unescaped.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonReflectedEncoder;

impl ReflectedEncoder for JsonReflectedEncoder {
    fn encode(&mut self, out: &mut Buffer, value: &dyn Reflected) -> Result<(), EncodeError> {
        value.write_json(out)?;
        out.append_byte(b'\n');
        Ok(())
    }
}

/// Returns the factory used when no side encoder is configured.
#[must_use]
pub fn default_reflected_encoder() -> ReflectedEncoderFactory {
    Arc::new(|| -> Box<dyn ReflectedEncoder> { Box::new(JsonReflectedEncoder) })
}
