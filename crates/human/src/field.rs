//! Typed key/value fields attached to log entries.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use time::{Duration, OffsetDateTime};

use crate::error::EncodeError;
use crate::marshal::{ArrayEncoder, ArrayMarshaler, ObjectEncoder, ObjectMarshaler};
use crate::reflect::Reflected;

/// Complex number with `f64` parts.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Complex128 {
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
}

impl Complex128 {
    /// Creates `re + im·i`.
    #[must_use]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

/// Complex number with `f32` parts.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Complex64 {
    /// Real part.
    pub re: f32,
    /// Imaginary part.
    pub im: f32,
}

impl Complex64 {
    /// Creates `re + im·i`.
    #[must_use]
    pub const fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }
}

/// The typed payload of a [`Field`].
#[derive(Clone)]
pub enum FieldValue {
    /// A boolean.
    Bool(bool),
    /// A signed integer of any width.
    Int(i64),
    /// An unsigned integer of any width.
    Uint(u64),
    /// A pointer-sized unsigned integer.
    Uintptr(usize),
    /// A single-precision float.
    F32(f32),
    /// A double-precision float.
    F64(f64),
    /// A complex number with `f32` parts.
    Complex64(Complex64),
    /// A complex number with `f64` parts.
    Complex128(Complex128),
    /// A signed duration.
    Duration(Duration),
    /// A timestamp with offset.
    Time(OffsetDateTime),
    /// UTF-8 text.
    Str(String),
    /// Arbitrary binary data.
    Binary(Vec<u8>),
    /// A byte string.
    ByteString(Vec<u8>),
    /// A value that marshals itself as an object.
    Object(Arc<dyn ObjectMarshaler + Send + Sync>),
    /// A value that marshals itself as an array.
    Array(Arc<dyn ArrayMarshaler + Send + Sync>),
    /// An opaque value; `None` when absent.
    Reflected(Option<Arc<dyn Reflected>>),
    /// Opens a namespace under the field's key.
    Namespace,
    /// Contributes nothing.
    Skip,
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Self::Uint(v) => f.debug_tuple("Uint").field(v).finish(),
            Self::Uintptr(v) => f.debug_tuple("Uintptr").field(v).finish(),
            Self::F32(v) => f.debug_tuple("F32").field(v).finish(),
            Self::F64(v) => f.debug_tuple("F64").field(v).finish(),
            Self::Complex64(v) => f.debug_tuple("Complex64").field(v).finish(),
            Self::Complex128(v) => f.debug_tuple("Complex128").field(v).finish(),
            Self::Duration(v) => f.debug_tuple("Duration").field(v).finish(),
            Self::Time(v) => f.debug_tuple("Time").field(v).finish(),
            Self::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Self::Binary(v) => f.debug_tuple("Binary").field(&v.len()).finish(),
            Self::ByteString(v) => f.debug_tuple("ByteString").field(&v.len()).finish(),
            Self::Object(_) => f.write_str("Object(..)"),
            Self::Array(_) => f.write_str("Array(..)"),
            Self::Reflected(v) => f.debug_tuple("Reflected").field(v).finish(),
            Self::Namespace => f.write_str("Namespace"),
            Self::Skip => f.write_str("Skip"),
        }
    }
}

macro_rules! field_value_from {
    ($($ty:ty => $variant:ident $(as $wide:ty)?),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value $(as $wide)?)
                }
            }
        )*
    };
}

field_value_from! {
    bool => Bool,
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int,
    isize => Int as i64,
    u8 => Uint as u64,
    u16 => Uint as u64,
    u32 => Uint as u64,
    u64 => Uint,
    usize => Uintptr,
    f32 => F32,
    f64 => F64,
    Complex64 => Complex64,
    Complex128 => Complex128,
    Duration => Duration,
    OffsetDateTime => Time,
    String => Str,
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

/// One key/value pair attached to a log entry.
///
/// Fields are cheap to clone: composite payloads are shared behind [`Arc`].
///
/// ```
/// use human::{Field, FieldValue};
///
/// let fields = [
///     Field::new("attempt", 3u8),
///     Field::string("peer", "10.0.0.7:443"),
///     Field::reflected("tags", vec!["a", "b"]),
/// ];
/// assert_eq!(fields[0].key(), "attempt");
/// assert!(matches!(fields[0].value(), FieldValue::Uint(3)));
/// ```
#[derive(Clone, Debug)]
pub struct Field {
    key: Cow<'static, str>,
    value: FieldValue,
}

impl Field {
    /// Creates a field from any value convertible into a [`FieldValue`].
    #[must_use]
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// A boolean field.
    #[must_use]
    pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Self {
        Self::new(key, value)
    }

    /// A signed integer field.
    #[must_use]
    pub fn int(key: impl Into<Cow<'static, str>>, value: impl Into<i64>) -> Self {
        Self::new(key, FieldValue::Int(value.into()))
    }

    /// An unsigned integer field.
    #[must_use]
    pub fn uint(key: impl Into<Cow<'static, str>>, value: impl Into<u64>) -> Self {
        Self::new(key, FieldValue::Uint(value.into()))
    }

    /// A pointer-sized unsigned integer field.
    #[must_use]
    pub fn uintptr(key: impl Into<Cow<'static, str>>, value: usize) -> Self {
        Self::new(key, FieldValue::Uintptr(value))
    }

    /// A single-precision float field.
    #[must_use]
    pub fn f32(key: impl Into<Cow<'static, str>>, value: f32) -> Self {
        Self::new(key, value)
    }

    /// A double-precision float field.
    #[must_use]
    pub fn f64(key: impl Into<Cow<'static, str>>, value: f64) -> Self {
        Self::new(key, value)
    }

    /// A complex field with `f32` parts.
    #[must_use]
    pub fn complex64(key: impl Into<Cow<'static, str>>, value: Complex64) -> Self {
        Self::new(key, value)
    }

    /// A complex field with `f64` parts.
    #[must_use]
    pub fn complex128(key: impl Into<Cow<'static, str>>, value: Complex128) -> Self {
        Self::new(key, value)
    }

    /// A duration field.
    #[must_use]
    pub fn duration(key: impl Into<Cow<'static, str>>, value: Duration) -> Self {
        Self::new(key, value)
    }

    /// A timestamp field.
    #[must_use]
    pub fn time(key: impl Into<Cow<'static, str>>, value: OffsetDateTime) -> Self {
        Self::new(key, value)
    }

    /// A text field.
    #[must_use]
    pub fn string(key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        Self::new(key, FieldValue::Str(value.into()))
    }

    /// A binary field, rendered as a hex dump.
    #[must_use]
    pub fn binary(key: impl Into<Cow<'static, str>>, value: impl Into<Vec<u8>>) -> Self {
        Self::new(key, FieldValue::Binary(value.into()))
    }

    /// A byte string field, rendered as a hex dump.
    #[must_use]
    pub fn byte_string(key: impl Into<Cow<'static, str>>, value: impl Into<Vec<u8>>) -> Self {
        Self::new(key, FieldValue::ByteString(value.into()))
    }

    /// A field whose value marshals itself as an object.
    #[must_use]
    pub fn object<M>(key: impl Into<Cow<'static, str>>, value: M) -> Self
    where
        M: ObjectMarshaler + Send + Sync + 'static,
    {
        Self::new(key, FieldValue::Object(Arc::new(value)))
    }

    /// A field whose value marshals itself as an array.
    #[must_use]
    pub fn array<M>(key: impl Into<Cow<'static, str>>, value: M) -> Self
    where
        M: ArrayMarshaler + Send + Sync + 'static,
    {
        Self::new(key, FieldValue::Array(Arc::new(value)))
    }

    /// An array of signed integers.
    #[must_use]
    pub fn ints(key: impl Into<Cow<'static, str>>, values: impl Into<Vec<i64>>) -> Self {
        Self::array(key, Ints(values.into()))
    }

    /// An array of strings.
    #[must_use]
    pub fn strings<S>(key: impl Into<Cow<'static, str>>, values: impl IntoIterator<Item = S>) -> Self
    where
        S: Into<String>,
    {
        Self::array(key, Strings(values.into_iter().map(Into::into).collect()))
    }

    /// An opaque field serialized by the configured side encoder.
    #[must_use]
    pub fn reflected<T>(key: impl Into<Cow<'static, str>>, value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Self::new(key, FieldValue::Reflected(Some(Arc::new(value))))
    }

    /// An opaque field with no value; renders as `nil`.
    #[must_use]
    pub fn nil(key: impl Into<Cow<'static, str>>) -> Self {
        Self::new(key, FieldValue::Reflected(None))
    }

    /// Opens a namespace; later fields of the same record nest under it.
    #[must_use]
    pub fn namespace(key: impl Into<Cow<'static, str>>) -> Self {
        Self::new(key, FieldValue::Namespace)
    }

    /// A field that renders nothing.
    #[must_use]
    pub fn skip() -> Self {
        Self::new("", FieldValue::Skip)
    }

    /// Returns the key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the payload.
    #[must_use]
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Writes the field into `enc`.
    ///
    /// Scalars never fail; object, array, and opaque payloads propagate the
    /// error raised while marshaling them.
    pub fn add_to(&self, enc: &mut dyn ObjectEncoder) -> Result<(), EncodeError> {
        let key = self.key();
        match &self.value {
            FieldValue::Bool(v) => enc.add_bool(key, *v),
            FieldValue::Int(v) => enc.add_i64(key, *v),
            FieldValue::Uint(v) => enc.add_u64(key, *v),
            FieldValue::Uintptr(v) => enc.add_usize(key, *v),
            FieldValue::F32(v) => enc.add_f32(key, *v),
            FieldValue::F64(v) => enc.add_f64(key, *v),
            FieldValue::Complex64(v) => enc.add_complex64(key, *v),
            FieldValue::Complex128(v) => enc.add_complex128(key, *v),
            FieldValue::Duration(v) => enc.add_duration(key, *v),
            FieldValue::Time(v) => enc.add_time(key, *v),
            FieldValue::Str(v) => enc.add_str(key, v),
            FieldValue::Binary(v) => enc.add_binary(key, v),
            FieldValue::ByteString(v) => enc.add_byte_string(key, v),
            FieldValue::Object(v) => return enc.add_object(key, v.as_ref()),
            FieldValue::Array(v) => return enc.add_array(key, v.as_ref()),
            FieldValue::Reflected(v) => return enc.add_reflected(key, v.as_deref()),
            FieldValue::Namespace => enc.open_namespace(key),
            FieldValue::Skip => {}
        }
        Ok(())
    }
}

/// Writes every field into `enc` in order.
///
/// A failing field is replaced by a `<key>Error` string field carrying the
/// failure message, and the remaining fields are still written. The first
/// failure is returned.
pub fn add_fields(enc: &mut dyn ObjectEncoder, fields: &[Field]) -> Option<EncodeError> {
    let mut first_error = None;
    for field in fields {
        if let Err(error) = field.add_to(enc) {
            tracing::debug!(target: "human::field", key = field.key(), %error, "field failed to encode");
            enc.add_str(&format!("{}Error", field.key()), &error.to_string());
            first_error.get_or_insert(error);
        }
    }
    first_error
}

#[derive(Debug)]
struct Ints(Vec<i64>);

impl ArrayMarshaler for Ints {
    fn marshal_log_array(&self, enc: &mut dyn ArrayEncoder) -> Result<(), EncodeError> {
        for value in &self.0 {
            enc.append_i64(*value);
        }
        Ok(())
    }
}

#[derive(Debug)]
struct Strings(Vec<String>);

impl ArrayMarshaler for Strings {
    fn marshal_log_array(&self, enc: &mut dyn ArrayEncoder) -> Result<(), EncodeError> {
        for value in &self.0 {
            enc.append_str(value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
