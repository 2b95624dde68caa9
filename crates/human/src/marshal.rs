//! Encoder and marshaler capability traits.
//!
//! Values reach an encoder through two doors. Keyed values go through an
//! [`ObjectEncoder`] (`add_*`), unkeyed array elements through an
//! [`ArrayEncoder`] (`append_*`). Composite values implement
//! [`ObjectMarshaler`] or [`ArrayMarshaler`] and are handed the receiving
//! encoder so they can write their own members.
//!
//! Narrow integer widths have default methods that widen to 64 bits, so an
//! implementation only has to handle the canonical widths.

use time::{Duration, OffsetDateTime};

use crate::error::EncodeError;
use crate::field::{Complex64, Complex128};
use crate::reflect::Reflected;

/// Receives unkeyed primitive values.
///
/// Level and caller callbacks are limited to this surface.
pub trait PrimitiveArrayEncoder {
    /// Appends a boolean.
    fn append_bool(&mut self, value: bool);
    /// Appends a byte string.
    fn append_byte_string(&mut self, value: &[u8]);
    /// Appends a 128-bit complex number.
    fn append_complex128(&mut self, value: Complex128);
    /// Appends a 64-bit complex number.
    fn append_complex64(&mut self, value: Complex64);
    /// Appends a double-precision float.
    fn append_f64(&mut self, value: f64);
    /// Appends a single-precision float.
    fn append_f32(&mut self, value: f32);
    /// Appends a signed integer.
    fn append_i64(&mut self, value: i64);
    /// Appends an unsigned integer.
    fn append_u64(&mut self, value: u64);
    /// Appends a string.
    fn append_str(&mut self, value: &str);
    /// Appends a duration.
    fn append_duration(&mut self, value: Duration);
    /// Appends a timestamp.
    fn append_time(&mut self, value: OffsetDateTime);

    /// Appends an `i32`.
    fn append_i32(&mut self, value: i32) {
        self.append_i64(i64::from(value));
    }
    /// Appends an `i16`.
    fn append_i16(&mut self, value: i16) {
        self.append_i64(i64::from(value));
    }
    /// Appends an `i8`.
    fn append_i8(&mut self, value: i8) {
        self.append_i64(i64::from(value));
    }
    /// Appends an `isize`.
    fn append_isize(&mut self, value: isize) {
        self.append_i64(value as i64);
    }
    /// Appends a `u32`.
    fn append_u32(&mut self, value: u32) {
        self.append_u64(u64::from(value));
    }
    /// Appends a `u16`.
    fn append_u16(&mut self, value: u16) {
        self.append_u64(u64::from(value));
    }
    /// Appends a `u8`.
    fn append_u8(&mut self, value: u8) {
        self.append_u64(u64::from(value));
    }
    /// Appends a pointer-sized unsigned integer.
    fn append_usize(&mut self, value: usize) {
        self.append_u64(value as u64);
    }
}

/// Receives unkeyed values, including composites.
pub trait ArrayEncoder: PrimitiveArrayEncoder {
    /// Appends a nested array.
    fn append_array(&mut self, value: &dyn ArrayMarshaler) -> Result<(), EncodeError>;
    /// Appends a nested object.
    fn append_object(&mut self, value: &dyn ObjectMarshaler) -> Result<(), EncodeError>;
    /// Appends an opaque value; `None` stands for an absent value.
    fn append_reflected(&mut self, value: Option<&dyn Reflected>) -> Result<(), EncodeError>;
}

/// Receives keyed values.
pub trait ObjectEncoder {
    /// Adds a nested array.
    fn add_array(&mut self, key: &str, value: &dyn ArrayMarshaler) -> Result<(), EncodeError>;
    /// Adds a nested object.
    fn add_object(&mut self, key: &str, value: &dyn ObjectMarshaler) -> Result<(), EncodeError>;
    /// Adds an opaque value; `None` stands for an absent value.
    fn add_reflected(&mut self, key: &str, value: Option<&dyn Reflected>)
    -> Result<(), EncodeError>;

    /// Adds arbitrary binary data.
    fn add_binary(&mut self, key: &str, value: &[u8]);
    /// Adds a byte string.
    fn add_byte_string(&mut self, key: &str, value: &[u8]);
    /// Adds a boolean.
    fn add_bool(&mut self, key: &str, value: bool);
    /// Adds a 128-bit complex number.
    fn add_complex128(&mut self, key: &str, value: Complex128);
    /// Adds a 64-bit complex number.
    fn add_complex64(&mut self, key: &str, value: Complex64);
    /// Adds a duration.
    fn add_duration(&mut self, key: &str, value: Duration);
    /// Adds a double-precision float.
    fn add_f64(&mut self, key: &str, value: f64);
    /// Adds a single-precision float.
    fn add_f32(&mut self, key: &str, value: f32);
    /// Adds a signed integer.
    fn add_i64(&mut self, key: &str, value: i64);
    /// Adds an unsigned integer.
    fn add_u64(&mut self, key: &str, value: u64);
    /// Adds a string.
    fn add_str(&mut self, key: &str, value: &str);
    /// Adds a timestamp.
    fn add_time(&mut self, key: &str, value: OffsetDateTime);

    /// Opens a namespace; fields added afterwards nest one level deeper.
    fn open_namespace(&mut self, key: &str);

    /// Adds an `i32`.
    fn add_i32(&mut self, key: &str, value: i32) {
        self.add_i64(key, i64::from(value));
    }
    /// Adds an `i16`.
    fn add_i16(&mut self, key: &str, value: i16) {
        self.add_i64(key, i64::from(value));
    }
    /// Adds an `i8`.
    fn add_i8(&mut self, key: &str, value: i8) {
        self.add_i64(key, i64::from(value));
    }
    /// Adds an `isize`.
    fn add_isize(&mut self, key: &str, value: isize) {
        self.add_i64(key, value as i64);
    }
    /// Adds a `u32`.
    fn add_u32(&mut self, key: &str, value: u32) {
        self.add_u64(key, u64::from(value));
    }
    /// Adds a `u16`.
    fn add_u16(&mut self, key: &str, value: u16) {
        self.add_u64(key, u64::from(value));
    }
    /// Adds a `u8`.
    fn add_u8(&mut self, key: &str, value: u8) {
        self.add_u64(key, u64::from(value));
    }
    /// Adds a pointer-sized unsigned integer.
    fn add_usize(&mut self, key: &str, value: usize) {
        self.add_u64(key, value as u64);
    }
}

/// A value that writes itself as a set of keyed members.
pub trait ObjectMarshaler {
    /// Writes the members into `enc`.
    fn marshal_log_object(&self, enc: &mut dyn ObjectEncoder) -> Result<(), EncodeError>;
}

/// A value that writes itself as a sequence of elements.
pub trait ArrayMarshaler {
    /// Writes the elements into `enc`.
    fn marshal_log_array(&self, enc: &mut dyn ArrayEncoder) -> Result<(), EncodeError>;
}

/// Adapts a closure into an [`ObjectMarshaler`].
///
/// ```
/// use human::{ObjectEncoder, ObjectMarshalerFn};
///
/// let user = ObjectMarshalerFn::new(|enc: &mut dyn ObjectEncoder| {
///     enc.add_str("name", "ada");
///     enc.add_u64("id", 7);
///     Ok(())
/// });
/// # let _ = user;
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ObjectMarshalerFn<F>(pub F);

impl<F> ObjectMarshalerFn<F>
where
    F: Fn(&mut dyn ObjectEncoder) -> Result<(), EncodeError>,
{
    /// Wraps `marshal`.
    pub const fn new(marshal: F) -> Self {
        Self(marshal)
    }
}

impl<F> ObjectMarshaler for ObjectMarshalerFn<F>
where
    F: Fn(&mut dyn ObjectEncoder) -> Result<(), EncodeError>,
{
    fn marshal_log_object(&self, enc: &mut dyn ObjectEncoder) -> Result<(), EncodeError> {
        (self.0)(enc)
    }
}

/// Adapts a closure into an [`ArrayMarshaler`].
#[derive(Clone, Copy, Debug)]
pub struct ArrayMarshalerFn<F>(pub F);

impl<F> ArrayMarshalerFn<F>
where
    F: Fn(&mut dyn ArrayEncoder) -> Result<(), EncodeError>,
{
    /// Wraps `marshal`.
    pub const fn new(marshal: F) -> Self {
        Self(marshal)
    }
}

impl<F> ArrayMarshaler for ArrayMarshalerFn<F>
where
    F: Fn(&mut dyn ArrayEncoder) -> Result<(), EncodeError>,
{
    fn marshal_log_array(&self, enc: &mut dyn ArrayEncoder) -> Result<(), EncodeError> {
        (self.0)(enc)
    }
}
