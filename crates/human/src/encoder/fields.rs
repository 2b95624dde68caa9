//! Keyed fields: one `key: value` line each.

use pool::FloatWidth;
use time::{Duration, OffsetDateTime};

use super::HumanEncoder;
use crate::error::EncodeError;
use crate::field::{Complex128, Complex64};
use crate::marshal::{ArrayMarshaler, ObjectEncoder, ObjectMarshaler};
use crate::reflect::Reflected;

impl HumanEncoder {
    /// Starts a field line: indentation, key, `: `.
    fn add_key(&mut self, key: &str) {
        self.write_indent();
        self.write_str(key);
        self.write_str(": ");
    }

    fn end_line(&mut self) {
        self.write_byte(b'\n');
    }
}

impl ObjectEncoder for HumanEncoder {
    /// The array's own closing newline ends the field line.
    fn add_array(&mut self, key: &str, value: &dyn ArrayMarshaler) -> Result<(), EncodeError> {
        self.add_key(key);
        self.render_array(value)
    }

    /// Objects are followed by a blank line.
    fn add_object(&mut self, key: &str, value: &dyn ObjectMarshaler) -> Result<(), EncodeError> {
        self.add_key(key);
        let result = self.render_object(value);
        self.end_line();
        result
    }

    /// The value is serialized before anything is written, so a failure
    /// leaves the record untouched.
    fn add_reflected(&mut self, key: &str, value: Option<&dyn Reflected>) -> Result<(), EncodeError> {
        match value {
            None => {
                self.add_key(key);
                self.write_str("nil");
            }
            Some(value) => {
                self.reflect(value)?;
                self.add_key(key);
                self.splice_reflected();
            }
        }
        self.end_line();
        Ok(())
    }

    /// The dump starts on the next line, one level deeper.
    fn add_binary(&mut self, key: &str, value: &[u8]) {
        self.add_key(key);
        self.end_line();
        self.state.open_namespaces += 1;
        self.render_hex_block(value);
        self.state.open_namespaces -= 1;
    }

    fn add_byte_string(&mut self, key: &str, value: &[u8]) {
        self.add_binary(key, value);
    }

    fn add_bool(&mut self, key: &str, value: bool) {
        self.add_key(key);
        self.state.buf.append_bool(value);
        self.end_line();
    }

    fn add_complex128(&mut self, key: &str, value: Complex128) {
        self.add_key(key);
        self.render_complex(value.re, value.im, FloatWidth::F64);
        self.end_line();
    }

    fn add_complex64(&mut self, key: &str, value: Complex64) {
        self.add_key(key);
        self.render_complex(f64::from(value.re), f64::from(value.im), FloatWidth::F32);
        self.end_line();
    }

    fn add_duration(&mut self, key: &str, value: Duration) {
        self.add_key(key);
        self.render_duration(value);
        self.end_line();
    }

    fn add_f64(&mut self, key: &str, value: f64) {
        self.add_key(key);
        self.render_float(value, FloatWidth::F64);
        self.end_line();
    }

    fn add_f32(&mut self, key: &str, value: f32) {
        self.add_key(key);
        self.render_float(f64::from(value), FloatWidth::F32);
        self.end_line();
    }

    fn add_i64(&mut self, key: &str, value: i64) {
        self.add_key(key);
        self.state.buf.append_int(value);
        self.end_line();
    }

    fn add_u64(&mut self, key: &str, value: u64) {
        self.add_key(key);
        self.state.buf.append_uint(value);
        self.end_line();
    }

    fn add_str(&mut self, key: &str, value: &str) {
        self.add_key(key);
        self.render_str(value);
        self.end_line();
    }

    fn add_time(&mut self, key: &str, value: OffsetDateTime) {
        self.add_key(key);
        self.render_time(value);
        self.end_line();
    }

    /// Writes a `key: ` header line; later fields nest one level deeper
    /// until [`HumanEncoder::close_namespace`].
    fn open_namespace(&mut self, key: &str) {
        self.state.open_namespaces += 1;
        self.add_key(key);
        self.end_line();
    }
}
