//! Value rendering and the array encoder implementations.

use std::mem;

use pool::FloatWidth;
use time::{Duration, OffsetDateTime};

use super::HumanEncoder;
use super::state::{ArrayCursor, ReflectScratch};
use crate::error::EncodeError;
use crate::field::{Complex128, Complex64};
use crate::marshal::{ArrayEncoder, ArrayMarshaler, ObjectMarshaler, PrimitiveArrayEncoder};
use crate::reflect::Reflected;
use crate::text::{self, HEX_DUMP_WIDTH};

impl HumanEncoder {
    /// Writes `, ` before every array element but the first.
    pub(super) fn begin_element(&mut self) {
        if self.state.array.next_needs_separator() {
            self.state.buf.append_str(", ");
        }
    }

    /// Floats in value position; non-finite values are quoted.
    pub(super) fn render_float(&mut self, value: f64, width: FloatWidth) {
        if value.is_nan() {
            self.write_str("\"NaN\"");
        } else if value == f64::INFINITY {
            self.write_str("\"+Inf\"");
        } else if value == f64::NEG_INFINITY {
            self.write_str("\"-Inf\"");
        } else {
            self.state.buf.append_float(value, width);
        }
    }

    /// Complex parts spell non-finite values bare.
    fn render_complex_part(&mut self, value: f64, width: FloatWidth) {
        if value.is_nan() {
            self.write_str("NaN");
        } else if value == f64::INFINITY {
            self.write_str("+Inf");
        } else if value == f64::NEG_INFINITY {
            self.write_str("-Inf");
        } else {
            self.state.buf.append_float(value, width);
        }
    }

    /// Writes `re+imi` or `re-imi`.
    pub(super) fn render_complex(&mut self, re: f64, im: f64, width: FloatWidth) {
        self.render_complex_part(re, width);
        if im >= 0.0 {
            self.write_byte(b'+');
        }
        self.render_complex_part(im, width);
        self.write_byte(b'i');
    }

    pub(super) fn render_duration(&mut self, value: Duration) {
        text::write_duration(&mut self.state.buf, value);
    }

    pub(super) fn render_time(&mut self, value: OffsetDateTime) {
        text::write_rfc3339_nano(&mut self.state.buf, value);
    }

    /// Strings without a newline are written verbatim. Otherwise each line
    /// starts on a new line one level deeper, with trailing whitespace
    /// trimmed.
    pub(super) fn render_str(&mut self, value: &str) {
        if !value.contains('\n') {
            self.write_str(value);
            return;
        }

        self.state.open_namespaces += 1;
        for line in value.split('\n') {
            self.write_byte(b'\n');
            self.write_indent();
            self.write_str(line.trim_end());
        }
        self.state.open_namespaces -= 1;
    }

    /// Hex dump at the current depth. Every dump line and a final
    /// indent-only line start with the indent and end with a newline.
    pub(super) fn render_hex_block(&mut self, value: &[u8]) {
        for (index, chunk) in value.chunks(HEX_DUMP_WIDTH).enumerate() {
            self.write_indent();
            text::write_hex_dump_line(&mut self.state.buf, index * HEX_DUMP_WIDTH, chunk);
            self.write_byte(b'\n');
        }
        self.write_indent();
        self.write_byte(b'\n');
    }

    /// Writes `{...}` and a newline. Nested fields start again at depth
    /// zero; the outer depth and array cursor are restored whatever the
    /// marshaler does.
    pub(super) fn render_object(&mut self, value: &dyn ObjectMarshaler) -> Result<(), EncodeError> {
        let depth = mem::replace(&mut self.state.open_namespaces, 0);
        let cursor = mem::take(&mut self.state.array);

        self.write_byte(b'{');
        let result = value.marshal_log_object(self);
        self.write_str("}\n");

        self.state.array = cursor;
        self.state.open_namespaces = depth;
        result
    }

    /// Writes `[ a, b ]` and a newline. Elements keep the enclosing depth.
    pub(super) fn render_array(&mut self, value: &dyn ArrayMarshaler) -> Result<(), EncodeError> {
        let depth = self.state.open_namespaces;
        let cursor = mem::replace(&mut self.state.array, ArrayCursor::opened());

        self.write_str("[ ");
        let result = value.marshal_log_array(self);
        self.write_str(" ]\n");

        self.state.array = cursor;
        self.state.open_namespaces = depth;
        result
    }

    /// Runs the side encoder over `value`, leaving the result in the scratch
    /// buffer without its trailing newline. Writes nothing to the record.
    pub(super) fn reflect(&mut self, value: &dyn Reflected) -> Result<(), EncodeError> {
        let factory = self.config.new_reflected_encoder();
        let scratch = self.state.reflect.get_or_insert_with(|| ReflectScratch {
            buf: pool::global().get(),
            encoder: factory(),
        });
        scratch.buf.reset();
        scratch.encoder.encode(&mut scratch.buf, value)?;
        scratch.buf.trim_newline();
        Ok(())
    }

    /// Copies the last [`reflect`](Self::reflect) result into the record.
    pub(super) fn splice_reflected(&mut self) {
        let state = &mut self.state;
        if let Some(scratch) = &state.reflect {
            state.buf.append_bytes(scratch.buf.as_bytes());
        }
    }
}

impl PrimitiveArrayEncoder for HumanEncoder {
    fn append_bool(&mut self, value: bool) {
        self.begin_element();
        self.state.buf.append_bool(value);
    }

    fn append_byte_string(&mut self, value: &[u8]) {
        self.begin_element();
        self.render_hex_block(value);
    }

    fn append_complex128(&mut self, value: Complex128) {
        self.begin_element();
        self.render_complex(value.re, value.im, FloatWidth::F64);
    }

    fn append_complex64(&mut self, value: Complex64) {
        self.begin_element();
        self.render_complex(f64::from(value.re), f64::from(value.im), FloatWidth::F32);
    }

    fn append_f64(&mut self, value: f64) {
        self.begin_element();
        self.render_float(value, FloatWidth::F64);
    }

    fn append_f32(&mut self, value: f32) {
        self.begin_element();
        self.render_float(f64::from(value), FloatWidth::F32);
    }

    fn append_i64(&mut self, value: i64) {
        self.begin_element();
        self.state.buf.append_int(value);
    }

    fn append_u64(&mut self, value: u64) {
        self.begin_element();
        self.state.buf.append_uint(value);
    }

    fn append_str(&mut self, value: &str) {
        self.begin_element();
        self.render_str(value);
    }

    fn append_duration(&mut self, value: Duration) {
        self.begin_element();
        self.render_duration(value);
    }

    fn append_time(&mut self, value: OffsetDateTime) {
        self.begin_element();
        self.render_time(value);
    }
}

impl ArrayEncoder for HumanEncoder {
    fn append_array(&mut self, value: &dyn ArrayMarshaler) -> Result<(), EncodeError> {
        self.begin_element();
        self.render_array(value)
    }

    fn append_object(&mut self, value: &dyn ObjectMarshaler) -> Result<(), EncodeError> {
        self.begin_element();
        self.render_object(value)
    }

    fn append_reflected(&mut self, value: Option<&dyn Reflected>) -> Result<(), EncodeError> {
        match value {
            None => {
                self.begin_element();
                self.write_str("nil");
            }
            Some(value) => {
                self.reflect(value)?;
                self.begin_element();
                self.splice_reflected();
            }
        }
        Ok(())
    }
}
