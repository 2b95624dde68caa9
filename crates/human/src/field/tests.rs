use super::*;
use crate::marshal::{ObjectMarshalerFn, PrimitiveArrayEncoder};
use time::macros::datetime;

/// Records each call as `method key=value`.
#[derive(Default)]
struct Recorder {
    calls: Vec<String>,
}

impl Recorder {
    fn push(&mut self, method: &str, key: &str, value: impl fmt::Display) {
        self.calls.push(format!("{method} {key}={value}"));
    }
}

/// Collects appended elements as text.
#[derive(Default)]
struct Elements(Vec<String>);

impl PrimitiveArrayEncoder for Elements {
    fn append_bool(&mut self, value: bool) {
        self.0.push(value.to_string());
    }
    fn append_byte_string(&mut self, value: &[u8]) {
        self.0.push(format!("{value:?}"));
    }
    fn append_complex128(&mut self, value: Complex128) {
        self.0.push(format!("{value:?}"));
    }
    fn append_complex64(&mut self, value: Complex64) {
        self.0.push(format!("{value:?}"));
    }
    fn append_f64(&mut self, value: f64) {
        self.0.push(value.to_string());
    }
    fn append_f32(&mut self, value: f32) {
        self.0.push(value.to_string());
    }
    fn append_i64(&mut self, value: i64) {
        self.0.push(value.to_string());
    }
    fn append_u64(&mut self, value: u64) {
        self.0.push(value.to_string());
    }
    fn append_str(&mut self, value: &str) {
        self.0.push(value.to_owned());
    }
    fn append_duration(&mut self, value: Duration) {
        self.0.push(value.to_string());
    }
    fn append_time(&mut self, value: OffsetDateTime) {
        self.0.push(value.to_string());
    }
}

impl ArrayEncoder for Elements {
    fn append_array(&mut self, value: &dyn ArrayMarshaler) -> Result<(), EncodeError> {
        value.marshal_log_array(self)
    }
    fn append_object(&mut self, _value: &dyn ObjectMarshaler) -> Result<(), EncodeError> {
        self.0.push("{..}".to_owned());
        Ok(())
    }
    fn append_reflected(&mut self, value: Option<&dyn Reflected>) -> Result<(), EncodeError> {
        match value {
            Some(value) => self.0.push(value.to_json()?.to_string()),
            None => self.0.push("nil".to_owned()),
        }
        Ok(())
    }
}

impl ObjectEncoder for Recorder {
    fn add_array(&mut self, key: &str, value: &dyn ArrayMarshaler) -> Result<(), EncodeError> {
        let mut elements = Elements::default();
        let result = value.marshal_log_array(&mut elements);
        self.push("array", key, elements.0.join(","));
        result
    }
    fn add_object(&mut self, key: &str, value: &dyn ObjectMarshaler) -> Result<(), EncodeError> {
        self.push("object", key, "{");
        let result = value.marshal_log_object(self);
        self.calls.push("}".to_owned());
        result
    }
    fn add_reflected(&mut self, key: &str, value: Option<&dyn Reflected>) -> Result<(), EncodeError> {
        let text = match value {
            Some(value) => value.to_json()?.to_string(),
            None => "nil".to_owned(),
        };
        self.push("reflected", key, text);
        Ok(())
    }
    fn add_binary(&mut self, key: &str, value: &[u8]) {
        self.push("binary", key, value.len());
    }
    fn add_byte_string(&mut self, key: &str, value: &[u8]) {
        self.push("byte_string", key, value.len());
    }
    fn add_bool(&mut self, key: &str, value: bool) {
        self.push("bool", key, value);
    }
    fn add_complex128(&mut self, key: &str, value: Complex128) {
        self.push("complex128", key, format!("{}/{}", value.re, value.im));
    }
    fn add_complex64(&mut self, key: &str, value: Complex64) {
        self.push("complex64", key, format!("{}/{}", value.re, value.im));
    }
    fn add_duration(&mut self, key: &str, value: Duration) {
        self.push("duration", key, value.whole_milliseconds());
    }
    fn add_f64(&mut self, key: &str, value: f64) {
        self.push("f64", key, value);
    }
    fn add_f32(&mut self, key: &str, value: f32) {
        self.push("f32", key, value);
    }
    fn add_i64(&mut self, key: &str, value: i64) {
        self.push("i64", key, value);
    }
    fn add_u64(&mut self, key: &str, value: u64) {
        self.push("u64", key, value);
    }
    fn add_str(&mut self, key: &str, value: &str) {
        self.push("str", key, value);
    }
    fn add_time(&mut self, key: &str, value: OffsetDateTime) {
        self.push("time", key, value.unix_timestamp());
    }
    fn open_namespace(&mut self, key: &str) {
        self.push("namespace", key, "");
    }
}

fn record(fields: &[Field]) -> (Vec<String>, Option<EncodeError>) {
    let mut recorder = Recorder::default();
    let error = add_fields(&mut recorder, fields);
    (recorder.calls, error)
}

// ============================================================================
// Conversions
// ============================================================================

#[test]
fn narrow_integers_widen() {
    assert!(matches!(FieldValue::from(-3i8), FieldValue::Int(-3)));
    assert!(matches!(FieldValue::from(7u16), FieldValue::Uint(7)));
    assert!(matches!(FieldValue::from(9usize), FieldValue::Uintptr(9)));
    assert!(matches!(FieldValue::from("hi"), FieldValue::Str(ref s) if s == "hi"));
}

#[test]
fn debug_summarises_payloads() {
    let field = Field::binary("blob", vec![0u8; 32]);
    assert_eq!(format!("{:?}", field.value()), "Binary(32)");
    let field = Field::ints("xs", vec![1_i64, 2]);
    assert_eq!(format!("{:?}", field.value()), "Array(..)");
}

#[test]
fn skip_has_empty_key() {
    let field = Field::skip();
    assert_eq!(field.key(), "");
    assert!(matches!(field.value(), FieldValue::Skip));
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn each_variant_reaches_its_encoder_method() {
    let (calls, error) = record(&[
        Field::bool("b", true),
        Field::int("i", -1i32),
        Field::uint("u", 2u32),
        Field::uintptr("p", 3),
        Field::f32("f", 0.5),
        Field::f64("d", 1.25),
        Field::complex64("c", Complex64::new(1.0, 2.0)),
        Field::complex128("z", Complex128::new(3.0, -4.0)),
        Field::duration("t", Duration::milliseconds(1500)),
        Field::time("at", datetime!(1970-01-01 00:00:10 UTC)),
        Field::string("s", "text"),
        Field::binary("bin", vec![1, 2, 3]),
        Field::byte_string("bs", b"ab".to_vec()),
        Field::namespace("ns"),
        Field::skip(),
    ]);
    assert!(error.is_none());
    assert_eq!(
        calls,
        [
            "bool b=true",
            "i64 i=-1",
            "u64 u=2",
            "u64 p=3",
            "f32 f=0.5",
            "f64 d=1.25",
            "complex64 c=1/2",
            "complex128 z=3/-4",
            "duration t=1500",
            "time at=10",
            "str s=text",
            "binary bin=3",
            "byte_string bs=2",
            "namespace ns=",
        ]
    );
}

#[test]
fn array_helpers_append_each_element() {
    let (calls, _) = record(&[
        Field::ints("xs", vec![1_i64, -2, 3]),
        Field::strings("names", ["ann", "bob"]),
    ]);
    assert_eq!(calls, ["array xs=1,-2,3", "array names=ann,bob"]);
}

#[test]
fn reflected_and_nil_fields() {
    let (calls, error) = record(&[
        Field::reflected("tags", vec!["a", "b"]),
        Field::nil("none"),
    ]);
    assert!(error.is_none());
    assert_eq!(calls, ["reflected tags=[\"a\",\"b\"]", "reflected none=nil"]);
}

// ============================================================================
// Failure handling
// ============================================================================

#[test]
fn failing_field_gets_an_error_sibling_and_rendering_continues() {
    let failing = ObjectMarshalerFn::new(|enc: &mut dyn ObjectEncoder| {
        enc.add_str("half", "written");
        Err(EncodeError::marshal("broken"))
    });
    let (calls, error) = record(&[
        Field::object("user", failing),
        Field::int("after", 1),
    ]);

    assert_eq!(
        calls,
        [
            "object user={",
            "str half=written",
            "}",
            "str userError=marshaling failed: broken",
            "i64 after=1",
        ]
    );
    assert_eq!(
        error.map(|e| e.to_string()).as_deref(),
        Some("marshaling failed: broken")
    );
}

#[test]
fn only_the_first_error_is_returned() {
    let first = ObjectMarshalerFn::new(|_: &mut dyn ObjectEncoder| Err(EncodeError::marshal("one")));
    let second = ObjectMarshalerFn::new(|_: &mut dyn ObjectEncoder| Err(EncodeError::marshal("two")));
    let (calls, error) = record(&[Field::object("a", first), Field::object("b", second)]);

    assert!(calls.contains(&"str aError=marshaling failed: one".to_owned()));
    assert!(calls.contains(&"str bError=marshaling failed: two".to_owned()));
    assert_eq!(error.map(|e| e.to_string()).as_deref(), Some("marshaling failed: one"));
}
