//! Conversion of one JSON log line into an entry and its fields.
//!
//! Structured loggers emit one JSON object per line. A fixed set of keys
//! carries record metadata; every other key becomes a field, in document
//! order. Nested JSON objects and arrays are rendered through marshalers so
//! they nest exactly like host-supplied composites.

use human::{
    ArrayEncoder, ArrayMarshaler, EncodeError, Entry, EntryCaller, Field, Level, ObjectEncoder,
    ObjectMarshaler,
};
use serde_json::{Map, Number, Value};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// JSON keys holding record metadata.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MetadataKeys {
    pub(crate) level: String,
    pub(crate) time: String,
    pub(crate) logger: String,
    pub(crate) caller: String,
    pub(crate) function: String,
    pub(crate) message: String,
    pub(crate) stacktrace: String,
}

impl Default for MetadataKeys {
    fn default() -> Self {
        Self {
            level: "level".to_owned(),
            time: "ts".to_owned(),
            logger: "logger".to_owned(),
            caller: "caller".to_owned(),
            function: "func".to_owned(),
            message: "msg".to_owned(),
            stacktrace: "stacktrace".to_owned(),
        }
    }
}

impl MetadataKeys {
    fn is_metadata(&self, key: &str) -> bool {
        [
            &self.level,
            &self.time,
            &self.logger,
            &self.caller,
            &self.function,
            &self.message,
            &self.stacktrace,
        ]
        .iter()
        .any(|candidate| candidate.as_str() == key)
    }
}

/// Splits a JSON log line into an entry and its fields.
///
/// Returns `None` when `line` is not a JSON object. Metadata that is missing
/// or malformed falls back to a neutral value: level `info`, the current
/// time, an empty logger name and message, no caller.
pub(crate) fn parse_record(line: &str, keys: &MetadataKeys) -> Option<(Entry, Vec<Field>)> {
    let Ok(Value::Object(object)) = serde_json::from_str::<Value>(line) else {
        return None;
    };

    let level = object
        .get(&keys.level)
        .and_then(Value::as_str)
        .and_then(|name| name.parse::<Level>().ok())
        .unwrap_or_default();
    let time = object
        .get(&keys.time)
        .and_then(timestamp)
        .unwrap_or_else(OffsetDateTime::now_utc);
    let message = string_at(&object, &keys.message).unwrap_or_default();

    let mut entry = Entry::new(level, time, message);
    if let Some(logger) = string_at(&object, &keys.logger) {
        entry = entry.with_logger_name(logger);
    }
    if let Some(caller) = string_at(&object, &keys.caller) {
        let mut caller = parse_caller(&caller);
        if let Some(function) = string_at(&object, &keys.function) {
            caller = caller.with_function(function);
        }
        entry = entry.with_caller(caller);
    }
    if let Some(stack) = string_at(&object, &keys.stacktrace) {
        entry = entry.with_stack(stack);
    }

    let fields = object
        .into_iter()
        .filter(|(key, _)| !keys.is_metadata(key))
        .map(|(key, value)| field(key, value))
        .collect();
    Some((entry, fields))
}

fn string_at(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(text) => Some(text.clone()),
        _ => None,
    }
}

/// Accepts RFC 3339 text or fractional Unix seconds.
fn timestamp(value: &Value) -> Option<OffsetDateTime> {
    match value {
        Value::String(text) => OffsetDateTime::parse(text, &Rfc3339).ok(),
        Value::Number(number) => {
            let seconds = number.as_f64()?;
            let whole = seconds.trunc();
            let nanos = whole as i128 * 1_000_000_000 + ((seconds - whole) * 1e9).round() as i128;
            OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()
        }
        _ => None,
    }
}

/// Parses `path:line`; a missing or invalid line number becomes `0`.
fn parse_caller(text: &str) -> EntryCaller {
    match text.rsplit_once(':') {
        Some((file, line)) => match line.parse() {
            Ok(line) => EntryCaller::new(file, line),
            Err(_) => EntryCaller::new(text, 0),
        },
        None => EntryCaller::new(text, 0),
    }
}

fn field(key: String, value: Value) -> Field {
    match value {
        Value::Null => Field::nil(key),
        Value::Bool(flag) => Field::bool(key, flag),
        Value::Number(number) => number_field(key, &number),
        Value::String(text) => Field::string(key, text),
        Value::Array(values) => Field::array(key, JsonArray(values)),
        Value::Object(object) => Field::object(key, JsonObject(object)),
    }
}

fn number_field(key: String, number: &Number) -> Field {
    if let Some(value) = number.as_i64() {
        Field::int(key, value)
    } else if let Some(value) = number.as_u64() {
        Field::uint(key, value)
    } else {
        Field::f64(key, number.as_f64().unwrap_or(f64::NAN))
    }
}

/// A JSON object rendered field by field.
#[derive(Debug)]
struct JsonObject(Map<String, Value>);

impl ObjectMarshaler for JsonObject {
    fn marshal_log_object(&self, enc: &mut dyn ObjectEncoder) -> Result<(), EncodeError> {
        JsonObjectRef(&self.0).marshal_log_object(enc)
    }
}

fn add_value(enc: &mut dyn ObjectEncoder, key: &str, value: &Value) -> Result<(), EncodeError> {
    match value {
        Value::Null => enc.add_reflected(key, None)?,
        Value::Bool(flag) => enc.add_bool(key, *flag),
        Value::Number(number) => {
            if let Some(value) = number.as_i64() {
                enc.add_i64(key, value);
            } else if let Some(value) = number.as_u64() {
                enc.add_u64(key, value);
            } else {
                enc.add_f64(key, number.as_f64().unwrap_or(f64::NAN));
            }
        }
        Value::String(text) => enc.add_str(key, text),
        Value::Array(values) => enc.add_array(key, &JsonArraySlice(values))?,
        Value::Object(object) => enc.add_object(key, &JsonObjectRef(object))?,
    }
    Ok(())
}

/// A JSON array rendered element by element.
#[derive(Debug)]
struct JsonArray(Vec<Value>);

impl ArrayMarshaler for JsonArray {
    fn marshal_log_array(&self, enc: &mut dyn ArrayEncoder) -> Result<(), EncodeError> {
        JsonArraySlice(&self.0).marshal_log_array(enc)
    }
}

struct JsonArraySlice<'a>(&'a [Value]);

impl ArrayMarshaler for JsonArraySlice<'_> {
    fn marshal_log_array(&self, enc: &mut dyn ArrayEncoder) -> Result<(), EncodeError> {
        for value in self.0 {
            match value {
                Value::Null => enc.append_reflected(None)?,
                Value::Bool(flag) => enc.append_bool(*flag),
                Value::Number(number) => {
                    if let Some(value) = number.as_i64() {
                        enc.append_i64(value);
                    } else if let Some(value) = number.as_u64() {
                        enc.append_u64(value);
                    } else {
                        enc.append_f64(number.as_f64().unwrap_or(f64::NAN));
                    }
                }
                Value::String(text) => enc.append_str(text),
                Value::Array(values) => enc.append_array(&JsonArraySlice(values))?,
                Value::Object(object) => enc.append_object(&JsonObjectRef(object))?,
            }
        }
        Ok(())
    }
}

struct JsonObjectRef<'a>(&'a Map<String, Value>);

impl ObjectMarshaler for JsonObjectRef<'_> {
    fn marshal_log_object(&self, enc: &mut dyn ObjectEncoder) -> Result<(), EncodeError> {
        for (key, value) in self.0 {
            add_value(enc, key, value)?;
        }
        Ok(())
    }
}
