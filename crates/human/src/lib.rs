#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `human` renders structured log records as indented, human-readable text.
//! A record is a one-line header (level, timestamp, logger name, call site,
//! message) followed by one `key: value` line per field, with multi-line
//! strings and binary payloads laid out as indented blocks beneath their key.
//!
//! # Design
//!
//! [`HumanEncoder`] implements the three encoder interfaces a logging host
//! drives: [`ObjectEncoder`] for keyed fields, [`ArrayEncoder`] (and its
//! scalar half [`PrimitiveArrayEncoder`]) for array elements, and [`Encoder`]
//! for whole records. Host types describe themselves through
//! [`ObjectMarshaler`] and [`ArrayMarshaler`]; anything `serde::Serialize`
//! can be logged as an opaque [`Reflected`] value, which a configurable
//! [`ReflectedEncoder`] renders (compact JSON by default).
//!
//! Configuration is resolved once into a shared, read-only
//! [`ResolvedConfig`]. Per-render state and output buffers are recycled
//! through the `pool` crate, and [`install`] makes the encoder available by
//! name through the process-wide [`registry`].
//!
//! # Invariants
//!
//! - Every keyed field line starts with 38 spaces, a tab, and two spaces per
//!   open namespace.
//! - Rendering an entry never changes the encoder it was called on; context
//!   fields are copied into each record.
//! - Array and object rendering restore the enclosing namespace depth and
//!   element cursor even when a marshaler fails.
//!
//! # Errors
//!
//! Scalar fields cannot fail. Marshalers and opaque values report
//! [`EncodeError`]; [`HumanEncoder::encode_entry`] keeps rendering past a
//! failing field, records a `<key>Error` line in its place, and returns the
//! finished record inside [`EntryError`].
//!
//! # Examples
//!
//! ```
//! use human::{EncoderConfig, Entry, Field, HumanEncoder, Level, lowercase_level_encoder};
//! use time::macros::datetime;
//!
//! let encoder = HumanEncoder::new(
//!     EncoderConfig::new().with_level_encoder(lowercase_level_encoder()),
//! )
//! .with_fields(&[Field::string("service", "billing")]);
//!
//! let entry = Entry::new(Level::Warn, datetime!(2024-05-06 07:08:09 UTC), "retrying")
//!     .with_logger_name("worker");
//! let record = encoder
//!     .encode_entry(&entry, &[Field::string("reason", "timeout\nafter 3s")])
//!     .unwrap();
//!
//! let text = String::from_utf8_lossy(record.as_bytes());
//! let mut lines = text.lines();
//! assert_eq!(lines.next(), Some("warn 2024-05-06T07:08:09Z worker\tretrying"));
//! assert_eq!(lines.next().map(str::trim), Some("service: billing"));
//! assert_eq!(lines.next().map(str::trim), Some("reason:"));
//! assert_eq!(lines.next().map(str::trim), Some("timeout"));
//! assert_eq!(lines.next().map(str::trim), Some("after 3s"));
//! ```

mod config;
mod encoder;
mod entry;
mod error;
mod field;
mod level;
mod marshal;
mod reflect;
mod registry;
mod text;

pub use config::{
    CallerEncoder, CallerFormat, DEFAULT_LINE_ENDING, EncoderConfig, EncoderSettings, LevelEncoder,
    LevelFormat, ParseFormatError, ResolvedConfig, capital_level_encoder, full_caller_encoder,
    lowercase_level_encoder, short_caller_encoder,
};
pub use encoder::{Encoder, HumanEncoder};
pub use entry::{Entry, EntryCaller};
pub use error::{EncodeError, EntryError, RegistryError};
pub use field::{Complex128, Complex64, Field, FieldValue, add_fields};
pub use level::{Level, ParseLevelError};
pub use marshal::{
    ArrayEncoder, ArrayMarshaler, ArrayMarshalerFn, ObjectEncoder, ObjectMarshaler,
    ObjectMarshalerFn, PrimitiveArrayEncoder,
};
pub use reflect::{JsonReflectedEncoder, Reflected, ReflectedEncoder, ReflectedEncoderFactory, default_reflected_encoder};
pub use registry::{
    EncoderConstructor, EncoderRegistry, HUMAN_ENCODER_NAME, install, install_into,
    new_human_encoder, registry,
};

pub use pool::Buffer;
