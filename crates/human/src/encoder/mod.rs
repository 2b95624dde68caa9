//! The human-readable encoder.
//!
//! # Overview
//!
//! A [`HumanEncoder`] is an immutable, shared [`ResolvedConfig`] plus a small
//! mutable state: the output buffer, the open namespace depth, the array
//! element cursor, and a lazily created side buffer for opaque values. The
//! three roles of the encoder live in sibling modules:
//!
//! - `render` writes single values and implements the array encoder traits.
//! - `fields` writes `key: value` lines and implements [`ObjectEncoder`].
//! - `entry` composes a full record and implements [`Encoder`].
//!
//! # Layout
//!
//! Every keyed field starts on its own line, prefixed by a fixed leader of 38
//! spaces and a tab followed by two spaces per open namespace. Multi-line
//! strings and binary payloads are written as indented blocks one level
//! deeper than their key.
//!
//! # Concurrency
//!
//! Rendering takes `&self` and writes into a per-call encoder drawn from a
//! process-wide pool, so one context-bound encoder may be shared by any
//! number of threads.

mod entry;
mod fields;
mod render;
mod state;

use std::fmt;
use std::sync::Arc;

use pool::Buffer;

use crate::config::{EncoderConfig, ResolvedConfig};
use crate::field::{Field, add_fields};

pub use self::entry::Encoder;
use self::state::{EncoderState, states};

/// Fixed prefix of every field line.
const INDENT_LEADER: &str = "                                      \t";

/// Indentation added per open namespace.
const INDENT_STEP: &str = "  ";

/// Human-readable, multi-line log encoder.
///
/// ```
/// use human::{Entry, EncoderConfig, Field, HumanEncoder, Level};
/// use time::macros::datetime;
///
/// let encoder = HumanEncoder::new(EncoderConfig::new());
/// let entry = Entry::new(Level::Info, datetime!(2024-01-02 03:04:05 UTC), "started")
///     .with_logger_name("app");
/// let out = encoder.encode_entry(&entry, &[Field::int("port", 8080)]).unwrap();
///
/// let text = String::from_utf8_lossy(out.as_bytes());
/// assert!(text.starts_with("2024-01-02T03:04:05Z app\tstarted\n"));
/// assert!(text.ends_with("\tport: 8080\n\n"));
/// ```
pub struct HumanEncoder {
    config: Arc<ResolvedConfig>,
    state: EncoderState,
}

impl HumanEncoder {
    /// Creates an encoder from host-supplied options.
    #[must_use]
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            config: Arc::new(config.resolve()),
            state: EncoderState {
                buf: pool::global().get(),
                ..EncoderState::default()
            },
        }
    }

    /// Returns the resolved configuration shared by this encoder and its clones.
    #[must_use]
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Returns the bytes accumulated by fields added directly to this encoder.
    ///
    /// These are replayed after the header of every entry it renders.
    #[must_use]
    pub fn context(&self) -> &[u8] {
        self.state.buf.as_bytes()
    }

    /// Returns the number of namespaces currently open.
    #[must_use]
    pub fn open_namespaces(&self) -> usize {
        self.state.open_namespaces
    }

    /// Closes the innermost namespace; does nothing when none is open.
    pub fn close_namespace(&mut self) {
        self.state.open_namespaces = self.state.open_namespaces.saturating_sub(1);
    }

    /// Returns a clone with `fields` bound as context.
    ///
    /// Fields that fail to encode are replaced by a `<key>Error` field in the
    /// bound context and logged at `debug` under the `human::field` target;
    /// no error is returned. Use [`add_fields`] on a clone to observe the
    /// first failure.
    #[must_use]
    pub fn with_fields(&self, fields: &[Field]) -> Self {
        let mut bound = self.clone();
        let _ = add_fields(&mut bound, fields);
        bound
    }

    /// Draws a pooled state sharing this encoder's configuration and depth.
    ///
    /// The output buffer is fresh; callers copy context bytes themselves.
    fn derive(&self) -> Self {
        let mut state = states().get();
        state.buf = pool::global().get();
        state.open_namespaces = self.state.open_namespaces;
        Self {
            config: Arc::clone(&self.config),
            state,
        }
    }

    /// Hands back the output buffer and returns the state to the pool.
    fn recycle(mut self) -> Buffer {
        let buf = std::mem::take(&mut self.state.buf);
        states().put(self.state);
        buf
    }

    fn write_str(&mut self, s: &str) {
        self.state.buf.append_str(s);
    }

    fn write_byte(&mut self, byte: u8) {
        self.state.buf.append_byte(byte);
    }

    fn write_indent(&mut self) {
        self.state.buf.append_str(INDENT_LEADER);
        for _ in 0..self.state.open_namespaces {
            self.state.buf.append_str(INDENT_STEP);
        }
    }
}

impl Clone for HumanEncoder {
    fn clone(&self) -> Self {
        let mut clone = self.derive();
        clone.state.buf.append_bytes(self.state.buf.as_bytes());
        clone
    }
}

impl fmt::Debug for HumanEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HumanEncoder")
            .field("config", &self.config)
            .field("context_len", &self.state.buf.len())
            .field("open_namespaces", &self.state.open_namespaces)
            .finish()
    }
}

#[cfg(test)]
mod tests;
