//! Error types for field encoding, entry rendering, and encoder registration.

use std::error::Error as StdError;
use std::io;

use pool::Buffer;

/// Error raised while encoding a single field or array element.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// An object or array marshaler reported a failure.
    #[error("marshaling failed: {0}")]
    Marshal(Box<dyn StdError + Send + Sync>),

    /// A reflected value could not be serialized.
    #[error("reflected value could not be serialized: {0}")]
    Reflect(#[from] serde_json::Error),

    /// The reflected-value encoder failed to write its output.
    #[error("I/O error while encoding: {0}")]
    Io(#[from] io::Error),
}

impl EncodeError {
    /// Wraps an arbitrary marshaling failure.
    ///
    /// Accepts anything convertible into a boxed error, including `&str` and
    /// `String` messages.
    pub fn marshal(error: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Marshal(error.into())
    }
}

/// Error returned when an entry rendered with at least one failing field.
///
/// Rendering never stops at the first failure: the remaining fields, the
/// stack trace, and the record separator are still written. The finished
/// best-effort output travels with the error so callers can decide whether
/// to emit it anyway.
#[derive(Debug, thiserror::Error)]
#[error("entry rendered with errors: {source}")]
pub struct EntryError {
    source: EncodeError,
    output: Buffer,
}

impl EntryError {
    pub(crate) fn new(source: EncodeError, output: Buffer) -> Self {
        Self { source, output }
    }

    /// Returns the first field error encountered.
    #[must_use]
    pub fn error(&self) -> &EncodeError {
        &self.source
    }

    /// Returns the rendered record.
    #[must_use]
    pub fn output(&self) -> &Buffer {
        &self.output
    }

    /// Consumes the error, returning the rendered record.
    #[must_use]
    pub fn into_output(self) -> Buffer {
        self.output
    }

    /// Consumes the error, returning both the failure and the rendered record.
    #[must_use]
    pub fn into_parts(self) -> (EncodeError, Buffer) {
        (self.source, self.output)
    }
}

/// Error reported by the encoder registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Encoders cannot be registered under an empty name.
    #[error("encoder name must not be empty")]
    EmptyName,

    /// Another constructor already owns the name.
    #[error("encoder already registered for name {0:?}")]
    AlreadyRegistered(String),

    /// No constructor is registered under the name.
    #[error("no encoder registered for name {0:?}")]
    UnknownEncoder(String),

    /// The registered constructor failed.
    #[error("failed constructing encoder {name:?}: {source}")]
    Construct {
        /// Name the encoder was requested under.
        name: String,
        /// Failure reported by the constructor.
        #[source]
        source: EncodeError,
    },
}
