//! Record composition.

use std::sync::Arc;

use pool::Buffer;

use super::HumanEncoder;
use crate::config::DEFAULT_LINE_ENDING;
use crate::entry::Entry;
use crate::error::EntryError;
use crate::field::{Field, add_fields};
use crate::marshal::ObjectEncoder;

/// A log encoder as seen by a logging host.
pub trait Encoder: ObjectEncoder + Send + Sync {
    /// Returns an independent copy carrying the same context.
    fn clone_encoder(&self) -> Box<dyn Encoder>;

    /// Renders one record: header, context, `fields`, stack trace, then a
    /// blank separator line.
    ///
    /// The returned buffer belongs to the caller, who hands it to a sink and
    /// then drops or frees it.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError`] when a field fails to encode. The error still
    /// carries the complete record, with the failing field replaced by a
    /// `<key>Error` line.
    fn encode_entry(&self, entry: &Entry, fields: &[Field]) -> Result<Buffer, EntryError>;
}

impl HumanEncoder {
    /// Renders one record.
    ///
    /// The header is `[level ]timestamp logger\t[caller\t[function\t]]message`
    /// followed by a newline, then this encoder's context fields, then
    /// `fields`, then the stack trace under the configured key, then a blank
    /// separator line. A line ending other than [`DEFAULT_LINE_ENDING`] is
    /// appended after the separator.
    ///
    /// # Errors
    ///
    /// See [`Encoder::encode_entry`].
    pub fn encode_entry(&self, entry: &Entry, fields: &[Field]) -> Result<Buffer, EntryError> {
        let config = Arc::clone(&self.config);
        let mut record = self.derive();

        if let Some(encode_level) = config.encode_level() {
            encode_level(entry.level, &mut record);
            record.write_byte(b' ');
        }
        record.render_time(entry.time);
        record.write_byte(b' ');
        record.write_str(&entry.logger_name);
        record.write_byte(b'\t');

        if let Some(caller) = &entry.caller {
            (config.encode_caller())(caller, &mut record);
            record.write_byte(b'\t');
            if !config.function_key().is_empty() {
                record.write_str(&caller.function);
                record.write_byte(b'\t');
            }
        }

        record.write_str(&entry.message);
        record.write_byte(b'\n');

        record.state.buf.append_bytes(self.state.buf.as_bytes());
        let first_error = add_fields(&mut record, fields);

        if !entry.stack.is_empty() && !config.stacktrace_key().is_empty() {
            record.add_str(config.stacktrace_key(), &entry.stack);
        }
        // The separator line doubles as the default line ending; only a
        // custom ending adds bytes after it.
        record.write_byte(b'\n');
        if config.line_ending() != DEFAULT_LINE_ENDING {
            record.write_str(config.line_ending());
        }

        let output = record.recycle();
        match first_error {
            None => Ok(output),
            Some(error) => {
                tracing::debug!(target: "human::entry", %error, "entry rendered with field errors");
                Err(EntryError::new(error, output))
            }
        }
    }
}

impl Encoder for HumanEncoder {
    fn clone_encoder(&self) -> Box<dyn Encoder> {
        Box::new(self.clone())
    }

    fn encode_entry(&self, entry: &Entry, fields: &[Field]) -> Result<Buffer, EntryError> {
        Self::encode_entry(self, entry, fields)
    }
}
