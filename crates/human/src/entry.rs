//! crates/human/src/entry.rs
//! Log entry metadata handed to the encoder alongside its fields.

use time::OffsetDateTime;

use crate::level::Level;

/// Source location that produced a log entry.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EntryCaller {
    /// Path of the source file.
    pub file: String,
    /// Line number within [`file`](Self::file).
    pub line: u32,
    /// Fully qualified name of the calling function; may be empty.
    pub function: String,
}

impl EntryCaller {
    /// Creates a caller without function information.
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
            function: String::new(),
        }
    }

    /// Sets the calling function name.
    #[must_use]
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = function.into();
        self
    }

    /// Returns `file:line` using the full file path.
    #[must_use]
    pub fn full_path(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }

    /// Returns `dir/file:line`, keeping only the last two path components.
    #[must_use]
    pub fn trimmed_path(&self) -> String {
        let file = self.file.as_str();
        let trimmed = file
            .rfind('/')
            .and_then(|last| file[..last].rfind('/').map(|prev| &file[prev + 1..]))
            .unwrap_or(file);
        format!("{trimmed}:{}", self.line)
    }
}

/// Metadata of one log record, excluding its fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    /// Severity.
    pub level: Level,
    /// Moment the record was produced.
    pub time: OffsetDateTime,
    /// Name of the emitting logger; may be empty.
    pub logger_name: String,
    /// Log message.
    pub message: String,
    /// Call site, when captured.
    pub caller: Option<EntryCaller>,
    /// Rendered stack trace; empty when absent.
    pub stack: String,
}

impl Entry {
    /// Creates an entry without logger name, caller, or stack trace.
    #[must_use]
    pub fn new(level: Level, time: OffsetDateTime, message: impl Into<String>) -> Self {
        Self {
            level,
            time,
            logger_name: String::new(),
            message: message.into(),
            caller: None,
            stack: String::new(),
        }
    }

    /// Sets the logger name.
    #[must_use]
    pub fn with_logger_name(mut self, name: impl Into<String>) -> Self {
        self.logger_name = name.into();
        self
    }

    /// Sets the call site.
    #[must_use]
    pub fn with_caller(mut self, caller: EntryCaller) -> Self {
        self.caller = Some(caller);
        self
    }

    /// Sets the stack trace text.
    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = stack.into();
        self
    }
}
