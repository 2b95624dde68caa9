//! Encoder configuration.
//!
//! [`EncoderConfig`] is what hosts hand in: every option is optional and
//! callbacks may be missing. Constructing an encoder resolves it once into an
//! immutable [`ResolvedConfig`] shared by reference between every clone of
//! that encoder, so no render ever copies or mutates configuration.
//!
//! [`EncoderSettings`] is the declarative, `serde`-friendly spelling of the
//! same options for hosts that load their logging setup from a file.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::entry::EntryCaller;
use crate::level::Level;
use crate::marshal::PrimitiveArrayEncoder;
use crate::reflect::{ReflectedEncoderFactory, default_reflected_encoder};

/// Line ending used when none is configured.
pub const DEFAULT_LINE_ENDING: &str = "\n";

/// Renders an entry's level.
pub type LevelEncoder = Arc<dyn Fn(Level, &mut dyn PrimitiveArrayEncoder) + Send + Sync>;

/// Renders an entry's call site.
pub type CallerEncoder = Arc<dyn Fn(&EntryCaller, &mut dyn PrimitiveArrayEncoder) + Send + Sync>;

/// Host-supplied encoder options.
///
/// ```
/// use human::{EncoderConfig, capital_level_encoder};
///
/// let config = EncoderConfig::new()
///     .with_level_encoder(capital_level_encoder())
///     .with_function_key("func")
///     .with_stacktrace_key("stacktrace");
/// assert_eq!(config.function_key, "func");
/// ```
#[derive(Clone, Default)]
pub struct EncoderConfig {
    /// Terminator for each record; empty selects [`DEFAULT_LINE_ENDING`].
    ///
    /// Every record closes with a blank separator line, which already is the
    /// default ending. Any other ending is written after that line.
    pub line_ending: String,
    /// Write nothing after the separator line, whatever `line_ending` says.
    pub skip_line_ending: bool,
    /// When non-empty, the caller's function name is written after the call site.
    pub function_key: String,
    /// When non-empty, stack traces are written under this key.
    pub stacktrace_key: String,
    /// Level renderer; the level is omitted when absent.
    pub encode_level: Option<LevelEncoder>,
    /// Call site renderer; [`short_caller_encoder`] when absent.
    pub encode_caller: Option<CallerEncoder>,
    /// Side encoder for opaque values; compact JSON when absent.
    pub new_reflected_encoder: Option<ReflectedEncoderFactory>,
}

impl EncoderConfig {
    /// Creates a configuration with every option at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the record separator.
    #[must_use]
    pub fn with_line_ending(mut self, line_ending: impl Into<String>) -> Self {
        self.line_ending = line_ending.into();
        self
    }

    /// Omits the record separator.
    #[must_use]
    pub fn with_skip_line_ending(mut self, skip: bool) -> Self {
        self.skip_line_ending = skip;
        self
    }

    /// Writes the caller's function name when a caller is present.
    #[must_use]
    pub fn with_function_key(mut self, key: impl Into<String>) -> Self {
        self.function_key = key.into();
        self
    }

    /// Writes stack traces under `key`.
    #[must_use]
    pub fn with_stacktrace_key(mut self, key: impl Into<String>) -> Self {
        self.stacktrace_key = key.into();
        self
    }

    /// Sets the level renderer.
    #[must_use]
    pub fn with_level_encoder(mut self, encoder: LevelEncoder) -> Self {
        self.encode_level = Some(encoder);
        self
    }

    /// Sets the call site renderer.
    #[must_use]
    pub fn with_caller_encoder(mut self, encoder: CallerEncoder) -> Self {
        self.encode_caller = Some(encoder);
        self
    }

    /// Sets the side encoder factory for opaque values.
    #[must_use]
    pub fn with_reflected_encoder(mut self, factory: ReflectedEncoderFactory) -> Self {
        self.new_reflected_encoder = Some(factory);
        self
    }

    /// Applies defaults and freezes the configuration.
    #[must_use]
    pub fn resolve(self) -> ResolvedConfig {
        let line_ending = if self.skip_line_ending {
            String::new()
        } else if self.line_ending.is_empty() {
            DEFAULT_LINE_ENDING.to_owned()
        } else {
            self.line_ending
        };

        ResolvedConfig {
            line_ending,
            function_key: self.function_key,
            stacktrace_key: self.stacktrace_key,
            encode_level: self.encode_level,
            encode_caller: self.encode_caller.unwrap_or_else(short_caller_encoder),
            new_reflected_encoder: self
                .new_reflected_encoder
                .unwrap_or_else(default_reflected_encoder),
        }
    }
}

impl fmt::Debug for EncoderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderConfig")
            .field("line_ending", &self.line_ending)
            .field("skip_line_ending", &self.skip_line_ending)
            .field("function_key", &self.function_key)
            .field("stacktrace_key", &self.stacktrace_key)
            .field("encode_level", &self.encode_level.is_some())
            .field("encode_caller", &self.encode_caller.is_some())
            .field("new_reflected_encoder", &self.new_reflected_encoder.is_some())
            .finish()
    }
}

/// Configuration with defaults applied; never mutated after construction.
pub struct ResolvedConfig {
    line_ending: String,
    function_key: String,
    stacktrace_key: String,
    encode_level: Option<LevelEncoder>,
    encode_caller: CallerEncoder,
    new_reflected_encoder: ReflectedEncoderFactory,
}

impl ResolvedConfig {
    /// Configured record terminator; empty when skipped.
    #[must_use]
    pub fn line_ending(&self) -> &str {
        &self.line_ending
    }

    /// Function-name key; empty when function names are omitted.
    #[must_use]
    pub fn function_key(&self) -> &str {
        &self.function_key
    }

    /// Stack trace key; empty when stack traces are omitted.
    #[must_use]
    pub fn stacktrace_key(&self) -> &str {
        &self.stacktrace_key
    }

    pub(crate) fn encode_level(&self) -> Option<&LevelEncoder> {
        self.encode_level.as_ref()
    }

    pub(crate) fn encode_caller(&self) -> &CallerEncoder {
        &self.encode_caller
    }

    pub(crate) fn new_reflected_encoder(&self) -> &ReflectedEncoderFactory {
        &self.new_reflected_encoder
    }
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("line_ending", &self.line_ending)
            .field("function_key", &self.function_key)
            .field("stacktrace_key", &self.stacktrace_key)
            .field("encode_level", &self.encode_level.is_some())
            .finish_non_exhaustive()
    }
}

/// Writes the lowercase level name, e.g. `info`.
#[must_use]
pub fn lowercase_level_encoder() -> LevelEncoder {
    Arc::new(|level: Level, enc: &mut dyn PrimitiveArrayEncoder| {
        enc.append_str(level.as_str());
    })
}

/// Writes the uppercase level name, e.g. `INFO`.
#[must_use]
pub fn capital_level_encoder() -> LevelEncoder {
    Arc::new(|level: Level, enc: &mut dyn PrimitiveArrayEncoder| {
        enc.append_str(level.as_capital_str());
    })
}

/// Writes `dir/file:line`.
#[must_use]
pub fn short_caller_encoder() -> CallerEncoder {
    Arc::new(|caller: &EntryCaller, enc: &mut dyn PrimitiveArrayEncoder| {
        enc.append_str(&caller.trimmed_path());
    })
}

/// Writes the full `path/to/file:line`.
#[must_use]
pub fn full_caller_encoder() -> CallerEncoder {
    Arc::new(|caller: &EntryCaller, enc: &mut dyn PrimitiveArrayEncoder| {
        enc.append_str(&caller.full_path());
    })
}

/// Error returned when a format name is not recognised.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unrecognised {kind} format {name:?}")]
pub struct ParseFormatError {
    kind: &'static str,
    name: String,
}

/// Stock level renderers selectable by name.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelFormat {
    /// [`lowercase_level_encoder`].
    Lowercase,
    /// [`capital_level_encoder`].
    Capital,
}

impl LevelFormat {
    /// Returns the matching level renderer.
    #[must_use]
    pub fn encoder(self) -> LevelEncoder {
        match self {
            Self::Lowercase => lowercase_level_encoder(),
            Self::Capital => capital_level_encoder(),
        }
    }
}

impl FromStr for LevelFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lowercase" => Ok(Self::Lowercase),
            "capital" => Ok(Self::Capital),
            other => Err(ParseFormatError {
                kind: "level",
                name: other.to_owned(),
            }),
        }
    }
}

/// Stock call site renderers selectable by name.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallerFormat {
    /// [`short_caller_encoder`].
    #[default]
    Short,
    /// [`full_caller_encoder`].
    Full,
}

impl CallerFormat {
    /// Returns the matching call site renderer.
    #[must_use]
    pub fn encoder(self) -> CallerEncoder {
        match self {
            Self::Short => short_caller_encoder(),
            Self::Full => full_caller_encoder(),
        }
    }
}

impl FromStr for CallerFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(Self::Short),
            "full" => Ok(Self::Full),
            other => Err(ParseFormatError {
                kind: "caller",
                name: other.to_owned(),
            }),
        }
    }
}

/// Declarative encoder options, loadable with `serde`.
///
/// Keys use camelCase (`lineEnding`, `skipLineEnding`, `functionKey`,
/// `stacktraceKey`, `levelEncoder`, `callerEncoder`); every key is optional.
///
/// ```
/// use human::{EncoderSettings, LevelFormat};
///
/// let settings: EncoderSettings = serde_json::from_str(
///     r#"{"levelEncoder": "capital", "stacktraceKey": "stack"}"#,
/// ).unwrap();
/// assert_eq!(settings.level_encoder, Some(LevelFormat::Capital));
///
/// let config = settings.build();
/// assert_eq!(config.stacktrace_key, "stack");
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EncoderSettings {
    /// See [`EncoderConfig::line_ending`].
    pub line_ending: Option<String>,
    /// See [`EncoderConfig::skip_line_ending`].
    pub skip_line_ending: bool,
    /// See [`EncoderConfig::function_key`].
    pub function_key: String,
    /// See [`EncoderConfig::stacktrace_key`].
    pub stacktrace_key: String,
    /// Level renderer by name; the level is omitted when absent.
    pub level_encoder: Option<LevelFormat>,
    /// Call site renderer by name.
    pub caller_encoder: CallerFormat,
}

impl EncoderSettings {
    /// Converts the settings into an [`EncoderConfig`].
    #[must_use]
    pub fn build(&self) -> EncoderConfig {
        let mut config = EncoderConfig::new()
            .with_skip_line_ending(self.skip_line_ending)
            .with_function_key(self.function_key.clone())
            .with_stacktrace_key(self.stacktrace_key.clone())
            .with_caller_encoder(self.caller_encoder.encoder());
        if let Some(line_ending) = &self.line_ending {
            config = config.with_line_ending(line_ending.clone());
        }
        if let Some(level) = self.level_encoder {
            config = config.with_level_encoder(level.encoder());
        }
        config
    }
}
