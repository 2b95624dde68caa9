#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` is the command-line front-end of `human-log`. It reads JSON-lines
//! logs, one record per line, from files or standard input and re-renders
//! each record through the `human` encoder. Lines that are not JSON objects
//! are copied through unchanged, so the tool can sit at the end of any
//! pipeline that mixes structured and plain output.
//!
//! # Design
//!
//! [`run`] and [`run_with_input`] accept the argument iterator together with
//! handles for standard output and error, which keeps every code path
//! testable without spawning a process. Encoder options come from an
//! optional JSON settings file (the `human::EncoderSettings` document) with
//! command-line flags layered on top. The encoder itself is obtained from the
//! process-wide encoder registry under the name `human`.
//!
//! Diagnostics about the renderer are emitted through `tracing`; a
//! `tracing-subscriber` formatter writing to standard error is installed on
//! the first run. `HUMAN_LOG` selects the filter, `--verbose` forces `debug`.
//!
//! # Invariants
//!
//! - Help and version output go to standard output with exit code `0`.
//! - Records whose fields fail to encode are still written in full; the
//!   failure is reported as a warning and does not change the exit code.
//! - Standard input is consumed at most once, however often `-` is named.
//!
//! # Errors
//!
//! Usage errors, unreadable inputs, invalid settings files, and write
//! failures are reported on standard error with exit code `1`.
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let input = &b"{\"ts\":0,\"msg\":\"ready\"}\n"[..];
//! let status = cli::run_with_input(["human-log"], input, &mut stdout, &mut stderr);
//!
//! assert_eq!(status, 0);
//! assert_eq!(stdout, b"1970-01-01T00:00:00Z \tready\n\n");
//! ```

mod args;
mod error;
mod record;
mod stream;

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use human::{EncoderSettings, HUMAN_ENCODER_NAME};
use pool::PoolSettings;
use tracing_subscriber::EnvFilter;

pub use args::PROGRAM_NAME;
pub use error::{CliError, SettingsError};

use args::{ParsedArgs, parse_args};
use record::MetadataKeys;
use stream::Renderer;

/// Environment variable holding the diagnostics filter.
pub const LOG_ENV: &str = "HUMAN_LOG";

/// Largest status representable as a process exit code.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// Runs the tool, reading standard input when no files are named.
///
/// Returns the process exit status; see [`exit_code_from`].
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    let stdin = io::stdin();
    run_with_input(arguments, stdin.lock(), stdout, stderr)
}

/// Runs the tool with `stdin` standing in for standard input.
pub fn run_with_input<I, S, In, Out, Err>(
    arguments: I,
    stdin: In,
    stdout: &mut Out,
    stderr: &mut Err,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    In: BufRead,
    Out: Write,
    Err: Write,
{
    let parsed = match parse_args(arguments) {
        Ok(parsed) => parsed,
        Err(error) => return report_usage(&error, stdout, stderr),
    };

    init_tracing(parsed.verbose);
    if let Err(error) = pool::init_global(PoolSettings::default()) {
        tracing::trace!(target: "human_log", %error, "keeping installed buffer pool");
    }

    match execute(parsed, stdin, stdout) {
        Ok(()) => 0,
        Err(error) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
            1
        }
    }
}

/// Maps a status returned by [`run`] onto a process exit code.
///
/// Values outside `0..=255` are clamped.
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    std::process::ExitCode::from(clamped as u8)
}

fn report_usage<Out, Err>(error: &clap::Error, stdout: &mut Out, stderr: &mut Err) -> i32
where
    Out: Write,
    Err: Write,
{
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = write!(stdout, "{}", error.render());
            0
        }
        _ => {
            let _ = write!(stderr, "{}", error.render());
            1
        }
    }
}

/// Installs the stderr formatter; a subscriber installed earlier wins.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn execute<In, Out>(parsed: ParsedArgs, stdin: In, stdout: &mut Out) -> Result<(), CliError>
where
    In: BufRead,
    Out: Write,
{
    let settings = encoder_settings(&parsed)?;
    let keys = metadata_keys(&settings);

    human::install();
    let encoder = human::registry().build(HUMAN_ENCODER_NAME, settings.build())?;
    let renderer = Renderer::new(encoder, keys);

    let inputs = if parsed.inputs.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        parsed.inputs
    };

    let mut stdin = Some(stdin);
    for path in &inputs {
        if path.as_os_str() == "-" {
            match stdin.take() {
                Some(input) => {
                    renderer.render(path, input, stdout)?;
                }
                None => {
                    tracing::debug!(target: "human_log", "standard input already consumed");
                }
            }
        } else {
            let file = File::open(path).map_err(|source| CliError::Read {
                path: path.clone(),
                source,
            })?;
            renderer.render(path, BufReader::new(file), stdout)?;
        }
    }

    stdout.flush().map_err(CliError::Write)
}

/// Loads the settings file, if any, and applies flag overrides.
fn encoder_settings(parsed: &ParsedArgs) -> Result<EncoderSettings, CliError> {
    let mut settings = match &parsed.settings_file {
        Some(path) => load_settings(path)?,
        None => EncoderSettings::default(),
    };

    if let Some(format) = parsed.level_format {
        settings.level_encoder = Some(format);
    }
    if let Some(format) = parsed.caller_format {
        settings.caller_encoder = format;
    }
    if let Some(key) = &parsed.function_key {
        settings.function_key.clone_from(key);
    }
    if let Some(key) = &parsed.stacktrace_key {
        settings.stacktrace_key.clone_from(key);
    }
    if parsed.skip_line_ending {
        settings.skip_line_ending = true;
    }
    Ok(settings)
}

fn load_settings(path: &Path) -> Result<EncoderSettings, CliError> {
    let settings_error = |source: SettingsError| CliError::Settings {
        path: path.to_path_buf(),
        source,
    };
    let text = fs::read_to_string(path).map_err(|error| settings_error(error.into()))?;
    serde_json::from_str(&text).map_err(|error| settings_error(error.into()))
}

/// Input keys follow the configured output keys when those are set.
fn metadata_keys(settings: &EncoderSettings) -> MetadataKeys {
    let mut keys = MetadataKeys::default();
    if !settings.function_key.is_empty() {
        keys.function.clone_from(&settings.function_key);
    }
    if !settings.stacktrace_key.is_empty() {
        keys.stacktrace.clone_from(&settings.stacktrace_key);
    }
    keys
}
