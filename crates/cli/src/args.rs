//! Command-line parsing.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::builder::{OsStringValueParser, PossibleValuesParser};
use clap::{Arg, ArgAction, Command};
use human::{CallerFormat, LevelFormat};

/// Program name used in help and diagnostics.
pub const PROGRAM_NAME: &str = "human-log";

/// Parsed command line.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct ParsedArgs {
    pub(crate) settings_file: Option<PathBuf>,
    pub(crate) level_format: Option<LevelFormat>,
    pub(crate) caller_format: Option<CallerFormat>,
    pub(crate) function_key: Option<String>,
    pub(crate) stacktrace_key: Option<String>,
    pub(crate) skip_line_ending: bool,
    pub(crate) verbose: bool,
    pub(crate) inputs: Vec<PathBuf>,
}

/// Builds the `clap` command used for parsing.
fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Re-render JSON-lines logs as indented, human-readable records.")
        .arg(
            Arg::new("settings")
                .long("settings")
                .value_name("FILE")
                .help("Load encoder settings from a JSON FILE; flags override it.")
                .value_parser(OsStringValueParser::new())
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("level-format")
                .long("level-format")
                .value_name("FORMAT")
                .help("Render levels as 'lowercase' or 'capital'; omitted by default.")
                .value_parser(PossibleValuesParser::new(["lowercase", "capital"]))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("caller-format")
                .long("caller-format")
                .value_name("FORMAT")
                .help("Render call sites as 'short' (dir/file:line) or 'full'.")
                .value_parser(PossibleValuesParser::new(["short", "full"]))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("function-key")
                .long("function-key")
                .value_name("KEY")
                .help("Read the caller's function from KEY and show it in the header.")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("stacktrace-key")
                .long("stacktrace-key")
                .value_name("KEY")
                .help("Read stack traces from KEY and render them as a field.")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("skip-line-ending")
                .long("skip-line-ending")
                .help("Write nothing after the blank line that ends each record.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Emit diagnostics about the renderer itself on stderr.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("inputs")
                .value_name("FILE")
                .help("Files to read; standard input when none or '-'.")
                .value_parser(OsStringValueParser::new())
                .action(ArgAction::Append),
        )
}

/// Parses `arguments`, the first of which is the program name.
pub(crate) fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let matches = clap_command().try_get_matches_from(arguments.into_iter().map(Into::into))?;

    // Both parsers only admit the names their `FromStr` accepts.
    let level_format = matches
        .get_one::<String>("level-format")
        .and_then(|name| name.parse().ok());
    let caller_format = matches
        .get_one::<String>("caller-format")
        .and_then(|name| name.parse().ok());

    Ok(ParsedArgs {
        settings_file: matches.get_one::<OsString>("settings").map(PathBuf::from),
        level_format,
        caller_format,
        function_key: matches.get_one::<String>("function-key").cloned(),
        stacktrace_key: matches.get_one::<String>("stacktrace-key").cloned(),
        skip_line_ending: matches.get_flag("skip-line-ending"),
        verbose: matches.get_flag("verbose"),
        inputs: matches
            .get_many::<OsString>("inputs")
            .map(|values| values.map(PathBuf::from).collect())
            .unwrap_or_default(),
    })
}
