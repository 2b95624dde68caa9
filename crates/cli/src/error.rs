use std::io;
use std::path::PathBuf;

/// Failures that end a `human-log` run with exit code `1`.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// An input file could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File being read; `-` for standard input.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The encoder settings file could not be loaded.
    #[error("invalid encoder settings in {}: {source}", path.display())]
    Settings {
        /// Settings file.
        path: PathBuf,
        /// Parse or read failure.
        #[source]
        source: SettingsError,
    },

    /// The encoder could not be built from the registry.
    #[error("failed to build encoder: {0}")]
    Encoder(#[from] human::RegistryError),

    /// Rendered output could not be written.
    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),
}

/// Why a settings file was rejected.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The file could not be read.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The file is not a valid settings document.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
