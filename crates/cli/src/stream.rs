//! Line-by-line rendering of one input stream.

use std::io::{BufRead, Write};
use std::path::Path;

use human::Encoder;

use crate::error::CliError;
use crate::record::{MetadataKeys, parse_record};

/// Counts gathered while rendering one input.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct StreamStats {
    /// Lines rendered as records.
    pub(crate) records: usize,
    /// Records whose fields failed to encode; their output is still written.
    pub(crate) degraded: usize,
    /// Lines echoed unchanged because they are not JSON objects.
    pub(crate) passthrough: usize,
}

/// Re-renders JSON log lines through an encoder.
pub(crate) struct Renderer {
    encoder: Box<dyn Encoder>,
    keys: MetadataKeys,
}

impl Renderer {
    pub(crate) fn new(encoder: Box<dyn Encoder>, keys: MetadataKeys) -> Self {
        Self { encoder, keys }
    }

    /// Renders every line of `input` into `out`.
    ///
    /// Lines that are not JSON objects, including lines that are not UTF-8,
    /// are copied through followed by a newline.
    pub(crate) fn render<R, W>(
        &self,
        path: &Path,
        mut input: R,
        out: &mut W,
    ) -> Result<StreamStats, CliError>
    where
        R: BufRead,
        W: Write + ?Sized,
    {
        let mut stats = StreamStats::default();
        let mut line = Vec::new();

        loop {
            line.clear();
            let read = input
                .read_until(b'\n', &mut line)
                .map_err(|source| CliError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
            if read == 0 {
                break;
            }

            let text = strip_line_ending(&line);
            let record = std::str::from_utf8(text)
                .ok()
                .and_then(|text| parse_record(text, &self.keys));

            match record {
                Some((entry, fields)) => {
                    stats.records += 1;
                    let output = match self.encoder.encode_entry(&entry, &fields) {
                        Ok(output) => output,
                        Err(error) => {
                            stats.degraded += 1;
                            tracing::warn!(
                                target: "human_log::stream",
                                path = %path.display(),
                                error = %error.error(),
                                "record rendered with field errors"
                            );
                            error.into_output()
                        }
                    };
                    out.write_all(output.as_bytes()).map_err(CliError::Write)?;
                }
                None => {
                    stats.passthrough += 1;
                    out.write_all(text).map_err(CliError::Write)?;
                    out.write_all(b"\n").map_err(CliError::Write)?;
                }
            }
        }

        tracing::debug!(
            target: "human_log::stream",
            path = %path.display(),
            records = stats.records,
            degraded = stats.degraded,
            passthrough = stats.passthrough,
            "input rendered"
        );
        Ok(stats)
    }
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use human::{EncoderConfig, HumanEncoder};
    use std::io::Cursor;

    const LEADER: &str = "                                      \t";

    fn renderer(config: EncoderConfig) -> Renderer {
        Renderer::new(Box::new(HumanEncoder::new(config)), MetadataKeys::default())
    }

    fn render(renderer: &Renderer, input: &[u8]) -> (String, StreamStats) {
        let mut out = Vec::new();
        let stats = renderer
            .render(Path::new("-"), Cursor::new(input), &mut out)
            .expect("renders");
        (String::from_utf8(out).expect("utf-8"), stats)
    }

    #[test]
    fn records_and_plain_lines_interleave() {
        let renderer = renderer(EncoderConfig::new());
        let (text, stats) = render(
            &renderer,
            b"starting up\r\n{\"ts\":0,\"msg\":\"ready\",\"port\":8080}\nbye",
        );
        assert_eq!(
            text,
            format!("starting up\n1970-01-01T00:00:00Z \tready\n{LEADER}port: 8080\n\nbye\n")
        );
        assert_eq!(
            stats,
            StreamStats {
                records: 1,
                degraded: 0,
                passthrough: 2,
            }
        );
    }

    #[test]
    fn skipped_line_ending_still_separates_records() {
        let renderer = renderer(
            EncoderConfig::new()
                .with_line_ending("--\n")
                .with_skip_line_ending(true),
        );
        let (text, _) = render(&renderer, b"{\"ts\":0,\"msg\":\"a\"}\n{\"ts\":0,\"msg\":\"b\"}\n");
        assert_eq!(
            text,
            "1970-01-01T00:00:00Z \ta\n\n1970-01-01T00:00:00Z \tb\n\n"
        );
    }

    #[test]
    fn invalid_utf8_is_echoed() {
        let renderer = renderer(EncoderConfig::new());
        let mut out = Vec::new();
        let stats = renderer
            .render(Path::new("-"), Cursor::new(&b"\xff\xfe\n"[..]), &mut out)
            .expect("renders");
        assert_eq!(out, b"\xff\xfe\n");
        assert_eq!(stats.passthrough, 1);
    }

    #[test]
    fn empty_input_renders_nothing() {
        let renderer = renderer(EncoderConfig::new());
        let (text, stats) = render(&renderer, b"");
        assert!(text.is_empty());
        assert_eq!(stats, StreamStats::default());
    }

    #[test]
    fn strip_line_ending_handles_crlf_and_bare_lines() {
        assert_eq!(strip_line_ending(b"a\r\n"), b"a");
        assert_eq!(strip_line_ending(b"a\n"), b"a");
        assert_eq!(strip_line_ending(b"a"), b"a");
        assert_eq!(strip_line_ending(b"\r"), b"");
    }
}
