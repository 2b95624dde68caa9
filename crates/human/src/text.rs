//! crates/human/src/text.rs
//! Text layouts shared by the value renderer: hex dumps, durations, timestamps.

use std::fmt::Write as _;

use pool::Buffer;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

/// Bytes shown on one hex dump line.
pub(crate) const HEX_DUMP_WIDTH: usize = 16;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Writes one hex dump line for `chunk` (at most 16 bytes), without newline.
///
/// Layout: eight hex digits of offset, two spaces, sixteen `xx ` columns with
/// an extra space after the eighth, then the printable-ASCII gutter between
/// `|` bars. Short chunks are padded so the gutter stays aligned.
pub(crate) fn write_hex_dump_line(out: &mut Buffer, offset: usize, chunk: &[u8]) {
    debug_assert!(chunk.len() <= HEX_DUMP_WIDTH);
    let _ = write!(out, "{offset:08x}  ");

    for column in 0..HEX_DUMP_WIDTH {
        match chunk.get(column) {
            Some(&byte) => {
                out.append_byte(HEX_DIGITS[usize::from(byte >> 4)]);
                out.append_byte(HEX_DIGITS[usize::from(byte & 0x0f)]);
                out.append_byte(b' ');
            }
            None => out.append_str("   "),
        }
        if column == 7 {
            out.append_byte(b' ');
        }
    }

    out.append_str(" |");
    for &byte in chunk {
        out.append_byte(if (32..=126).contains(&byte) { byte } else { b'.' });
    }
    out.append_byte(b'|');
}

/// Writes `duration` as value-unit pairs: `1h2m3.5s`, `1.5ms`, `0s`.
///
/// Durations under one second use the largest of `ns`, `µs`, `ms` that keeps
/// the integer part non-zero; fractional digits are printed without trailing
/// zeros.
pub(crate) fn write_duration(out: &mut Buffer, duration: Duration) {
    const NANOS_PER_SECOND: u128 = 1_000_000_000;

    let nanos = duration.whole_nanoseconds();
    if nanos == 0 {
        out.append_str("0s");
        return;
    }

    let negative = nanos < 0;
    let mut remaining = nanos.unsigned_abs();
    let mut text = [0u8; 64];
    let mut w = text.len();

    if remaining < NANOS_PER_SECOND {
        let (unit, precision): (&str, usize) = if remaining < 1_000 {
            ("ns", 0)
        } else if remaining < 1_000_000 {
            ("µs", 3)
        } else {
            ("ms", 6)
        };
        w -= unit.len();
        text[w..w + unit.len()].copy_from_slice(unit.as_bytes());
        (w, remaining) = write_fraction(&mut text[..w], remaining, precision);
        w = write_integer(&mut text[..w], remaining);
    } else {
        w -= 1;
        text[w] = b's';
        (w, remaining) = write_fraction(&mut text[..w], remaining, 9);
        w = write_integer(&mut text[..w], remaining % 60);
        remaining /= 60;
        if remaining > 0 {
            w -= 1;
            text[w] = b'm';
            w = write_integer(&mut text[..w], remaining % 60);
            remaining /= 60;
            if remaining > 0 {
                w -= 1;
                text[w] = b'h';
                w = write_integer(&mut text[..w], remaining);
            }
        }
    }

    if negative {
        w -= 1;
        text[w] = b'-';
    }
    out.append_bytes(&text[w..]);
}

/// Writes the low `precision` decimal digits of `value` right-aligned into
/// `text`, dropping trailing zeros and the point when nothing remains.
/// Returns the new write position and `value` with those digits removed.
fn write_fraction(text: &mut [u8], mut value: u128, precision: usize) -> (usize, u128) {
    let mut w = text.len();
    let mut print = false;
    for _ in 0..precision {
        let digit = (value % 10) as u8;
        print = print || digit != 0;
        if print {
            w -= 1;
            text[w] = b'0' + digit;
        }
        value /= 10;
    }
    if print {
        w -= 1;
        text[w] = b'.';
    }
    (w, value)
}

fn write_integer(text: &mut [u8], mut value: u128) -> usize {
    let mut w = text.len();
    if value == 0 {
        w -= 1;
        text[w] = b'0';
        return w;
    }
    while value > 0 {
        w -= 1;
        text[w] = b'0' + (value % 10) as u8;
        value /= 10;
    }
    w
}

/// Writes `timestamp` as RFC 3339 with up to nine fractional digits,
/// trailing zeros dropped, `Z` for UTC.
///
/// Years outside `0000..=9999` and offsets with a seconds component have no
/// RFC 3339 spelling; those fall back to the `time` crate's display form.
pub(crate) fn write_rfc3339_nano(out: &mut Buffer, timestamp: OffsetDateTime) {
    match timestamp.format(&Rfc3339) {
        Ok(text) => out.append_str(&text),
        Err(_) => {
            let _ = write!(out, "{timestamp}");
        }
    }
}
