//! Log line formatting
//!
//! Wire format shared by the console and the persistent ring buffer:
//!
//! ```text
//! [<seconds:6>.<microseconds:06>][<core>] <message>
//! ```
//!
//! Seconds are right-aligned in six columns, microseconds zero-padded.
//! Consumers of the ring buffer parse this format, so it must not change.

use core::fmt::{self, Write};

use heapless::String;

/// Maximum formatted message length (bytes, excluding terminator)
pub const LOG_MAX_MSG_LEN: usize = 255;

/// Maximum stored line length (bytes, excluding terminator)
pub const LOG_LINE_MAX: usize = 254;

/// Timestamp prefix length upper bound
pub const TIMESTAMP_MAX: usize = 32;

/// Formatted message text
pub type LogText = String<LOG_MAX_MSG_LEN>;

/// Formatted timestamp prefix
pub type Timestamp = String<TIMESTAMP_MAX>;

/// Stored log line
pub type LogLine = String<LOG_LINE_MAX>;

/// `fmt::Write` adapter that keeps whatever fits and drops the rest.
///
/// Truncation happens on a character boundary.
pub struct Truncating<'a, const N: usize>(pub &'a mut String<N>);

impl<const N: usize> Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.0.push(ch).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Render a message, capped at [`LOG_MAX_MSG_LEN`], with one trailing
/// newline removed.
pub fn format_message(args: fmt::Arguments<'_>) -> LogText {
    let mut text = LogText::new();
    let _ = Truncating(&mut text).write_fmt(args);
    if text.ends_with('\n') {
        text.pop();
    }
    text
}

/// Timestamp prefix for a monotonic time and core number.
pub fn timestamp(now_us: u64, core: u8) -> Timestamp {
    let mut stamp = Timestamp::new();
    let _ = write!(
        stamp,
        "[{:6}.{:06}][{}]",
        now_us / 1_000_000,
        now_us % 1_000_000,
        core
    );
    stamp
}

/// Line as stored in the ring buffer: timestamp, space, message, capped at
/// [`LOG_LINE_MAX`] bytes.
pub fn format_line(stamp: &str, message: &str) -> LogLine {
    let mut line = LogLine::new();
    let _ = write!(Truncating(&mut line), "{} {}", stamp, message);
    line
}
