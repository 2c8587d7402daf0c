//! defmt console sink
//!
//! Lines are rendered into a fixed buffer first: defmt prints preformatted
//! text, not `core::fmt` arguments.

use core::fmt::{self, Write};

use brickpico_core::log::line::Truncating;
use brickpico_core::log::ConsoleSink;
use heapless::String;

/// Console line buffer (timestamp plus a full-length message)
const CONSOLE_LINE_LEN: usize = 320;

/// Console output over defmt-rtt
#[derive(Clone, Copy, Default)]
pub struct DefmtConsole;

impl ConsoleSink for DefmtConsole {
    fn write_line(&self, args: fmt::Arguments<'_>) {
        let mut line = String::<CONSOLE_LINE_LEN>::new();
        let _ = Truncating(&mut line).write_fmt(args);
        defmt::println!("{=str}", line.as_str());
    }

    fn write(&self, args: fmt::Arguments<'_>) {
        let mut text = String::<CONSOLE_LINE_LEN>::new();
        let _ = Truncating(&mut text).write_fmt(args);
        defmt::print!("{=str}", text.as_str());
    }
}
