//! Crash-survivable logging
//!
//! - [`priority`]: syslog priorities and facilities
//! - [`line`]: message, timestamp and stored-line formatting
//! - [`ring_buffer`]: length-prefixed record ring
//! - [`crc`]: CRC32 for the persistent block
//! - [`persistent`]: the warm-reset-surviving block and its store
//! - [`logger`]: the facade both cores log through

pub mod crc;
pub mod line;
pub mod logger;
pub mod persistent;
pub mod priority;
pub mod ring_buffer;

pub use line::{LOG_LINE_MAX, LOG_MAX_MSG_LEN};
pub use logger::{ConsoleSink, LogPersistence, Logger, RemoteSink};
pub use persistent::{
    OpenOutcome, PersistentLogStore, PersistentMemoryBlock, SavedTime, LOG_BUFFER_SIZE,
    PERSISTENT_MAGIC,
};
pub use priority::{LogFacility, LogPriority};
pub use ring_buffer::{RingBuffer, RingBufferError};
