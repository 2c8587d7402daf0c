//! Crash-survivable log store
//!
//! [`PersistentMemoryBlock`] is a plain-integer `#[repr(C)]` struct meant to
//! be placed in RAM that the runtime does not zero on reset. It carries a
//! magic tag, the last saved wall-clock time, uptime counters and the log
//! ring buffer, all covered by a CRC32. [`PersistentLogStore`] is the only
//! accessor: it validates the block on open and keeps the CRC current after
//! every mutation.

use core::borrow::BorrowMut;
use core::{fmt, str};

use super::crc::Crc32Digest;
use super::line::LOG_LINE_MAX;
use super::ring_buffer::{RingBuffer, RingBufferError};

/// Magic tag ("BRKP")
pub const PERSISTENT_MAGIC: u32 = 0x4252_4B50;

/// Log ring buffer capacity in bytes
pub const LOG_BUFFER_SIZE: usize = 8192;

/// Wall-clock time as last saved by the clock collaborator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct SavedTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    /// Day of week, 0 = Sunday
    pub dotw: u8,
    pub hour: u8,
    pub min: u8,
    pub sec: u8,
}

impl SavedTime {
    /// True if the time was ever set (year 0 is never valid)
    pub fn is_set(&self) -> bool {
        self.year != 0
    }

    fn to_bytes(self) -> [u8; 8] {
        let year = self.year.to_le_bytes();
        [
            year[0], year[1], self.month, self.day, self.dotw, self.hour, self.min, self.sec,
        ]
    }
}

impl fmt::Display for SavedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.min, self.sec
        )
    }
}

/// Memory block surviving warm reset
///
/// No padding: every byte is covered by the CRC or is the CRC.
#[repr(C)]
pub struct PersistentMemoryBlock {
    id: u32,
    crc32: u32,
    uptime: u64,
    prev_uptime: u64,
    saved_time: SavedTime,
    log: RingBuffer<LOG_BUFFER_SIZE>,
}

impl PersistentMemoryBlock {
    /// All-zero block. Not valid until opened by a store.
    pub const fn zeroed() -> Self {
        Self {
            id: 0,
            crc32: 0,
            uptime: 0,
            prev_uptime: 0,
            saved_time: SavedTime {
                year: 0,
                month: 0,
                day: 0,
                dotw: 0,
                hour: 0,
                min: 0,
                sec: 0,
            },
            log: RingBuffer::new(),
        }
    }

    fn compute_crc(&self) -> u32 {
        let (cursors, data) = self.log.as_parts();
        let mut digest = Crc32Digest::new();
        digest
            .update_u32(self.id)
            .update_u64(self.uptime)
            .update_u64(self.prev_uptime)
            .update(&self.saved_time.to_bytes());
        for word in cursors {
            digest.update_u32(word);
        }
        digest.update(data);
        digest.finalize()
    }

    fn is_valid(&self) -> bool {
        self.id == PERSISTENT_MAGIC && self.crc32 == self.compute_crc() && self.log.is_consistent()
    }

    /// Reset in place; the block is too large to build on a small stack.
    fn reinitialize(&mut self) {
        self.id = PERSISTENT_MAGIC;
        self.uptime = 0;
        self.prev_uptime = 0;
        self.saved_time = SavedTime::default();
        self.log.wipe();
    }

    fn seal(&mut self) {
        self.crc32 = self.compute_crc();
    }
}

/// Result of validating the block at open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// Block was intact; its log and counters carried over
    Restored,
    /// Block failed validation and was re-created empty
    Reinitialized,
}

/// Validated accessor for a [`PersistentMemoryBlock`]
pub struct PersistentLogStore<B> {
    block: B,
    outcome: OpenOutcome,
}

impl<B: BorrowMut<PersistentMemoryBlock>> PersistentLogStore<B> {
    /// Validate the block and take ownership of it.
    ///
    /// An intact block moves its uptime into the previous-uptime counter and
    /// restarts the current uptime at zero. Anything else (bad magic, CRC
    /// mismatch, impossible ring cursors) re-creates the block.
    pub fn open(mut block: B) -> Self {
        let b = block.borrow_mut();
        let outcome = if b.is_valid() {
            b.prev_uptime = b.uptime;
            b.uptime = 0;
            OpenOutcome::Restored
        } else {
            b.reinitialize();
            OpenOutcome::Reinitialized
        };
        b.seal();

        Self { block, outcome }
    }

    pub fn outcome(&self) -> OpenOutcome {
        self.outcome
    }

    /// True if the block found at open could not be trusted
    pub fn previous_state_invalid(&self) -> bool {
        self.outcome == OpenOutcome::Reinitialized
    }

    /// Store a log line, evicting the oldest lines as needed.
    ///
    /// Lines longer than the stored-line cap are cut on a character
    /// boundary. Returns the number of evicted lines.
    pub fn append(&mut self, line: &str) -> Result<usize, RingBufferError> {
        let mut end = line.len().min(LOG_LINE_MAX);
        while !line.is_char_boundary(end) {
            end -= 1;
        }

        let mut record = [0u8; LOG_LINE_MAX + 1];
        record[..end].copy_from_slice(&line.as_bytes()[..end]);

        let block = self.block.borrow_mut();
        let evicted = block.log.push(&record[..=end])?;
        block.seal();
        Ok(evicted)
    }

    /// Update the uptime counter (microseconds).
    pub fn record_uptime(&mut self, uptime_us: u64) {
        let block = self.block.borrow_mut();
        block.uptime = uptime_us;
        block.seal();
    }

    /// Save the current wall-clock time.
    pub fn record_time(&mut self, time: SavedTime) {
        let block = self.block.borrow_mut();
        block.saved_time = time;
        block.seal();
    }

    /// Periodic refresh: uptime and, if known, wall-clock time.
    pub fn refresh(&mut self, uptime_us: u64, time: Option<SavedTime>) {
        let block = self.block.borrow_mut();
        block.uptime = uptime_us;
        if let Some(time) = time {
            block.saved_time = time;
        }
        block.seal();
    }

    /// Uptime of the current session (microseconds)
    pub fn uptime(&self) -> u64 {
        self.block.borrow().uptime
    }

    /// Uptime of the previous session, zero after re-initialization
    pub fn prev_uptime(&self) -> u64 {
        self.block.borrow().prev_uptime
    }

    /// Last saved wall-clock time, if one was ever saved
    pub fn saved_time(&self) -> Option<SavedTime> {
        let time = self.block.borrow().saved_time;
        time.is_set().then_some(time)
    }

    /// Number of stored lines
    pub fn line_count(&self) -> usize {
        self.block.borrow().log.len()
    }

    /// Stored lines, oldest first
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.block.borrow().log.records().map(|record| {
            let text = record.strip_suffix(&[0]).unwrap_or(record);
            str::from_utf8(text).unwrap_or("<corrupted>")
        })
    }

    /// Drop all stored lines.
    pub fn clear(&mut self) {
        let block = self.block.borrow_mut();
        block.log.clear();
        block.seal();
    }

    /// Re-check magic, CRC and cursors against the live block.
    pub fn verify(&self) -> bool {
        self.block.borrow().is_valid()
    }

    pub fn into_inner(self) -> B {
        self.block
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::boxed::Box;
    use std::format;
    use std::string::String;
    use std::vec::Vec;

    fn fresh_block() -> Box<PersistentMemoryBlock> {
        Box::new(PersistentMemoryBlock::zeroed())
    }

    fn bytes_mut(block: &mut PersistentMemoryBlock) -> &mut [u8] {
        // SAFETY: plain integers, no padding
        unsafe {
            core::slice::from_raw_parts_mut(
                block as *mut PersistentMemoryBlock as *mut u8,
                core::mem::size_of::<PersistentMemoryBlock>(),
            )
        }
    }

    #[test]
    fn test_block_has_no_padding() {
        let fields = 4 + 4 + 8 + 8 + 8 + (16 + LOG_BUFFER_SIZE);
        assert_eq!(core::mem::size_of::<PersistentMemoryBlock>(), fields);
    }

    #[test]
    fn test_zeroed_block_is_reinitialized() {
        let store = PersistentLogStore::open(fresh_block());

        assert_eq!(store.outcome(), OpenOutcome::Reinitialized);
        assert!(store.previous_state_invalid());
        assert_eq!(store.uptime(), 0);
        assert_eq!(store.prev_uptime(), 0);
        assert_eq!(store.saved_time(), None);
        assert_eq!(store.line_count(), 0);
        assert!(store.verify());
    }

    #[test]
    fn test_warm_boot_restores_lines_and_hands_over_uptime() {
        let mut store = PersistentLogStore::open(fresh_block());
        store.append("[     1.000000][0] boot").unwrap();
        store.append("[     2.000000][1] PWM Frequency: 1000 Hz").unwrap();
        let time = SavedTime {
            year: 2024,
            month: 5,
            day: 17,
            dotw: 5,
            hour: 12,
            min: 30,
            sec: 9,
        };
        store.refresh(90_000_000, Some(time));

        // Warm reset: same memory, new store
        let store = PersistentLogStore::open(store.into_inner());

        assert_eq!(store.outcome(), OpenOutcome::Restored);
        assert!(!store.previous_state_invalid());
        assert_eq!(store.prev_uptime(), 90_000_000);
        assert_eq!(store.uptime(), 0);
        assert_eq!(store.saved_time(), Some(time));
        assert_eq!(format!("{}", time), "2024-05-17 12:30:09");
        let lines: Vec<&str> = store.lines().collect();
        assert_eq!(
            lines,
            ["[     1.000000][0] boot", "[     2.000000][1] PWM Frequency: 1000 Hz"]
        );
        assert!(store.verify());
    }

    #[test]
    fn test_any_flipped_byte_self_heals() {
        let mut store = PersistentLogStore::open(fresh_block());
        store.append("alpha").unwrap();
        store.append("beta").unwrap();
        store.record_uptime(5_000_000);
        let mut block = store.into_inner();

        let size = core::mem::size_of::<PersistentMemoryBlock>();
        for offset in [0, 3, 4, 9, 17, 30, 33, 41, 48, 1000, size - 1] {
            bytes_mut(&mut block)[offset] ^= 0x20;
            assert!(!block.is_valid(), "corruption at {} not detected", offset);

            let store = PersistentLogStore::open(block);
            assert_eq!(store.outcome(), OpenOutcome::Reinitialized);
            assert_eq!(store.line_count(), 0);
            assert_eq!(store.prev_uptime(), 0);
            assert!(store.verify());

            // Rebuild the same content for the next offset
            let mut store = store;
            store.append("alpha").unwrap();
            store.append("beta").unwrap();
            store.record_uptime(5_000_000);
            block = store.into_inner();
        }
    }

    #[test]
    fn test_valid_crc_with_bad_cursors_is_rejected() {
        let mut store = PersistentLogStore::open(fresh_block());
        store.append("line").unwrap();
        let mut block = store.into_inner();

        // Count claims two records but only one exists; CRC resealed
        block.log = {
            let mut ring = RingBuffer::new();
            ring.push(b"line\0").unwrap();
            ring
        };
        let bytes = bytes_mut(&mut block);
        let count_offset = 32 + 12;
        bytes[count_offset] = 2;
        block.seal();

        let store = PersistentLogStore::open(block);
        assert_eq!(store.outcome(), OpenOutcome::Reinitialized);
    }

    #[test]
    fn test_wrap_keeps_whole_lines_and_valid_crc() {
        let mut store = PersistentLogStore::open(fresh_block());
        let mut evicted_total = 0;
        for i in 0..2000 {
            let line = format!("[{:6}.{:06}][{}] line number {}", i, i * 7, i % 2, i);
            evicted_total += store.append(&line).unwrap();
            assert!(store.verify());
        }
        assert!(evicted_total > 0);
        assert_eq!(store.line_count() + evicted_total, 2000);

        let lines: Vec<&str> = store.lines().collect();
        let first = 2000 - lines.len();
        for (n, line) in lines.iter().enumerate() {
            assert!(line.ends_with(&format!("line number {}", first + n)), "{}", line);
        }
    }

    #[test]
    fn test_long_line_is_capped() {
        let mut store = PersistentLogStore::open(fresh_block());
        let long: String = "é".repeat(200);
        store.append(&long).unwrap();

        let stored = store.lines().next().unwrap();
        assert!(stored.len() <= LOG_LINE_MAX);
        assert_eq!(stored.len(), 254);
        assert!(long.starts_with(stored));
    }

    #[test]
    fn test_clear_drops_lines_keeps_counters() {
        let mut store = PersistentLogStore::open(fresh_block());
        store.append("x").unwrap();
        store.record_uptime(42);
        store.clear();

        assert_eq!(store.line_count(), 0);
        assert_eq!(store.uptime(), 42);
        assert!(store.verify());
    }
}
