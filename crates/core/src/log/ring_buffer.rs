//! Byte ring buffer of variable-length records
//!
//! Plain-integer layout (`#[repr(C)]`, no pointers) so it can live inside
//! the persistent memory block and be checksummed byte for byte.
//!
//! ## Record layout
//!
//! ```text
//! +--------+--------+-----------------------+
//! | len lo | len hi | payload (len bytes)   |
//! +--------+--------+-----------------------+
//! ```
//!
//! Records are stored contiguously. When a record does not fit before the
//! end of the buffer, the gap is skipped: a zero length prefix marks it (or,
//! if fewer than two bytes remain, the gap is implied) and the record starts
//! at offset 0. Eviction always removes whole records, oldest first.

use core::fmt;

/// Length prefix size in bytes
pub const RECORD_HEADER: usize = 2;

/// Ring buffer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingBufferError {
    /// Record larger than the whole buffer (or than a length prefix can hold)
    RecordTooLarge(usize),
    /// Empty records are not storable (zero length marks a gap)
    EmptyRecord,
}

impl fmt::Display for RingBufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingBufferError::RecordTooLarge(len) => write!(f, "record of {} bytes too large", len),
            RingBufferError::EmptyRecord => write!(f, "empty record"),
        }
    }
}

/// Fixed-capacity ring of length-prefixed records
#[derive(Clone, PartialEq, Eq)]
#[repr(C)]
pub struct RingBuffer<const N: usize> {
    head: u32,
    tail: u32,
    used: u32,
    count: u32,
    data: [u8; N],
}

impl<const N: usize> RingBuffer<N> {
    /// Empty buffer
    pub const fn new() -> Self {
        Self {
            head: 0,
            tail: 0,
            used: 0,
            count: 0,
            data: [0; N],
        }
    }

    /// Capacity in bytes
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.count as usize
    }

    /// True if no records are stored
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Bytes in use, including prefixes and skipped gaps
    pub fn used(&self) -> usize {
        self.used as usize
    }

    /// Drop every record
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.used = 0;
        self.count = 0;
    }

    /// Drop every record and zero the storage
    pub fn wipe(&mut self) {
        self.clear();
        self.data.fill(0);
    }

    /// Check cursor invariants (used after restoring from raw memory).
    pub fn is_consistent(&self) -> bool {
        let (head, tail, used) = (self.head as usize, self.tail as usize, self.used as usize);
        if head >= N.max(1) || tail >= N.max(1) || used > N {
            return false;
        }
        if self.count == 0 {
            return head == 0 && tail == 0 && used == 0;
        }

        // Walk the records and check they cover exactly [head, tail)
        let mut pos = head;
        let mut covered = 0;
        for _ in 0..self.count {
            let Some((start, len)) = record_at(&self.data, pos) else {
                return false;
            };
            covered += (start + N - pos) % N + RECORD_HEADER + len;
            pos = (start + RECORD_HEADER + len) % N;
            if covered > used {
                return false;
            }
        }
        covered == used && pos == tail
    }

    /// Append a record, evicting the oldest records until it fits.
    ///
    /// Returns the number of records evicted.
    pub fn push(&mut self, record: &[u8]) -> Result<usize, RingBufferError> {
        let len = record.len();
        if len == 0 {
            return Err(RingBufferError::EmptyRecord);
        }
        let size = RECORD_HEADER + len;
        if size > N || len > u16::MAX as usize {
            return Err(RingBufferError::RecordTooLarge(len));
        }

        let mut evicted = 0;
        let gap = loop {
            let tail = self.tail as usize;
            let gap = if N - tail < size { N - tail } else { 0 };
            if N - (self.used as usize) >= gap + size {
                break gap;
            }
            self.evict_oldest();
            evicted += 1;
        };

        if gap > 0 {
            if gap >= RECORD_HEADER {
                let tail = self.tail as usize;
                self.data[tail..tail + RECORD_HEADER].fill(0);
            }
            self.used += gap as u32;
            self.tail = 0;
        }

        let tail = self.tail as usize;
        self.data[tail..tail + RECORD_HEADER].copy_from_slice(&(len as u16).to_le_bytes());
        self.data[tail + RECORD_HEADER..tail + size].copy_from_slice(record);
        self.tail = ((tail + size) % N) as u32;
        self.used += size as u32;
        self.count += 1;

        Ok(evicted)
    }

    /// Remove the oldest record; returns false if the buffer was empty.
    pub fn pop(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.evict_oldest();
        true
    }

    /// Records, oldest first
    pub fn records(&self) -> Records<'_, N> {
        Records {
            ring: self,
            pos: self.head as usize,
            remaining: self.count as usize,
        }
    }

    /// Raw cursor words and data, in layout order, for checksumming
    pub fn as_parts(&self) -> ([u32; 4], &[u8]) {
        ([self.head, self.tail, self.used, self.count], &self.data)
    }

    fn evict_oldest(&mut self) {
        let Some((start, len)) = record_at(&self.data, self.head as usize) else {
            self.clear();
            return;
        };

        self.count -= 1;
        if self.count == 0 {
            self.clear();
            return;
        }

        // Keep head on a record start so a trailing gap is released with
        // the record in front of it
        let next = (start + RECORD_HEADER + len) % N;
        let Some((next_start, _)) = record_at(&self.data, next) else {
            self.clear();
            return;
        };
        let skipped = (next_start + N - next) % N;
        self.used -= (RECORD_HEADER + len + skipped) as u32;
        self.head = next_start as u32;
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for RingBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("used", &self.used)
            .field("count", &self.count)
            .finish()
    }
}

/// Locate the record starting at `pos`, skipping a gap at the end.
///
/// Returns the offset of its length prefix and its payload length.
fn record_at(data: &[u8], mut pos: usize) -> Option<(usize, usize)> {
    let n = data.len();
    for _ in 0..2 {
        if n - pos < RECORD_HEADER {
            pos = 0;
            continue;
        }
        let len = u16::from_le_bytes([data[pos], data[pos + 1]]) as usize;
        if len == 0 {
            pos = 0;
            continue;
        }
        if pos + RECORD_HEADER + len > n {
            return None;
        }
        return Some((pos, len));
    }
    None
}

/// Iterator over stored records, oldest first
pub struct Records<'a, const N: usize> {
    ring: &'a RingBuffer<N>,
    pos: usize,
    remaining: usize,
}

impl<'a, const N: usize> Iterator for Records<'a, N> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.pos >= N {
            return None;
        }
        let (start, len) = record_at(&self.ring.data, self.pos)?;
        self.remaining -= 1;
        self.pos = (start + RECORD_HEADER + len) % N;
        Some(&self.ring.data[start + RECORD_HEADER..start + RECORD_HEADER + len])
    }
}
