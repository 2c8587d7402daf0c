//! Monotonic time abstraction.
//!
//! Every timing decision in the core (fade ramps, lock timeouts, log
//! timestamps) is taken against a monotonic microsecond counter, never
//! wall-clock time, so NTP adjustments cannot disturb a running fade.

use core::cell::Cell;

/// Monotonic time source.
///
/// - `EmbassyTime` (in the firmware crate) for embedded targets
/// - `MockTime` for host testing with controllable time
///
/// # Example
///
/// ```
/// use brickpico_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// time.advance(1_500);
/// assert_eq!(time.now_us(), 1_500);
/// assert_eq!(time.elapsed_since(500), 1_000);
/// ```
pub trait TimeSource: Clone + Send + Sync {
    /// Returns current time in milliseconds since boot.
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }

    /// Returns current time in microseconds since boot.
    fn now_us(&self) -> u64;

    /// Returns elapsed microseconds since a reference point.
    ///
    /// Uses saturating subtraction so a reference in the future yields 0.
    fn elapsed_since(&self, reference_us: u64) -> u64 {
        self.now_us().saturating_sub(reference_us)
    }
}

impl<T: TimeSource> TimeSource for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }

    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Mock time source with controllable advancement.
///
/// An optional step makes every `now_us()` read advance the clock, which
/// lets tests drive spin loops that wait on the clock to a bounded end.
#[derive(Clone, Default)]
pub struct MockTime {
    current_us: Cell<u64>,
    step_us: Cell<u64>,
}

// Safety: MockTime is only used in single-threaded test contexts
// where Cell is safe. The Send+Sync bounds on TimeSource trait
// are required for embedded contexts, but MockTime is not used there.
unsafe impl Send for MockTime {}
unsafe impl Sync for MockTime {}

impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `MockTime` starting at the specified time.
    pub fn with_initial(us: u64) -> Self {
        let time = Self::new();
        time.set(us);
        time
    }

    /// Creates a `MockTime` that advances by `step_us` after every read.
    pub fn with_step(step_us: u64) -> Self {
        let time = Self::new();
        time.step_us.set(step_us);
        time
    }

    /// Sets the current time to an absolute value.
    pub fn set(&self, us: u64) {
        self.current_us.set(us);
    }

    /// Advances the current time by the specified amount.
    pub fn advance(&self, us: u64) {
        self.current_us.set(self.current_us.get() + us);
    }
}

impl TimeSource for MockTime {
    fn now_us(&self) -> u64 {
        let now = self.current_us.get();
        self.current_us.set(now + self.step_us.get());
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_time_initial_value() {
        let time = MockTime::new();
        assert_eq!(time.now_us(), 0);
        assert_eq!(time.now_ms(), 0);
    }

    #[test]
    fn mock_time_with_initial() {
        let time = MockTime::with_initial(5_000_000);
        assert_eq!(time.now_us(), 5_000_000);
        assert_eq!(time.now_ms(), 5000);
    }

    #[test]
    fn mock_time_advance() {
        let time = MockTime::new();
        time.advance(500_000);
        assert_eq!(time.now_us(), 500_000);

        time.advance(500_000);
        assert_eq!(time.now_ms(), 1000);
    }

    #[test]
    fn mock_time_elapsed_since_saturates() {
        let time = MockTime::with_initial(1_000);
        assert_eq!(time.elapsed_since(300), 700);
        assert_eq!(time.elapsed_since(5_000), 0);
    }

    #[test]
    fn mock_time_step_advances_on_read() {
        let time = MockTime::with_step(10);
        assert_eq!(time.now_us(), 0);
        assert_eq!(time.now_us(), 10);
        assert_eq!(time.now_us(), 20);
    }
}
