//! Debounce/delay buffer
//!
//! Holds a detected-but-uncommitted transition until `transition_delay`
//! has elapsed since it was first seen. The buffer is level-triggered and
//! not retriggerable: once armed it keeps its original detection time
//! until it is cleared by a commit, a cancel, or a reset.

/// A pending detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Tick time the exit condition was first detected
    pub first_time: f64,
    /// Index of the transition rule that fired
    pub rule: usize,
}

/// Single-slot countdown buffer for one pending transition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DebounceBuffer {
    pending: Option<Detection>,
}

impl DebounceBuffer {
    /// Creates an empty (idle) buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Arms the buffer with a detection at `time` for `rule`.
    ///
    /// Returns `false` and leaves the existing detection untouched if the
    /// buffer is already armed.
    pub fn arm(&mut self, time: f64, rule: usize) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(Detection {
            first_time: time,
            rule,
        });
        true
    }

    /// Returns whether a detection is pending.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the pending detection, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<Detection> {
        self.pending
    }

    /// Returns when the pending detection was first seen.
    #[must_use]
    pub fn first_detection_time(&self) -> Option<f64> {
        self.pending.map(|d| d.first_time)
    }

    /// Returns the pending detection once `delay` has elapsed at `now`.
    ///
    /// A zero delay is ready on the same tick it was armed.
    #[must_use]
    pub fn ready(&self, now: f64, delay: f64) -> Option<Detection> {
        self.pending.filter(|d| now - d.first_time >= delay)
    }

    /// Drops the pending detection, returning it.
    pub fn clear(&mut self) -> Option<Detection> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_idle() {
        let buffer = DebounceBuffer::new();
        assert!(!buffer.is_armed());
        assert_eq!(buffer.first_detection_time(), None);
        assert_eq!(buffer.ready(100.0, 0.0), None);
    }

    #[test]
    fn test_arm_then_wait_for_delay() {
        let mut buffer = DebounceBuffer::new();
        assert!(buffer.arm(2.0, 1));

        assert_eq!(buffer.ready(2.0, 0.1), None);
        assert_eq!(buffer.ready(2.05, 0.1), None);

        let ready = buffer.ready(2.1, 0.1).expect("delay elapsed");
        assert_eq!(ready.rule, 1);
        assert!((ready.first_time - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_delay_ready_immediately() {
        let mut buffer = DebounceBuffer::new();
        buffer.arm(3.0, 0);
        assert!(buffer.ready(3.0, 0.0).is_some());
    }

    #[test]
    fn test_arm_is_not_retriggerable() {
        let mut buffer = DebounceBuffer::new();
        assert!(buffer.arm(2.0, 0));
        assert!(!buffer.arm(2.04, 0));
        assert_eq!(buffer.first_detection_time(), Some(2.0));
    }

    #[test]
    fn test_clear_returns_detection() {
        let mut buffer = DebounceBuffer::new();
        buffer.arm(1.0, 2);
        let cleared = buffer.clear().expect("was armed");
        assert_eq!(cleared.rule, 2);
        assert!(!buffer.is_armed());
        assert!(buffer.clear().is_none());
    }
}
