//! Phase output
//!
//! The committed phase is published on a `tokio::sync::watch` channel.
//! The engine holds the only sender; any number of [`PhaseReader`]s can
//! observe the latest value without being able to change it.

use tokio::sync::watch;

use super::state::Phase;

/// Write side of the phase signal, owned by the engine.
#[derive(Debug)]
pub(crate) struct PhasePublisher {
    tx: watch::Sender<Phase>,
}

impl PhasePublisher {
    pub(crate) fn new(initial: Phase) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Publishes `phase`, waking readers only if it changed.
    pub(crate) fn publish(&self, phase: Phase) {
        self.tx.send_if_modified(|current| {
            if *current == phase {
                false
            } else {
                *current = phase;
                true
            }
        });
    }

    pub(crate) fn subscribe(&self) -> PhaseReader {
        PhaseReader {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read-only view of the committed phase.
///
/// Reads are side-effect free and return the phase as of the most recent
/// completed tick.
#[derive(Debug, Clone)]
pub struct PhaseReader {
    rx: watch::Receiver<Phase>,
}

impl PhaseReader {
    /// Returns the latest committed phase.
    #[must_use]
    pub fn current(&self) -> Phase {
        *self.rx.borrow()
    }

    /// Returns the latest committed phase as its scalar identifier (0-3).
    #[must_use]
    pub fn scalar(&self) -> u8 {
        self.current().index()
    }

    /// Waits until the phase changes and returns the new value.
    ///
    /// Returns `None` once the engine has been dropped.
    pub async fn changed(&mut self) -> Option<Phase> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_sees_initial_phase() {
        let publisher = PhasePublisher::new(Phase::Crouch);
        let reader = publisher.subscribe();
        assert_eq!(reader.current(), Phase::Crouch);
        assert_eq!(reader.scalar(), 1);
    }

    #[test]
    fn test_reads_are_idempotent() {
        let publisher = PhasePublisher::new(Phase::Balance);
        let reader = publisher.subscribe();
        publisher.publish(Phase::Flight);
        for _ in 0..5 {
            assert_eq!(reader.current(), Phase::Flight);
        }
    }

    #[test]
    fn test_many_readers() {
        let publisher = PhasePublisher::new(Phase::Balance);
        let a = publisher.subscribe();
        let b = a.clone();
        publisher.publish(Phase::Land);
        assert_eq!(a.current(), Phase::Land);
        assert_eq!(b.current(), Phase::Land);
    }

    #[tokio::test]
    async fn test_changed_wakes_on_new_phase() {
        let publisher = PhasePublisher::new(Phase::Balance);
        let mut reader = publisher.subscribe();

        publisher.publish(Phase::Balance);
        publisher.publish(Phase::Crouch);

        assert_eq!(reader.changed().await, Some(Phase::Crouch));
    }

    #[tokio::test]
    async fn test_changed_none_after_drop() {
        let publisher = PhasePublisher::new(Phase::Balance);
        let mut reader = publisher.subscribe();
        drop(publisher);
        assert_eq!(reader.changed().await, None);
    }
}
