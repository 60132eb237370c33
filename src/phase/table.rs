//! Transition table
//!
//! Phase exits are data: each rule names a source phase, a target phase,
//! the guard that detects the exit, and whether detections go through the
//! debounce buffer. The engine evaluates rules generically, so adding a
//! phase is a table change.

use crate::error::PhaseError;

use super::engine::EngineConfig;
use super::guard::GuardSource;
use super::state::Phase;

/// How a raw guard hit becomes a committed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayPolicy {
    /// Commit on the first tick the raw condition holds. No buffer window,
    /// no delay.
    Immediate,
    /// Filter through the guard evaluator, then wait out the configured
    /// transition delay.
    Debounced,
}

/// One outgoing edge of the phase graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionRule {
    /// Phase this rule applies in
    pub from: Phase,
    /// Phase entered when the rule commits
    pub to: Phase,
    /// Raw exit predicate
    pub guard: GuardSource,
    /// Debounce behavior
    pub policy: DelayPolicy,
}

/// Ordered list of transition rules.
///
/// Rules for the same source phase are evaluated in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionTable {
    rules: Vec<TransitionRule>,
}

impl TransitionTable {
    /// Builds a table from explicit rules.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError::InvalidTransition`] if any rule does not move
    /// strictly forward in the phase order.
    pub fn new(rules: Vec<TransitionRule>) -> Result<Self, PhaseError> {
        if let Some(bad) = rules.iter().find(|r| r.to <= r.from) {
            return Err(PhaseError::InvalidTransition {
                from: bad.from.to_string(),
                to: bad.to.to_string(),
            });
        }
        Ok(Self { rules })
    }

    /// Builds the balance → crouch → flight → land table.
    ///
    /// Balance always exits on its scheduled time, immediately. The crouch
    /// and flight exits use contact guards in contact-based mode and
    /// scheduled times otherwise, and are always debounced.
    #[must_use]
    pub fn jumping(config: &EngineConfig) -> Self {
        let [balance_exit, crouch_exit, flight_exit] = config.transition_times;
        let (takeoff, touchdown) = if config.contact_based {
            (GuardSource::ContactsEnded, GuardSource::ContactsResumed)
        } else {
            (
                GuardSource::ScheduledTime { after: crouch_exit },
                GuardSource::ScheduledTime { after: flight_exit },
            )
        };

        Self {
            rules: vec![
                TransitionRule {
                    from: Phase::Balance,
                    to: Phase::Crouch,
                    guard: GuardSource::ScheduledTime {
                        after: balance_exit,
                    },
                    policy: DelayPolicy::Immediate,
                },
                TransitionRule {
                    from: Phase::Crouch,
                    to: Phase::Flight,
                    guard: takeoff,
                    policy: DelayPolicy::Debounced,
                },
                TransitionRule {
                    from: Phase::Flight,
                    to: Phase::Land,
                    guard: touchdown,
                    policy: DelayPolicy::Debounced,
                },
            ],
        }
    }

    /// Iterates `(index, rule)` pairs that apply in `phase`.
    pub fn rules_from(&self, phase: Phase) -> impl Iterator<Item = (usize, &TransitionRule)> {
        self.rules
            .iter()
            .enumerate()
            .filter(move |(_, rule)| rule.from == phase)
    }

    /// Returns the rule at `index`.
    #[must_use]
    pub fn rule(&self, index: usize) -> Option<&TransitionRule> {
        self.rules.get(index)
    }

    /// Returns whether `phase` has no outgoing rules.
    #[must_use]
    pub fn is_terminal(&self, phase: Phase) -> bool {
        self.rules_from(phase).next().is_none()
    }

    /// Returns whether any rule reads the contact signal.
    #[must_use]
    pub fn uses_contacts(&self) -> bool {
        self.rules.iter().any(|r| r.guard.uses_contacts())
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns whether the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
