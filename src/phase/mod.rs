//! Phase engine
//!
//! Implements the jumping phase state machine (balance, crouch, flight,
//! land). Transitions are inferred from elapsed time or live contact
//! sensing, debounced, and recovered when the timeline resets.
//!
//! # Architecture
//!
//! - [`contact`]: Contact report to active contact count
//! - [`guard`]: Raw exit predicates and new-detection filtering
//! - [`debounce`]: Armed detection held for the transition delay
//! - [`table`]: Data-driven transition rules
//! - [`PhaseEngine`]: Per-tick orchestration and timeline recovery
//! - [`PhaseReader`]: Read-only view of the committed phase

pub mod contact;
pub mod debounce;
pub mod engine;
pub mod guard;
pub mod output;
pub mod state;
pub mod table;

pub use contact::{ContactReport, ContactSource, DEFAULT_FORCE_THRESHOLD};
pub use engine::{EngineConfig, PhaseEngine, PhaseObserver, TickOutcome};
pub use guard::{GuardSource, detect_guard_condition};
pub use output::PhaseReader;
pub use state::{MachineState, Phase, PhaseTransition, TickInput, TimelineReset};
pub use table::{DelayPolicy, TransitionRule, TransitionTable};
