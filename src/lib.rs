//! `jumpfsm` - Event-driven phase controller for legged-robot jumping
//!
//! This library provides the jumping phase state machine (balance, crouch,
//! flight, land), its YAML configuration surface, and a replay driver
//! that feeds recorded robot samples through it.

pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod observability;
pub mod phase;
