//! CLI module
//!
//! Argument parsing and command handlers for the `jumpfsm` binary.

pub mod args;
pub mod commands;
