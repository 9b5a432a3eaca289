//! CarePortal command-line shell.
//!
//! Plays the dashboard role: parses a command, drives the credential store,
//! use cases and secure action coordinator, and prints what they return.

pub mod cli;
pub mod logging;
pub mod shell;

pub use cli::{Cli, Command, SignupArgs};
pub use shell::{Portal, run};
