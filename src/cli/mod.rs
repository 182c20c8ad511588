//! CLI module
//!
//! This module defines the command-line interface and command
//! execution.

pub mod commands;

pub use commands::*;
