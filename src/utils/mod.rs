//! Utility functions module
//!
//! This module contains utility functions for account name derivation,
//! table formatting, and HTTP client configuration.

pub mod format;
pub mod naming;
pub mod network;

pub use format::*;
pub use naming::*;
pub use network::*;
