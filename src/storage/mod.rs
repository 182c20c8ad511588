//! Storage provisioning module
//!
//! This module provides functionality for provisioning Azure Storage
//! Accounts: name derivation glue, resource group and account
//! operations, and the provisioning sequence itself.

pub mod models;
pub mod operations;
pub mod provisioner;

pub use models::*;
pub use operations::*;
pub use provisioner::*;
