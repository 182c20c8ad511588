//! Authentication module for Azure services
//!
//! This module provides authentication capabilities for the Azure
//! management plane using the ambient DefaultAzureCredential chain or
//! an explicit client secret.

pub mod provider;

pub use provider::*;
