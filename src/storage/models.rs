//! Storage provisioning data models and types
//!
//! This module defines the data structures used for storage account
//! provisioning including account properties, replication SKUs, account
//! kinds, and request types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

use crate::error::ProvstoreError;

/// Storage account replication SKU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum AccountSku {
    #[serde(rename = "Standard_LRS")]
    #[value(name = "Standard_LRS", alias = "standard_lrs")]
    StandardLrs,
    #[serde(rename = "Standard_GRS")]
    #[value(name = "Standard_GRS", alias = "standard_grs")]
    StandardGrs,
    #[serde(rename = "Standard_RAGRS")]
    #[value(name = "Standard_RAGRS", alias = "standard_ragrs")]
    StandardRagrs,
    #[serde(rename = "Standard_ZRS")]
    #[value(name = "Standard_ZRS", alias = "standard_zrs")]
    StandardZrs,
    #[serde(rename = "Premium_LRS")]
    #[value(name = "Premium_LRS", alias = "premium_lrs")]
    PremiumLrs,
    #[serde(rename = "Premium_ZRS")]
    #[value(name = "Premium_ZRS", alias = "premium_zrs")]
    PremiumZrs,
    #[serde(rename = "Standard_GZRS")]
    #[value(name = "Standard_GZRS", alias = "standard_gzrs")]
    StandardGzrs,
    #[serde(rename = "Standard_RAGZRS")]
    #[value(name = "Standard_RAGZRS", alias = "standard_ragzrs")]
    StandardRagzrs,
}

impl AccountSku {
    /// ARM wire name for this SKU
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountSku::StandardLrs => "Standard_LRS",
            AccountSku::StandardGrs => "Standard_GRS",
            AccountSku::StandardRagrs => "Standard_RAGRS",
            AccountSku::StandardZrs => "Standard_ZRS",
            AccountSku::PremiumLrs => "Premium_LRS",
            AccountSku::PremiumZrs => "Premium_ZRS",
            AccountSku::StandardGzrs => "Standard_GZRS",
            AccountSku::StandardRagzrs => "Standard_RAGZRS",
        }
    }
}

impl Default for AccountSku {
    fn default() -> Self {
        AccountSku::StandardLrs
    }
}

impl fmt::Display for AccountSku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccountSku {
    type Err = ProvstoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard_lrs" => Ok(AccountSku::StandardLrs),
            "standard_grs" => Ok(AccountSku::StandardGrs),
            "standard_ragrs" => Ok(AccountSku::StandardRagrs),
            "standard_zrs" => Ok(AccountSku::StandardZrs),
            "premium_lrs" => Ok(AccountSku::PremiumLrs),
            "premium_zrs" => Ok(AccountSku::PremiumZrs),
            "standard_gzrs" => Ok(AccountSku::StandardGzrs),
            "standard_ragzrs" => Ok(AccountSku::StandardRagzrs),
            _ => Err(ProvstoreError::invalid_argument(format!(
                "Unknown storage SKU: {}",
                s
            ))),
        }
    }
}

/// Storage account kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum AccountKind {
    #[serde(rename = "Storage")]
    #[value(name = "Storage", alias = "storage")]
    Storage,
    #[serde(rename = "StorageV2")]
    #[value(name = "StorageV2", alias = "storagev2")]
    StorageV2,
    #[serde(rename = "BlobStorage")]
    #[value(name = "BlobStorage", alias = "blobstorage")]
    BlobStorage,
    #[serde(rename = "BlockBlobStorage")]
    #[value(name = "BlockBlobStorage", alias = "blockblobstorage")]
    BlockBlobStorage,
    #[serde(rename = "FileStorage")]
    #[value(name = "FileStorage", alias = "filestorage")]
    FileStorage,
}

impl AccountKind {
    /// ARM wire name for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Storage => "Storage",
            AccountKind::StorageV2 => "StorageV2",
            AccountKind::BlobStorage => "BlobStorage",
            AccountKind::BlockBlobStorage => "BlockBlobStorage",
            AccountKind::FileStorage => "FileStorage",
        }
    }
}

impl Default for AccountKind {
    fn default() -> Self {
        AccountKind::StorageV2
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = ProvstoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "storage" => Ok(AccountKind::Storage),
            "storagev2" => Ok(AccountKind::StorageV2),
            "blobstorage" => Ok(AccountKind::BlobStorage),
            "blockblobstorage" => Ok(AccountKind::BlockBlobStorage),
            "filestorage" => Ok(AccountKind::FileStorage),
            _ => Err(ProvstoreError::invalid_argument(format!(
                "Unknown storage account kind: {}",
                s
            ))),
        }
    }
}

/// Azure subscription context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub display_name: String,
    pub state: String,
}

/// Resource group properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGroup {
    pub id: String,
    pub name: String,
    pub location: String,
    pub provisioning_state: String,
}

/// Storage account properties and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageAccountProperties {
    pub id: String,
    pub name: String,
    pub location: String,
    pub resource_group: String,
    pub sku: String,
    pub kind: String,
    pub provisioning_state: String,
    pub primary_blob_endpoint: Option<String>,
    pub creation_time: Option<DateTime<Utc>>,
    pub tags: HashMap<String, String>,
}

impl StorageAccountProperties {
    /// Convert to storage account summary
    pub fn to_summary(&self) -> StorageAccountSummary {
        StorageAccountSummary {
            name: self.name.clone(),
            resource_group: self.resource_group.clone(),
            location: self.location.clone(),
            sku: self.sku.clone(),
            kind: self.kind.clone(),
            status: self.provisioning_state.clone(),
        }
    }

    /// Get the blob endpoint, constructing the default form if ARM
    /// did not return one
    pub fn get_blob_endpoint(&self) -> String {
        self.primary_blob_endpoint
            .clone()
            .unwrap_or_else(|| format!("https://{}.blob.core.windows.net/", self.name))
    }
}

/// Storage account summary for list operations
#[derive(Debug, Clone, Serialize, Deserialize, Tabled)]
pub struct StorageAccountSummary {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Resource Group")]
    pub resource_group: String,
    #[tabled(rename = "Location")]
    pub location: String,
    #[tabled(rename = "SKU")]
    pub sku: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

/// Storage account creation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageAccountCreateRequest {
    pub name: String,
    pub resource_group: String,
    pub location: String,
    pub sku: AccountSku,
    pub kind: AccountKind,
    pub tags: HashMap<String, String>,
}

/// Provisioning request for a project
#[derive(Debug, Clone)]
pub struct ProvisionRequest {
    pub project_name: String,
    pub resource_group: String,
    pub location: String,
    pub sku: AccountSku,
    pub kind: AccountKind,
}

/// Outcome of a provisioning run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionOutcome {
    /// Account name as reported by ARM, not the locally derived candidate
    pub account_name: String,
    pub resource_group_created: bool,
    pub account_created: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sku_wire_names() {
        assert_eq!(AccountSku::StandardLrs.to_string(), "Standard_LRS");
        assert_eq!(AccountSku::StandardRagzrs.to_string(), "Standard_RAGZRS");
        assert_eq!(AccountSku::PremiumZrs.to_string(), "Premium_ZRS");
    }

    #[test]
    fn test_sku_default_is_locally_redundant() {
        assert_eq!(AccountSku::default(), AccountSku::StandardLrs);
    }

    #[test]
    fn test_sku_from_str() {
        assert_eq!(
            "Standard_GRS".parse::<AccountSku>().unwrap(),
            AccountSku::StandardGrs
        );
        assert_eq!(
            "standard_zrs".parse::<AccountSku>().unwrap(),
            AccountSku::StandardZrs
        );
        assert!("Standard_XYZ".parse::<AccountSku>().is_err());
    }

    #[test]
    fn test_sku_serde_uses_wire_name() {
        let json = serde_json::to_string(&AccountSku::StandardLrs).unwrap();
        assert_eq!(json, "\"Standard_LRS\"");
    }

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(AccountKind::StorageV2.to_string(), "StorageV2");
        assert_eq!(AccountKind::BlockBlobStorage.to_string(), "BlockBlobStorage");
    }

    #[test]
    fn test_kind_default_is_v2() {
        assert_eq!(AccountKind::default(), AccountKind::StorageV2);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(
            "FileStorage".parse::<AccountKind>().unwrap(),
            AccountKind::FileStorage
        );
        assert_eq!(
            "storagev2".parse::<AccountKind>().unwrap(),
            AccountKind::StorageV2
        );
        assert!("StorageV3".parse::<AccountKind>().is_err());
    }

    #[test]
    fn test_default_blob_endpoint() {
        let props = StorageAccountProperties {
            id: "/subscriptions/sub-1/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/demostorage".to_string(),
            name: "demostorage".to_string(),
            location: "eastus".to_string(),
            resource_group: "rg".to_string(),
            sku: "Standard_LRS".to_string(),
            kind: "StorageV2".to_string(),
            provisioning_state: "Succeeded".to_string(),
            primary_blob_endpoint: None,
            creation_time: None,
            tags: HashMap::new(),
        };

        assert_eq!(
            props.get_blob_endpoint(),
            "https://demostorage.blob.core.windows.net/"
        );
    }
}
