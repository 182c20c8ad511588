//! Storage provisioning facade
//!
//! This module drives the provisioning sequence for a project: resolve
//! the subscription context, ensure the resource group, derive the
//! storage account name, ensure the account, and verify the result.
//! Each ensure step is split into a pure plan (found vs. to-create) and
//! a single side-effecting apply.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use super::models::{
    ProvisionOutcome, ProvisionRequest, ResourceGroup, StorageAccountCreateRequest,
    StorageAccountProperties,
};
use super::operations::{AzureStorageOperations, StorageOperations};
use crate::auth::provider::AzureAuthProvider;
use crate::error::{ProvstoreError, Result};
use crate::utils::format::DisplayUtils;
use crate::utils::naming::derive_account_name;

/// Normalize a region for comparison; ARM reports "North Europe" as
/// "northeurope"
fn normalize_location(location: &str) -> String {
    location.replace(' ', "").to_lowercase()
}

/// Plan for an ensure step: reuse what exists or create what is missing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsurePlan<T, S> {
    Found(T),
    ToCreate(S),
}

/// Specification for a resource group to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroupSpec {
    pub name: String,
    pub location: String,
}

/// Decide whether a resource group must be created.
///
/// An existing group is always reused as-is; in particular its region
/// is never changed to match the requested location.
pub fn plan_resource_group(
    existing: Option<ResourceGroup>,
    name: &str,
    location: &str,
) -> EnsurePlan<ResourceGroup, ResourceGroupSpec> {
    match existing {
        Some(group) => EnsurePlan::Found(group),
        None => EnsurePlan::ToCreate(ResourceGroupSpec {
            name: name.to_string(),
            location: location.to_string(),
        }),
    }
}

/// Decide whether a storage account must be created.
///
/// An existing account is reused untouched; its SKU and kind are never
/// reconciled against the request.
pub fn plan_storage_account(
    existing: Option<StorageAccountProperties>,
    spec: StorageAccountCreateRequest,
) -> EnsurePlan<StorageAccountProperties, StorageAccountCreateRequest> {
    match existing {
        Some(account) => EnsurePlan::Found(account),
        None => EnsurePlan::ToCreate(spec),
    }
}

/// High-level storage provisioner
pub struct StorageProvisioner {
    storage_ops: Arc<dyn StorageOperations>,
    display: DisplayUtils,
}

impl StorageProvisioner {
    /// Create a new storage provisioner against Azure
    pub fn new(
        auth_provider: Arc<dyn AzureAuthProvider>,
        subscription_id: String,
        no_color: bool,
    ) -> Result<Self> {
        let storage_ops = Arc::new(AzureStorageOperations::new(auth_provider, subscription_id)?);
        Ok(Self::with_operations(storage_ops, no_color))
    }

    /// Create a provisioner over arbitrary operations (used by tests)
    pub fn with_operations(storage_ops: Arc<dyn StorageOperations>, no_color: bool) -> Self {
        Self {
            storage_ops,
            display: DisplayUtils::new(no_color),
        }
    }

    /// Provision the storage account for a project
    ///
    /// Runs the full sequence: subscription check, ensure resource
    /// group, ensure storage account, verify. Returns the verified
    /// account name as reported by ARM.
    pub async fn provision(&self, request: &ProvisionRequest) -> Result<ProvisionOutcome> {
        let subscription = self.storage_ops.get_subscription().await?;
        self.display.print_info(&format!(
            "Using subscription '{}' ({})",
            subscription.display_name, subscription.id
        ))?;

        let (_, resource_group_created) = self
            .ensure_resource_group(&request.resource_group, &request.location)
            .await?;

        let account_name = derive_account_name(&request.project_name);
        info!(
            "Derived storage account name '{}' for project '{}'",
            account_name, request.project_name
        );

        let account_created = self.ensure_storage_account(request, &account_name).await?;

        let account = self.verify_storage_account(request, &account_name).await?;

        if account_created {
            self.display.print_success(&format!(
                "Created storage account '{}' in resource group '{}'",
                account.name, request.resource_group
            ))?;
        } else {
            self.display.print_success(&format!(
                "Verified existing storage account '{}' in resource group '{}'",
                account.name, request.resource_group
            ))?;
        }

        Ok(ProvisionOutcome {
            account_name: account.name,
            resource_group_created,
            account_created,
        })
    }

    /// List storage accounts with formatted output
    pub async fn list_accounts(
        &self,
        resource_group: Option<&str>,
    ) -> Result<Vec<super::models::StorageAccountSummary>> {
        self.storage_ops.list_storage_accounts(resource_group).await
    }

    /// Ensure the resource group exists, returning it and whether it
    /// was created by this run
    async fn ensure_resource_group(
        &self,
        name: &str,
        location: &str,
    ) -> Result<(ResourceGroup, bool)> {
        let existing = self.lookup_resource_group(name).await?;

        match plan_resource_group(existing, name, location) {
            EnsurePlan::Found(group) => {
                if normalize_location(&group.location) != normalize_location(location) {
                    self.display.print_warning(&format!(
                        "Resource group '{}' already exists in '{}'; leaving its region unchanged",
                        group.name, group.location
                    ))?;
                }
                self.display
                    .print_info(&format!("Using existing resource group '{}'", group.name))?;
                Ok((group, false))
            }
            EnsurePlan::ToCreate(spec) => {
                self.display.print_info(&format!(
                    "Creating resource group '{}' in '{}'...",
                    spec.name, spec.location
                ))?;
                let group = self
                    .storage_ops
                    .create_resource_group(&spec.name, &spec.location)
                    .await?;
                Ok((group, true))
            }
        }
    }

    /// Ensure the storage account exists, returning whether the create
    /// branch ran
    async fn ensure_storage_account(
        &self,
        request: &ProvisionRequest,
        account_name: &str,
    ) -> Result<bool> {
        let existing = self
            .lookup_storage_account(&request.resource_group, account_name)
            .await?;

        let spec = StorageAccountCreateRequest {
            name: account_name.to_string(),
            resource_group: request.resource_group.clone(),
            location: request.location.clone(),
            sku: request.sku,
            kind: request.kind,
            tags: HashMap::new(),
        };

        match plan_storage_account(existing, spec) {
            EnsurePlan::Found(account) => {
                self.display.print_info(&format!(
                    "Using existing storage account '{}'",
                    account.name
                ))?;
                Ok(false)
            }
            EnsurePlan::ToCreate(spec) => {
                self.display.print_info(&format!(
                    "Creating storage account '{}' ({}, {})...",
                    spec.name, spec.sku, spec.kind
                ))?;
                self.storage_ops.create_storage_account(&spec).await?;
                Ok(true)
            }
        }
    }

    /// Re-query the account after the ensure step; absence here is a
    /// provisioning failure, not a create branch signal
    async fn verify_storage_account(
        &self,
        request: &ProvisionRequest,
        account_name: &str,
    ) -> Result<StorageAccountProperties> {
        match self
            .storage_ops
            .get_storage_account(&request.resource_group, account_name)
            .await
        {
            Ok(account) => Ok(account),
            Err(ProvstoreError::StorageAccountNotFound { .. }) => {
                Err(ProvstoreError::verification_failed(account_name))
            }
            Err(e) => Err(e),
        }
    }

    /// Translate the not-found error into the absent branch
    async fn lookup_resource_group(&self, name: &str) -> Result<Option<ResourceGroup>> {
        match self.storage_ops.get_resource_group(name).await {
            Ok(group) => Ok(Some(group)),
            Err(ProvstoreError::ResourceGroupNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Translate the not-found error into the absent branch
    async fn lookup_storage_account(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<Option<StorageAccountProperties>> {
        match self
            .storage_ops
            .get_storage_account(resource_group, name)
            .await
        {
            Ok(account) => Ok(Some(account)),
            Err(ProvstoreError::StorageAccountNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
