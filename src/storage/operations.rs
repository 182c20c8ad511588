//! Storage provisioning operations implementation
//!
//! This module provides the management-plane operations used by the
//! provisioner: subscription lookup, resource group get/create, storage
//! account get/create, and account listing. Calls go straight to the
//! Azure Resource Manager REST API with a bearer token.

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use super::models::{
    ResourceGroup, StorageAccountCreateRequest, StorageAccountProperties, StorageAccountSummary,
    Subscription,
};
use crate::auth::provider::{AzureAuthProvider, MANAGEMENT_SCOPE};
use crate::error::{ProvstoreError, Result};
use crate::utils::network::{classify_network_error, create_http_client, NetworkConfig};

const SUBSCRIPTION_API_VERSION: &str = "2022-12-01";
const RESOURCE_GROUP_API_VERSION: &str = "2021-04-01";
const STORAGE_API_VERSION: &str = "2023-01-01";

/// Trait for storage provisioning operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageOperations: Send + Sync {
    /// Resolve the configured subscription context
    async fn get_subscription(&self) -> Result<Subscription>;

    /// Get resource group details
    async fn get_resource_group(&self, name: &str) -> Result<ResourceGroup>;

    /// Create a resource group in the given location
    async fn create_resource_group(&self, name: &str, location: &str) -> Result<ResourceGroup>;

    /// Get storage account details
    async fn get_storage_account(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<StorageAccountProperties>;

    /// Create a storage account
    ///
    /// ARM accepts the creation request and provisions asynchronously;
    /// this call reports acceptance only. Callers re-query the account
    /// to confirm it is readable.
    async fn create_storage_account(&self, request: &StorageAccountCreateRequest) -> Result<()>;

    /// List storage accounts in the subscription or a resource group
    async fn list_storage_accounts<'a>(
        &self,
        resource_group: Option<&'a str>,
    ) -> Result<Vec<StorageAccountSummary>>;
}

/// Azure Resource Manager path for a resource group
fn resource_group_path(subscription_id: &str, name: &str) -> String {
    format!("/subscriptions/{}/resourcegroups/{}", subscription_id, name)
}

/// Azure Resource Manager path for a storage account
fn storage_account_path(subscription_id: &str, resource_group: &str, name: &str) -> String {
    format!(
        "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Storage/storageAccounts/{}",
        subscription_id, resource_group, name
    )
}

/// Build a full Azure Resource Manager URL
fn build_arm_url(path: &str) -> String {
    format!("https://management.azure.com{}", path)
}

/// Parse an ARM error response body
fn parse_azure_error(status: u16, body: &str) -> ProvstoreError {
    if let Ok(error_json) = serde_json::from_str::<Value>(body) {
        if let Some(error) = error_json.get("error") {
            if let Some(message) = error.get("message").and_then(|m| m.as_str()) {
                return ProvstoreError::azure_api(format!("HTTP {}: {}", status, message));
            }
        }
    }
    ProvstoreError::azure_api(format!("HTTP {}: {}", status, body))
}

/// Parse an ARM resource group response
fn parse_resource_group(data: &Value) -> Result<ResourceGroup> {
    let id = data
        .get("id")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let name = data
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let location = data
        .get("location")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let provisioning_state = data
        .get("properties")
        .and_then(|p| p.get("provisioningState"))
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown")
        .to_string();

    Ok(ResourceGroup {
        id,
        name,
        location,
        provisioning_state,
    })
}

/// Parse an ARM storage account response
fn parse_storage_account(data: &Value) -> Result<StorageAccountProperties> {
    let id = data
        .get("id")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let name = data
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let location = data
        .get("location")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    // Resource group is the fifth segment of the ARM resource ID
    let resource_group = id.split('/').nth(4).unwrap_or_default().to_string();

    let sku = data
        .get("sku")
        .and_then(|s| s.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or_default()
        .to_string();

    let kind = data
        .get("kind")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let properties = data.get("properties");

    let provisioning_state = properties
        .and_then(|p| p.get("provisioningState"))
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown")
        .to_string();

    let primary_blob_endpoint = properties
        .and_then(|p| p.get("primaryEndpoints"))
        .and_then(|e| e.get("blob"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    let creation_time = properties
        .and_then(|p| p.get("creationTime"))
        .and_then(|v| v.as_str())
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&chrono::Utc));

    let mut tags = HashMap::new();
    if let Some(tags_obj) = data.get("tags").and_then(|v| v.as_object()) {
        for (key, value) in tags_obj {
            if let Some(val_str) = value.as_str() {
                tags.insert(key.clone(), val_str.to_string());
            }
        }
    }

    Ok(StorageAccountProperties {
        id,
        name,
        location,
        resource_group,
        sku,
        kind,
        provisioning_state,
        primary_blob_endpoint,
        creation_time,
        tags,
    })
}

/// Azure storage operations implementation
pub struct AzureStorageOperations {
    auth_provider: Arc<dyn AzureAuthProvider>,
    http_client: Client,
    subscription_id: String,
}

impl AzureStorageOperations {
    /// Create a new Azure storage operations instance
    pub fn new(auth_provider: Arc<dyn AzureAuthProvider>, subscription_id: String) -> Result<Self> {
        let network_config = NetworkConfig::default();
        let http_client = create_http_client(&network_config)?;

        Ok(Self {
            auth_provider,
            http_client,
            subscription_id,
        })
    }

    /// Get access token for Azure Resource Manager
    async fn get_management_token(&self) -> Result<String> {
        let token = self.auth_provider.get_token(&[MANAGEMENT_SCOPE]).await?;
        Ok(token.token.secret().to_string())
    }

    /// Create authorized headers for the Azure REST API
    async fn create_headers(&self) -> Result<HeaderMap> {
        let token = self.get_management_token().await?;
        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            format!("Bearer {}", token).parse().map_err(|e| {
                ProvstoreError::authentication(format!("Invalid token format: {}", e))
            })?,
        );
        headers.insert("Content-Type", "application/json".parse().unwrap());
        Ok(headers)
    }
}

#[async_trait]
impl StorageOperations for AzureStorageOperations {
    async fn get_subscription(&self) -> Result<Subscription> {
        let headers = self.create_headers().await?;
        let url = build_arm_url(&format!(
            "/subscriptions/{}?api-version={}",
            self.subscription_id, SUBSCRIPTION_API_VERSION
        ));

        debug!("Resolving subscription {}", self.subscription_id);

        let response = self
            .http_client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| classify_network_error(&e, &url))?;

        match response.status().as_u16() {
            404 => {
                return Err(ProvstoreError::config(format!(
                    "Subscription '{}' was not found or is not visible to the current identity",
                    self.subscription_id
                )))
            }
            401 | 403 => {
                return Err(ProvstoreError::authentication(format!(
                    "The current identity is not authorized for subscription '{}'",
                    self.subscription_id
                )))
            }
            _ => {}
        }

        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let error_body = response.text().await.unwrap_or_default();
            return Err(parse_azure_error(status_code, &error_body));
        }

        let data: Value = response.json().await.map_err(|e| {
            ProvstoreError::serialization(format!("Failed to parse subscription response: {}", e))
        })?;

        Ok(Subscription {
            id: data
                .get("subscriptionId")
                .and_then(|v| v.as_str())
                .unwrap_or(&self.subscription_id)
                .to_string(),
            display_name: data
                .get("displayName")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            state: data
                .get("state")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown")
                .to_string(),
        })
    }

    async fn get_resource_group(&self, name: &str) -> Result<ResourceGroup> {
        let headers = self.create_headers().await?;
        let path = resource_group_path(&self.subscription_id, name);
        let url = build_arm_url(&format!(
            "{}?api-version={}",
            path, RESOURCE_GROUP_API_VERSION
        ));

        let response = self
            .http_client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| classify_network_error(&e, &url))?;

        if response.status().as_u16() == 404 {
            return Err(ProvstoreError::resource_group_not_found(name));
        }

        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let error_body = response.text().await.unwrap_or_default();
            return Err(parse_azure_error(status_code, &error_body));
        }

        let data: Value = response.json().await.map_err(|e| {
            ProvstoreError::serialization(format!("Failed to parse resource group response: {}", e))
        })?;

        parse_resource_group(&data)
    }

    async fn create_resource_group(&self, name: &str, location: &str) -> Result<ResourceGroup> {
        let headers = self.create_headers().await?;
        let path = resource_group_path(&self.subscription_id, name);
        let url = build_arm_url(&format!(
            "{}?api-version={}",
            path, RESOURCE_GROUP_API_VERSION
        ));

        let body = json!({ "location": location });

        debug!("Creating resource group '{}' in '{}'", name, location);

        let response = self
            .http_client
            .put(&url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_network_error(&e, &url))?;

        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let error_body = response.text().await.unwrap_or_default();
            return Err(parse_azure_error(status_code, &error_body));
        }

        let data: Value = response.json().await.map_err(|e| {
            ProvstoreError::serialization(format!("Failed to parse resource group response: {}", e))
        })?;

        parse_resource_group(&data)
    }

    async fn get_storage_account(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<StorageAccountProperties> {
        let headers = self.create_headers().await?;
        let path = storage_account_path(&self.subscription_id, resource_group, name);
        let url = build_arm_url(&format!("{}?api-version={}", path, STORAGE_API_VERSION));

        let response = self
            .http_client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| classify_network_error(&e, &url))?;

        if response.status().as_u16() == 404 {
            return Err(ProvstoreError::storage_account_not_found(name));
        }

        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let error_body = response.text().await.unwrap_or_default();
            return Err(parse_azure_error(status_code, &error_body));
        }

        let data: Value = response.json().await.map_err(|e| {
            ProvstoreError::serialization(format!(
                "Failed to parse storage account response: {}",
                e
            ))
        })?;

        parse_storage_account(&data)
    }

    async fn create_storage_account(&self, request: &StorageAccountCreateRequest) -> Result<()> {
        let headers = self.create_headers().await?;
        let path = storage_account_path(&self.subscription_id, &request.resource_group, &request.name);
        let url = build_arm_url(&format!("{}?api-version={}", path, STORAGE_API_VERSION));

        let body = json!({
            "location": request.location,
            "sku": { "name": request.sku.as_str() },
            "kind": request.kind.as_str(),
            "properties": {},
            "tags": &request.tags
        });

        debug!(
            "Creating storage account '{}' in resource group '{}'",
            request.name, request.resource_group
        );

        let response = self
            .http_client
            .put(&url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_network_error(&e, &url))?;

        // ARM answers 200/201 when provisioning completes inline and 202
        // when it continues asynchronously. Either way the request was
        // accepted; readability is confirmed by a follow-up query.
        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let error_body = response.text().await.unwrap_or_default();
            return Err(parse_azure_error(status_code, &error_body));
        }

        Ok(())
    }

    async fn list_storage_accounts<'a>(
        &self,
        resource_group: Option<&'a str>,
    ) -> Result<Vec<StorageAccountSummary>> {
        let headers = self.create_headers().await?;

        let url = if let Some(rg) = resource_group {
            build_arm_url(&format!(
                "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Storage/storageAccounts?api-version={}",
                self.subscription_id, rg, STORAGE_API_VERSION
            ))
        } else {
            build_arm_url(&format!(
                "/subscriptions/{}/providers/Microsoft.Storage/storageAccounts?api-version={}",
                self.subscription_id, STORAGE_API_VERSION
            ))
        };

        let response = self
            .http_client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| classify_network_error(&e, &url))?;

        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let error_body = response.text().await.unwrap_or_default();
            return Err(parse_azure_error(status_code, &error_body));
        }

        let data: Value = response.json().await.map_err(|e| {
            ProvstoreError::serialization(format!(
                "Failed to parse storage accounts response: {}",
                e
            ))
        })?;

        let mut accounts = Vec::new();
        if let Some(account_array) = data.get("value").and_then(|v| v.as_array()) {
            for account_value in account_array {
                if let Ok(account) = parse_storage_account(account_value) {
                    accounts.push(account.to_summary());
                }
            }
        }

        Ok(accounts)
    }
}
