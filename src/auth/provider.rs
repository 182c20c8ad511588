//! Authentication provider trait and implementations
//!
//! This module defines the authentication provider trait and provides
//! implementations for various Azure authentication methods.

use crate::error::{ProvstoreError, Result};
use async_trait::async_trait;
use azure_core::auth::{AccessToken, TokenCredential};
use azure_identity::{ClientSecretCredential, DefaultAzureCredential, TokenCredentialOptions};
use std::collections::HashMap;
use std::sync::Arc;

/// Scope for Azure Resource Manager tokens
pub const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";

/// Trait for Azure authentication providers
#[async_trait]
pub trait AzureAuthProvider: Send + Sync {
    /// Get an access token for the specified scopes
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken>;
}

/// Ambient identity provider using DefaultAzureCredential
///
/// Resolves whatever credential the calling environment already carries
/// (Azure CLI login, managed identity, environment variables); the tool
/// itself never handles secrets on this path.
pub struct DefaultAzureCredentialProvider {
    credential: Arc<DefaultAzureCredential>,
}

impl DefaultAzureCredentialProvider {
    /// Create a new DefaultAzureCredentialProvider
    pub fn new() -> Result<Self> {
        let credential = Arc::new(
            DefaultAzureCredential::create(TokenCredentialOptions::default()).map_err(|e| {
                ProvstoreError::authentication(format!(
                    "Failed to create DefaultAzureCredential: {}",
                    e
                ))
            })?,
        );

        Ok(Self { credential })
    }
}

#[async_trait]
impl AzureAuthProvider for DefaultAzureCredentialProvider {
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken> {
        let token_response = self.credential.get_token(scopes).await.map_err(|e| {
            ProvstoreError::authentication(format!("Failed to get token: {}", e))
        })?;

        Ok(token_response)
    }
}

/// Client Secret Authentication Provider
pub struct ClientSecretProvider {
    credential: Arc<ClientSecretCredential>,
}

impl ClientSecretProvider {
    /// Create a new ClientSecretProvider
    pub fn new(tenant_id: String, client_id: String, client_secret: String) -> Result<Self> {
        let authority = format!("https://login.microsoftonline.com/{}", tenant_id);
        let authority_url = url::Url::parse(&authority)
            .map_err(|e| ProvstoreError::config(format!("Invalid authority URL: {}", e)))?;

        let credential = Arc::new(ClientSecretCredential::new(
            azure_core::new_http_client(),
            authority_url,
            tenant_id,
            client_id,
            client_secret,
        ));

        Ok(Self { credential })
    }
}

#[async_trait]
impl AzureAuthProvider for ClientSecretProvider {
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken> {
        let token_response = self.credential.get_token(scopes).await.map_err(|e| {
            ProvstoreError::authentication(format!("Failed to get token: {}", e))
        })?;

        Ok(token_response)
    }
}

/// Authentication provider factory
pub struct AuthProviderFactory;

impl AuthProviderFactory {
    /// Create an authentication provider based on configuration
    pub fn create_provider(
        provider_type: &str,
        config: &HashMap<String, String>,
    ) -> Result<Arc<dyn AzureAuthProvider>> {
        match provider_type.to_lowercase().as_str() {
            "default" | "defaultazurecredential" => {
                Ok(Arc::new(DefaultAzureCredentialProvider::new()?))
            }
            "clientsecret" => {
                let tenant_id = config.get("tenant_id").ok_or_else(|| {
                    ProvstoreError::config("tenant_id is required for client secret authentication")
                })?;
                let client_id = config.get("client_id").ok_or_else(|| {
                    ProvstoreError::config("client_id is required for client secret authentication")
                })?;
                let client_secret = config.get("client_secret").ok_or_else(|| {
                    ProvstoreError::config(
                        "client_secret is required for client secret authentication",
                    )
                })?;

                Ok(Arc::new(ClientSecretProvider::new(
                    tenant_id.clone(),
                    client_id.clone(),
                    client_secret.clone(),
                )?))
            }
            _ => Err(ProvstoreError::config(format!(
                "Unsupported authentication provider: {}",
                provider_type
            ))),
        }
    }

    /// Create the ambient-identity provider, honoring client-secret
    /// environment variables when all three are present.
    pub fn from_environment() -> Result<Arc<dyn AzureAuthProvider>> {
        let tenant_id = std::env::var("AZURE_TENANT_ID").ok();
        let client_id = std::env::var("AZURE_CLIENT_ID").ok();
        let client_secret = std::env::var("AZURE_CLIENT_SECRET").ok();

        if let (Some(tenant_id), Some(client_id), Some(client_secret)) =
            (tenant_id, client_id, client_secret)
        {
            let mut config = HashMap::new();
            config.insert("tenant_id".to_string(), tenant_id);
            config.insert("client_id".to_string(), client_id);
            config.insert("client_secret".to_string(), client_secret);
            return Self::create_provider("clientsecret", &config);
        }

        Self::create_provider("default", &HashMap::new())
    }
}
