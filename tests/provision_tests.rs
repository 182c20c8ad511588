//! End-to-end provisioning tests
//!
//! Drives the full provisioning sequence against an in-memory stand-in
//! for Azure Resource Manager: create-then-verify on an empty
//! environment, idempotent re-runs, region handling for existing
//! resource groups, and creation failures.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use provstore::error::{ProvstoreError, Result};
use provstore::storage::models::{
    AccountKind, AccountSku, ProvisionRequest, ResourceGroup, StorageAccountCreateRequest,
    StorageAccountProperties, StorageAccountSummary, Subscription,
};
use provstore::storage::operations::StorageOperations;
use provstore::storage::provisioner::StorageProvisioner;

/// In-memory control plane: resources live in maps, create calls are
/// counted, and failures can be injected per resource type.
#[derive(Default)]
struct FakeArm {
    state: Mutex<FakeArmState>,
}

#[derive(Default)]
struct FakeArmState {
    resource_groups: HashMap<String, ResourceGroup>,
    accounts: HashMap<(String, String), StorageAccountProperties>,
    resource_group_creates: usize,
    account_creates: usize,
    fail_account_create: bool,
    drop_created_accounts: bool,
}

impl FakeArm {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn with_resource_group(self: Arc<Self>, name: &str, location: &str) -> Arc<Self> {
        self.state.lock().unwrap().resource_groups.insert(
            name.to_string(),
            ResourceGroup {
                id: format!("/subscriptions/sub-1/resourceGroups/{}", name),
                name: name.to_string(),
                location: location.to_string(),
                provisioning_state: "Succeeded".to_string(),
            },
        );
        self
    }

    fn failing_account_creation(self: Arc<Self>) -> Arc<Self> {
        self.state.lock().unwrap().fail_account_create = true;
        self
    }

    /// Accept creation requests but never materialize the account,
    /// like an eventual-consistency gap that never closes
    fn dropping_created_accounts(self: Arc<Self>) -> Arc<Self> {
        self.state.lock().unwrap().drop_created_accounts = true;
        self
    }

    fn resource_group_creates(&self) -> usize {
        self.state.lock().unwrap().resource_group_creates
    }

    fn account_creates(&self) -> usize {
        self.state.lock().unwrap().account_creates
    }

    fn account(&self, resource_group: &str, name: &str) -> Option<StorageAccountProperties> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .get(&(resource_group.to_string(), name.to_string()))
            .cloned()
    }

    fn resource_group(&self, name: &str) -> Option<ResourceGroup> {
        self.state.lock().unwrap().resource_groups.get(name).cloned()
    }
}

#[async_trait]
impl StorageOperations for FakeArm {
    async fn get_subscription(&self) -> Result<Subscription> {
        Ok(Subscription {
            id: "sub-1".to_string(),
            display_name: "Test Subscription".to_string(),
            state: "Enabled".to_string(),
        })
    }

    async fn get_resource_group(&self, name: &str) -> Result<ResourceGroup> {
        self.state
            .lock()
            .unwrap()
            .resource_groups
            .get(name)
            .cloned()
            .ok_or_else(|| ProvstoreError::resource_group_not_found(name))
    }

    async fn create_resource_group(&self, name: &str, location: &str) -> Result<ResourceGroup> {
        let mut state = self.state.lock().unwrap();
        state.resource_group_creates += 1;

        let group = ResourceGroup {
            id: format!("/subscriptions/sub-1/resourceGroups/{}", name),
            name: name.to_string(),
            location: location.to_string(),
            provisioning_state: "Succeeded".to_string(),
        };
        state.resource_groups.insert(name.to_string(), group.clone());
        Ok(group)
    }

    async fn get_storage_account(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<StorageAccountProperties> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .get(&(resource_group.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| ProvstoreError::storage_account_not_found(name))
    }

    async fn create_storage_account(&self, request: &StorageAccountCreateRequest) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.account_creates += 1;

        if state.fail_account_create {
            return Err(ProvstoreError::azure_api(format!(
                "HTTP 400: The storage account name '{}' is invalid.",
                request.name
            )));
        }

        if state.drop_created_accounts {
            return Ok(());
        }

        let account = StorageAccountProperties {
            id: format!(
                "/subscriptions/sub-1/resourceGroups/{}/providers/Microsoft.Storage/storageAccounts/{}",
                request.resource_group, request.name
            ),
            name: request.name.clone(),
            location: request.location.clone(),
            resource_group: request.resource_group.clone(),
            sku: request.sku.to_string(),
            kind: request.kind.to_string(),
            provisioning_state: "Succeeded".to_string(),
            primary_blob_endpoint: Some(format!(
                "https://{}.blob.core.windows.net/",
                request.name
            )),
            creation_time: None,
            tags: request.tags.clone(),
        };
        state.accounts.insert(
            (request.resource_group.clone(), request.name.clone()),
            account,
        );
        Ok(())
    }

    async fn list_storage_accounts<'a>(
        &self,
        resource_group: Option<&'a str>,
    ) -> Result<Vec<StorageAccountSummary>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .accounts
            .iter()
            .filter(|((rg, _), _)| resource_group.map_or(true, |wanted| rg.as_str() == wanted))
            .map(|(_, account)| account.to_summary())
            .collect())
    }
}

fn request() -> ProvisionRequest {
    ProvisionRequest {
        project_name: "ProjectName".to_string(),
        resource_group: "RGName".to_string(),
        location: "North Europe".to_string(),
        sku: AccountSku::default(),
        kind: AccountKind::default(),
    }
}

#[tokio::test]
async fn provision_creates_everything_on_empty_environment() {
    let arm = FakeArm::new();
    let provisioner = StorageProvisioner::with_operations(arm.clone(), true);

    let outcome = provisioner.provision(&request()).await.unwrap();

    assert_eq!(outcome.account_name, "projectnamestorage");
    assert!(outcome.resource_group_created);
    assert!(outcome.account_created);

    let group = arm.resource_group("RGName").unwrap();
    assert_eq!(group.location, "North Europe");

    let account = arm.account("RGName", "projectnamestorage").unwrap();
    assert_eq!(account.sku, "Standard_LRS");
    assert_eq!(account.kind, "StorageV2");
    assert_eq!(account.location, "North Europe");

    assert_eq!(arm.resource_group_creates(), 1);
    assert_eq!(arm.account_creates(), 1);
}

#[tokio::test]
async fn provision_is_idempotent_across_runs() {
    let arm = FakeArm::new();
    let provisioner = StorageProvisioner::with_operations(arm.clone(), true);

    let first = provisioner.provision(&request()).await.unwrap();
    let second = provisioner.provision(&request()).await.unwrap();

    assert_eq!(first.account_name, second.account_name);
    assert!(first.account_created);
    assert!(!second.account_created);
    assert!(!second.resource_group_created);

    // Creation was attempted exactly once per resource
    assert_eq!(arm.resource_group_creates(), 1);
    assert_eq!(arm.account_creates(), 1);
}

#[tokio::test]
async fn existing_resource_group_keeps_its_region() {
    let arm = FakeArm::new().with_resource_group("RGName", "westeurope");
    let provisioner = StorageProvisioner::with_operations(arm.clone(), true);

    let outcome = provisioner.provision(&request()).await.unwrap();

    assert!(!outcome.resource_group_created);
    assert_eq!(arm.resource_group_creates(), 0);

    // The group is reused unchanged even though another region was requested
    let group = arm.resource_group("RGName").unwrap();
    assert_eq!(group.location, "westeurope");

    // The account itself still lands in the requested region
    let account = arm.account("RGName", "projectnamestorage").unwrap();
    assert_eq!(account.location, "North Europe");
}

#[tokio::test]
async fn account_creation_failure_produces_no_output_value() {
    let arm = FakeArm::new().failing_account_creation();
    let provisioner = StorageProvisioner::with_operations(arm.clone(), true);

    let result = provisioner.provision(&request()).await;

    match result {
        Err(ProvstoreError::AzureApiError(msg)) => assert!(msg.contains("HTTP 400")),
        other => panic!(
            "expected creation failure, got {:?}",
            other.map(|o| o.account_name)
        ),
    }

    // The failed create left nothing behind, but the resource group
    // created earlier in the run stays in place
    assert!(arm.account("RGName", "projectnamestorage").is_none());
    assert!(arm.resource_group("RGName").is_some());
}

#[tokio::test]
async fn accepted_but_unqueryable_account_fails_verification() {
    let arm = FakeArm::new().dropping_created_accounts();
    let provisioner = StorageProvisioner::with_operations(arm.clone(), true);

    let result = provisioner.provision(&request()).await;

    match result {
        Err(ProvstoreError::VerificationFailed { account_name }) => {
            assert_eq!(account_name, "projectnamestorage");
        }
        other => panic!(
            "expected verification failure, got {:?}",
            other.map(|o| o.account_name)
        ),
    }
}

#[tokio::test]
async fn list_accounts_scopes_to_resource_group() {
    let arm = FakeArm::new();
    let provisioner = StorageProvisioner::with_operations(arm.clone(), true);

    provisioner.provision(&request()).await.unwrap();

    let other = ProvisionRequest {
        project_name: "Demo".to_string(),
        resource_group: "OtherRG".to_string(),
        location: "eastus".to_string(),
        sku: AccountSku::StandardGrs,
        kind: AccountKind::BlobStorage,
    };
    provisioner.provision(&other).await.unwrap();

    let all = provisioner.list_accounts(None).await.unwrap();
    assert_eq!(all.len(), 2);

    let scoped = provisioner.list_accounts(Some("RGName")).await.unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].name, "projectnamestorage");

    let demo = provisioner.list_accounts(Some("OtherRG")).await.unwrap();
    assert_eq!(demo[0].name, "demostorage");
    assert_eq!(demo[0].sku, "Standard_GRS");
    assert_eq!(demo[0].kind, "BlobStorage");
}
