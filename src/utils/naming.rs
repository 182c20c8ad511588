//! Storage account name derivation
//!
//! This module derives the storage account name for a project and
//! reports on its validity against the Azure storage naming rules.

use regex::Regex;

/// Suffix appended to every project name before lower-casing.
pub const ACCOUNT_NAME_SUFFIX: &str = "storage";

/// ARM allows storage account names of 3-24 lower-case alphanumerics.
pub const MAX_ACCOUNT_NAME_LENGTH: usize = 24;

/// Over-long names are cut to 23 characters, one short of the ARM
/// maximum. Existing environments were provisioned with the 23-character
/// form, so the cut length is load-bearing and pinned by tests.
pub const TRUNCATED_ACCOUNT_NAME_LENGTH: usize = 23;

/// Derive the storage account name for a project.
///
/// Appends `"storage"`, lower-cases the result, and truncates to the
/// first 23 characters when the result exceeds 24. No other
/// sanitization happens here: a project name carrying characters that
/// are illegal in account names flows through unchanged and is rejected
/// by ARM at creation time.
pub fn derive_account_name(project_name: &str) -> String {
    let name = format!("{project_name}{ACCOUNT_NAME_SUFFIX}").to_lowercase();
    if name.chars().count() > MAX_ACCOUNT_NAME_LENGTH {
        name.chars().take(TRUNCATED_ACCOUNT_NAME_LENGTH).collect()
    } else {
        name
    }
}

/// Check a name against the Azure storage account naming rules
/// (3-24 characters, lower-case letters and digits only).
pub fn is_valid_account_name(name: &str) -> bool {
    let len = name.chars().count();
    if !(3..=MAX_ACCOUNT_NAME_LENGTH).contains(&len) {
        return false;
    }

    let re = Regex::new(r"^[a-z0-9]+$").unwrap();
    re.is_match(name)
}

/// Details about a derived account name
#[derive(Debug, Clone)]
pub struct AccountNameInfo {
    pub project_name: String,
    pub derived_name: String,
    pub derived_length: usize,
    pub was_truncated: bool,
    pub is_valid: bool,
}

/// Derive an account name and report how it was produced.
///
/// Used by the `name` command for offline inspection; the provisioning
/// path itself never pre-validates.
pub fn account_name_info(project_name: &str) -> AccountNameInfo {
    let derived = derive_account_name(project_name);
    let raw_length = format!("{project_name}{ACCOUNT_NAME_SUFFIX}")
        .to_lowercase()
        .chars()
        .count();

    AccountNameInfo {
        project_name: project_name.to_string(),
        derived_length: derived.chars().count(),
        was_truncated: raw_length > MAX_ACCOUNT_NAME_LENGTH,
        is_valid: is_valid_account_name(&derived),
        derived_name: derived,
    }
}
