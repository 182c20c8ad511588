//! Account name derivation tests
//!
//! Tests for the deterministic storage account naming rules including
//! the truncation behavior and validity checks.

use provstore::utils::naming::{account_name_info, derive_account_name, is_valid_account_name};

#[test]
fn test_derivation_examples() {
    // Project + "storage", lower-cased
    assert_eq!(derive_account_name("ProjectName"), "projectnamestorage");
    assert_eq!(derive_account_name("Demo"), "demostorage");
    assert_eq!(derive_account_name("WEBAPP01"), "webapp01storage");
}

#[test]
fn test_truncation_boundary() {
    // 24 characters is left alone; anything longer is cut to 23
    let at_limit = derive_account_name("abcdefghijklmnopq");
    assert_eq!(at_limit.len(), 24);

    let over_limit = derive_account_name("abcdefghijklmnopqr");
    assert_eq!(over_limit.len(), 23);
    assert_eq!(over_limit, "abcdefghijklmnopqrstora");

    let far_over_limit = derive_account_name("AVeryLongProjectName");
    assert_eq!(far_over_limit, "averylongprojectnamesto");
    assert_eq!(far_over_limit.len(), 23);
}

#[test]
fn test_derivation_is_pure() {
    for project in ["ProjectName", "x", "AVeryLongProjectName", ""] {
        assert_eq!(derive_account_name(project), derive_account_name(project));
    }
}

#[test]
fn test_account_name_validity() {
    // Valid storage account names
    let valid_names = vec![
        "projectnamestorage",
        "abc",
        "a1b2c3",
        "abcdefghijklmnopqstorage", // 24 chars (max)
    ];

    for name in valid_names {
        assert!(
            is_valid_account_name(name),
            "Name '{}' should be valid",
            name
        );
    }

    // Invalid storage account names
    let invalid_names = vec![
        "",                          // Empty
        "ab",                        // Too short
        "ProjectStorage",            // Uppercase
        "project_storage",           // Underscore
        "project-storage",           // Hyphen
        "project storage",           // Space
        "project.storage",           // Period
        "abcdefghijklmnopqrstuvwxy", // 25 chars (too long)
    ];

    for name in invalid_names {
        assert!(
            !is_valid_account_name(name),
            "Name '{}' should be invalid",
            name
        );
    }
}

#[test]
fn test_illegal_characters_are_not_sanitized() {
    // Derivation performs no cleanup; ARM is the authority on validity
    let derived = derive_account_name("my-project");
    assert_eq!(derived, "my-projectstorage");
    assert!(!is_valid_account_name(&derived));
}

#[test]
fn test_name_info_reports_truncation() {
    let info = account_name_info("AVeryLongProjectName");
    assert!(info.was_truncated);
    assert_eq!(info.derived_length, 23);
    assert!(info.is_valid);

    let info = account_name_info("Demo");
    assert!(!info.was_truncated);
    assert_eq!(info.derived_name, "demostorage");
}
