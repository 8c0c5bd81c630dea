//! CLI command tests

use crate::commands::{open_db, resolve_policy, resolve_port};
use nestegg_core::LabelPolicy;

#[test]
fn test_resolve_policy_names() {
    assert_eq!(
        resolve_policy("advice").unwrap(),
        LabelPolicy::advice_default()
    );
    assert_eq!(
        resolve_policy("GLOBAL").unwrap(),
        LabelPolicy::global_default()
    );
    assert_eq!(
        resolve_policy("relative").unwrap(),
        LabelPolicy::relative_default()
    );
    assert!(resolve_policy("psychic").is_err());
}

#[test]
fn test_resolve_port_prefers_flag() {
    // An explicit flag wins regardless of environment
    assert_eq!(resolve_port(Some(3000)), 3000);
}

#[test]
fn test_open_db_creates_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cli_test.db");

    let db = open_db(&path).unwrap();
    db.seed_default_categories().unwrap();
    assert!(path.exists());
    assert!(db.count_categories().unwrap() > 0);
}
