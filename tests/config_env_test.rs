//! ORGTREE_* environment overrides.
//!
//! Kept in its own test binary with a single test: environment variables are
//! process-wide, and the file-based config tests must not observe them.

use std::env;
use std::fs;

use tempfile::TempDir;

use orgtree::application::ApplicationError;
use orgtree::config::{local_config_path, Settings};

const VARS: [&str; 4] = [
    "ORGTREE_LABEL_FIELD",
    "ORGTREE_EXPAND_DEPTH",
    "ORGTREE_STRICT",
    "ORGTREE_PRETTY",
];

#[test]
fn given_orgtree_env_vars_when_loading_then_override_local_config() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let local = local_config_path(dir.path());
    fs::write(&local, "label_field = \"email\"\nexpand_depth = 1\n").unwrap();

    // Act: env beats the local file
    env::set_var("ORGTREE_LABEL_FIELD", "title");
    env::set_var("ORGTREE_EXPAND_DEPTH", "3");
    env::set_var("ORGTREE_STRICT", "true");
    env::set_var("ORGTREE_PRETTY", "false");
    let overridden = Settings::load_from(None, Some(&local));

    // Act: negative depth is rejected instead of dropped
    env::set_var("ORGTREE_EXPAND_DEPTH", "-1");
    let negative = Settings::load_from(None, Some(&local));

    env::set_var("ORGTREE_EXPAND_DEPTH", "deep");
    let garbage = Settings::load_from(None, Some(&local));

    for var in VARS {
        env::remove_var(var);
    }
    let file_only = Settings::load_from(None, Some(&local));

    // Assert
    let settings = overridden.expect("load with env overrides");
    assert_eq!(settings.label_field, "title");
    assert_eq!(settings.expand_depth, Some(3));
    assert!(settings.strict);
    assert!(!settings.pretty);

    match negative {
        Err(ApplicationError::Config { message }) => {
            assert!(message.contains("ORGTREE_EXPAND_DEPTH"), "message: {message}");
        }
        other => panic!("expected config error, got {other:?}"),
    }
    assert!(matches!(garbage, Err(ApplicationError::Config { .. })));

    let settings = file_only.expect("load without env");
    assert_eq!(settings.label_field, "email");
    assert_eq!(settings.expand_depth, Some(1));
    assert!(!settings.strict);
    assert!(settings.pretty);
}
