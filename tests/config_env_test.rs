//! Environment overrides. Kept in its own test binary: env vars are process-wide.

use std::fs;

use tempfile::tempdir;

use orgchart::application::ApplicationError;
use orgchart::config::{local_config_path, Settings};
use orgchart::domain::RedoPolicy;
use orgchart::util::testing;

#[test]
fn given_env_vars_when_loading_then_override_files() {
    testing::init_test_setup();
    let dir = tempdir().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "redo_policy = \"discard\"\nshow_ids = false\n",
    )
    .unwrap();

    std::env::set_var("ORGCHART_REDO_POLICY", "retain");
    std::env::set_var("ORGCHART_SHOW_IDS", "true");
    let settings = Settings::load_from(None, Some(dir.path())).unwrap();
    assert_eq!(settings.redo_policy, RedoPolicy::Retain);
    assert!(settings.show_ids);

    std::env::set_var("ORGCHART_REDO_POLICY", "sometimes");
    let result = Settings::load_from(None, Some(dir.path()));
    assert!(matches!(result, Err(ApplicationError::Config { .. })));

    std::env::remove_var("ORGCHART_REDO_POLICY");
    std::env::remove_var("ORGCHART_SHOW_IDS");
}
