//! Tests for layered settings loading

use std::fs;
use std::path::PathBuf;

use rstest::rstest;
use tempfile::tempdir;

use orgchart::application::ApplicationError;
use orgchart::config::{local_config_path, Settings};
use orgchart::domain::RedoPolicy;
use orgchart::util::testing;

#[test]
fn given_no_files_when_loading_then_defaults() {
    testing::init_test_setup();
    let dir = tempdir().unwrap();
    let settings = Settings::load_from(None, Some(dir.path())).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn given_local_file_when_loading_then_values_applied() {
    testing::init_test_setup();
    let dir = tempdir().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "redo_policy = \"retain\"\nshow_ids = true\n",
    )
    .unwrap();

    let settings = Settings::load_from(None, Some(dir.path())).unwrap();
    assert_eq!(settings.redo_policy, RedoPolicy::Retain);
    assert!(settings.show_ids);
}

#[test]
fn given_global_and_local_when_loading_then_local_wins() {
    testing::init_test_setup();
    let global_dir = tempdir().unwrap();
    let global = global_dir.path().join("orgchart.toml");
    fs::write(
        &global,
        "redo_policy = \"retain\"\ndefault_chart = \"/charts/main.toml\"\n",
    )
    .unwrap();

    let chart_dir = tempdir().unwrap();
    fs::write(
        local_config_path(chart_dir.path()),
        "redo_policy = \"discard\"\n",
    )
    .unwrap();

    let settings = Settings::load_from(Some(&global), Some(chart_dir.path())).unwrap();
    assert_eq!(settings.redo_policy, RedoPolicy::Discard);
    assert_eq!(
        settings.default_chart,
        Some(PathBuf::from("/charts/main.toml"))
    );
}

#[test]
fn given_missing_global_when_loading_then_skipped() {
    testing::init_test_setup();
    let dir = tempdir().unwrap();
    let settings = Settings::load_from(Some(&dir.path().join("absent.toml")), None).unwrap();
    assert_eq!(settings, Settings::default());
}

#[rstest]
#[case::bad_policy("redo_policy = \"keep\"\n")]
#[case::wrong_type("show_ids = \"yes please\"\n")]
#[case::not_toml("redo_policy = \n")]
fn given_invalid_local_file_when_loading_then_config_error(#[case] content: &str) {
    testing::init_test_setup();
    let dir = tempdir().unwrap();
    fs::write(local_config_path(dir.path()), content).unwrap();

    assert!(matches!(
        Settings::load_from(None, Some(dir.path())),
        Err(ApplicationError::Config { .. })
    ));
}

#[test]
fn given_tilde_chart_path_when_loading_then_expanded() {
    testing::init_test_setup();
    let dir = tempdir().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "default_chart = \"~/org/chart.toml\"\n",
    )
    .unwrap();

    let settings = Settings::load_from(None, Some(dir.path())).unwrap();
    let chart = settings.default_chart.unwrap();
    assert!(!chart.to_string_lossy().starts_with('~'));
    assert!(chart.ends_with("org/chart.toml"));
}

#[test]
fn given_settings_when_rendering_toml_then_parses_back() {
    let settings = Settings {
        redo_policy: RedoPolicy::Retain,
        show_ids: true,
        default_chart: None,
    };
    let text = settings.to_toml().unwrap();
    assert!(text.contains("redo_policy = \"retain\""));
    let back: Settings = toml::from_str(&text).unwrap();
    assert_eq!(back, settings);
}
