//! Query path through the real config loader, registry and store, driven
//! the way the binary drives it.

use std::path::PathBuf;

use presenced::errors::QueryError;
use presenced::{commands, parse_cli_args, CliCommand, PresenceStore, Registry};

fn write_device_table(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("devices.json");
    std::fs::write(&path, r#"{ "phone": "aa:bb:cc:dd:ee:ff" }"#)
        .expect("device table should write");
    path
}

#[tokio::test]
async fn query_for_configured_device_succeeds() {
    let dir = tempfile::tempdir().expect("tempdir should create");
    let config = write_device_table(&dir);
    let state_dir = dir.path().join("state");

    PresenceStore::new(&state_dir)
        .write("phone", chrono::Utc::now().timestamp())
        .expect("sighting should record");

    commands::handle_query(
        "phone".to_string(),
        Some(config),
        Some(state_dir),
        1800,
        true,
    )
    .await
    .expect("query for a configured device should succeed");
}

#[tokio::test]
async fn query_for_unconfigured_device_is_an_unknown_device_error() {
    let dir = tempfile::tempdir().expect("tempdir should create");
    let config = write_device_table(&dir);

    let err = commands::handle_query(
        "laptop".to_string(),
        Some(config),
        Some(dir.path().join("state")),
        1800,
        false,
    )
    .await
    .expect_err("unconfigured name must fail");

    let query_err = err
        .downcast_ref::<QueryError>()
        .expect("error should carry the typed QueryError");
    assert!(matches!(query_err, QueryError::UnknownDevice(_)));
}

#[tokio::test]
async fn query_with_missing_config_file_fails_as_config_error() {
    let dir = tempfile::tempdir().expect("tempdir should create");

    let err = commands::handle_query(
        "phone".to_string(),
        Some(dir.path().join("absent.json")),
        Some(dir.path().join("state")),
        1800,
        false,
    )
    .await
    .expect_err("missing device table must fail");

    assert!(err
        .downcast_ref::<presenced::errors::ConfigError>()
        .is_some());
}

#[test]
fn parsed_cli_command_carries_query_arguments_through() {
    let parsed = parse_cli_args([
        "presenced",
        "query",
        "phone",
        "--config=/etc/presenced/devices.json",
        "--timeout",
        "600",
        "--on-off",
    ])
    .expect("query invocation should parse");

    match parsed {
        CliCommand::Query {
            name,
            config,
            timeout_secs,
            on_off,
            ..
        } => {
            assert_eq!(name, "phone");
            assert_eq!(config, Some(PathBuf::from("/etc/presenced/devices.json")));
            assert_eq!(timeout_secs, 600);
            assert!(on_off);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn device_table_load_order_drives_reverse_lookup_winner() {
    let dir = tempfile::tempdir().expect("tempdir should create");
    let path = dir.path().join("devices.json");
    // Two names, one shared address: the first in (sorted) load order wins.
    std::fs::write(
        &path,
        r#"{ "bravo": "aa:bb:cc:dd:ee:ff", "alpha": "aa:bb:cc:dd:ee:ff" }"#,
    )
    .expect("device table should write");

    let devices = presenced::load_device_table(&path).expect("table should load");
    let registry = Registry::from_entries(devices).expect("registry should build");

    let winner = registry
        .lookup_by_address("aa:bb:cc:dd:ee:ff".parse().expect("mac"))
        .expect("address is configured");
    assert_eq!(winner.name, "alpha");
}
