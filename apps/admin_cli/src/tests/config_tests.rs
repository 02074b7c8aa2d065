use super::{apply_env, apply_file, load_settings, Settings};

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        "server_url = \"https://admin.example.com\"\nrequest_timeout_secs = 5\n",
    )
    .expect("apply file");
    assert_eq!(settings.server_url, "https://admin.example.com");
    assert_eq!(settings.request_timeout_secs, 5);
}

#[test]
fn partial_file_keeps_remaining_defaults() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "request_timeout_secs = 9\n").expect("apply file");
    assert_eq!(settings.server_url, Settings::default().server_url);
    assert_eq!(settings.request_timeout_secs, 9);
}

#[test]
fn malformed_file_is_an_error() {
    let mut settings = Settings::default();
    assert!(apply_file(&mut settings, "request_timeout_secs = \"soon\"").is_err());
}

#[test]
fn app_prefixed_env_wins_over_plain_env() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        env_from(&[
            ("ADMIN_SERVER_URL", "http://plain:1"),
            ("APP__SERVER_URL", "http://prefixed:2"),
        ]),
    );
    assert_eq!(settings.server_url, "http://prefixed:2");
}

#[test]
fn unparsable_timeout_env_is_ignored() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        env_from(&[("APP__REQUEST_TIMEOUT_SECS", "forever")]),
    );
    assert_eq!(settings.request_timeout_secs, 30);
}

#[test]
fn explicit_config_path_is_read() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("admin_cli_config_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("custom.toml");
    fs::write(&path, "request_timeout_secs = 12\n").expect("write config");

    let settings = load_settings(Some(&path)).expect("load");
    assert_eq!(settings.request_timeout_secs, 12);

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn missing_explicit_config_path_is_an_error() {
    let path = env::temp_dir().join("admin_cli_config_test_does_not_exist.toml");
    assert!(load_settings(Some(&path)).is_err());
}
