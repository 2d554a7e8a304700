use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

fn temp_dir(label: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("devcommits_{label}_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    dir
}

#[test]
fn missing_url_fails_gateway_initialization() {
    let err = GatewayConfig::from_settings(Settings {
        supabase_anon_key: Some("anon".into()),
        ..Settings::default()
    })
    .expect_err("must fail");
    assert!(matches!(err, ConfigError::Missing("supabase_url")));
}

#[test]
fn blank_anon_key_counts_as_missing() {
    let err = GatewayConfig::new("https://demo.supabase.co", "   ").expect_err("must fail");
    assert!(matches!(err, ConfigError::Missing("supabase_anon_key")));
}

#[test]
fn rejects_non_http_scheme() {
    let err = GatewayConfig::new("ftp://demo.supabase.co", "anon").expect_err("must fail");
    assert!(matches!(err, ConfigError::InvalidUrl { .. }));
}

#[test]
fn base_url_gains_trailing_slash_for_joins() {
    let config = GatewayConfig::new("http://127.0.0.1:54321/proxy", "anon").expect("config");
    assert_eq!(config.supabase_url.as_str(), "http://127.0.0.1:54321/proxy/");
    assert_eq!(
        config.supabase_url.join("rest/v1/commits").expect("join").as_str(),
        "http://127.0.0.1:54321/proxy/rest/v1/commits"
    );
    assert_eq!(config.table, DEFAULT_TABLE);
    assert_eq!(
        config.request_timeout,
        Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
    );
}

#[test]
fn env_overrides_file_and_flags_override_env() {
    let mut settings = Settings {
        supabase_url: Some("https://file.supabase.co".into()),
        supabase_anon_key: Some("file-key".into()),
        ..Settings::default()
    };

    settings.apply_env_with(lookup_from(&[
        ("VITE_SUPABASE_URL", "https://vite.supabase.co"),
        ("SUPABASE_ANON_KEY", "env-key"),
        ("APP__REQUEST_TIMEOUT_SECS", "5"),
    ]));
    assert_eq!(settings.supabase_url.as_deref(), Some("https://vite.supabase.co"));
    assert_eq!(settings.supabase_anon_key.as_deref(), Some("env-key"));
    assert_eq!(settings.request_timeout_secs, Some(5));

    settings.apply_overrides(Some("https://flag.supabase.co".into()), None);
    let config = GatewayConfig::from_settings(settings).expect("config");
    assert_eq!(config.supabase_url.as_str(), "https://flag.supabase.co/");
    assert_eq!(config.anon_key, "env-key");
    assert_eq!(config.request_timeout, Duration::from_secs(5));
}

#[test]
fn reads_settings_file() {
    let dir = temp_dir("config_file");
    let path = dir.join("devcommits.toml");
    fs::write(
        &path,
        "supabase_url = \"https://file.supabase.co\"\nsupabase_anon_key = \"k\"\ntable = \"dev_commits\"\n",
    )
    .expect("write");

    let settings = Settings::from_file(Some(&path)).expect("settings");
    assert_eq!(settings.table.as_deref(), Some("dev_commits"));
    let config = GatewayConfig::from_settings(settings).expect("config");
    assert_eq!(config.table, "dev_commits");

    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = temp_dir("config_missing");
    let err = Settings::from_file(Some(&dir.join("absent.toml"))).expect_err("must fail");
    assert!(matches!(err, ConfigError::Read { .. }));
    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn malformed_file_reports_parse_error() {
    let dir = temp_dir("config_malformed");
    let path = dir.join("devcommits.toml");
    fs::write(&path, "supabase_url = [").expect("write");
    let err = Settings::from_file(Some(&path)).expect_err("must fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
    fs::remove_dir_all(dir).expect("cleanup");
}
