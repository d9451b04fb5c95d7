//! Tests for settings layering and validation.

use nexus::Settings;
use nexus_core::GuildId;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn minimal() -> HashMap<String, String> {
    env(&[("BOT_TOKEN", "token"), ("CLIENT_ID", "123")])
}

#[test]
fn test_missing_token_is_rejected() {
    let result = Settings::from_sources(None, Some(env(&[("CLIENT_ID", "123")])));
    let err = result.unwrap_err();
    assert!(err.to_string().contains("BOT_TOKEN"));
}

#[test]
fn test_missing_client_id_is_rejected() {
    let result = Settings::from_sources(None, Some(env(&[("BOT_TOKEN", "token")])));
    assert!(result.unwrap_err().to_string().contains("CLIENT_ID"));
}

#[test]
fn test_non_numeric_client_id_is_rejected() {
    let result = Settings::from_sources(
        None,
        Some(env(&[("BOT_TOKEN", "token"), ("CLIENT_ID", "abc")])),
    );
    assert!(result.is_err());
}

#[test]
fn test_defaults() {
    let settings = Settings::from_sources(None, Some(minimal())).unwrap();

    assert_eq!(settings.application_id().unwrap(), 123);
    assert_eq!(settings.dev_guild().unwrap(), None);
    assert_eq!(settings.dev_user(), None);
    assert!(*settings.antispam_enabled());
    assert!(!*settings.block_links());
    assert!(!*settings.auto_exit_on_fail());
    assert_eq!(*settings.port(), 3000);
    assert_eq!(settings.data_dir(), &PathBuf::from("./data"));
    assert_eq!(*settings.autopost_poll_secs(), 60);
}

#[test]
fn test_environment_overrides() {
    let mut vars = minimal();
    vars.extend(env(&[
        ("PORT", "8080"),
        ("BLOCK_LINKS", "true"),
        ("GUILD_ID", "555"),
        ("DEV_USER_ID", ""),
    ]));
    let settings = Settings::from_sources(None, Some(vars)).unwrap();

    assert_eq!(*settings.port(), 8080);
    assert!(*settings.block_links());
    assert_eq!(settings.dev_guild().unwrap(), Some(GuildId(555)));
    assert_eq!(settings.dev_user(), None);
}

#[test]
fn test_user_file_overrides_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = 9000\nserver_name = \"Forge\"\nantispam_enabled = false").unwrap();

    let settings = Settings::from_sources(Some(file.path()), Some(minimal())).unwrap();
    assert_eq!(*settings.port(), 9000);
    assert!(!*settings.antispam_enabled());
    assert_eq!(settings.brand_overrides().server_name.as_deref(), Some("Forge"));
}

#[test]
fn test_environment_beats_user_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = 9000").unwrap();

    let mut vars = minimal();
    vars.insert("PORT".into(), "7000".into());
    let settings = Settings::from_sources(Some(file.path()), Some(vars)).unwrap();
    assert_eq!(*settings.port(), 7000);
}

#[test]
fn test_missing_user_file_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let settings =
        Settings::from_sources(Some(&dir.path().join("absent.toml")), Some(minimal())).unwrap();
    assert_eq!(*settings.port(), 3000);
}

#[test]
fn test_empty_brand_values_are_unset() {
    let mut vars = minimal();
    vars.insert("BRAND_COLOR".into(), "#FF0000".into());
    let settings = Settings::from_sources(None, Some(vars)).unwrap();

    let overrides = settings.brand_overrides();
    assert_eq!(overrides.server_name, None);
    assert_eq!(overrides.color.as_deref(), Some("#FF0000"));
    assert_eq!(overrides.banner_url, None);
    assert_eq!(overrides.logo_url, None);
}

#[test]
fn test_automation_settings_mapping() {
    let mut vars = minimal();
    vars.extend(env(&[
        ("ANTISPAM_ENABLED", "false"),
        ("BLOCK_LINKS", "true"),
        ("AUTO_EXIT_ON_FAIL", "true"),
        ("GUILD_ID", "77"),
        ("AUTOPOST_POLL_SECS", "0"),
    ]));
    let settings = Settings::from_sources(None, Some(vars)).unwrap();
    let automation = settings.automation_settings().unwrap();

    assert!(!*automation.anti_spam());
    assert!(*automation.block_links());
    assert!(*automation.strict_exit());
    assert_eq!(*automation.dev_guild(), Some(GuildId(77)));
    assert_eq!(automation.autopost_poll().as_secs(), 1);
    assert_eq!(automation.version(), "3.3.1");
}

#[test]
fn test_debug_redacts_token() {
    let mut vars = minimal();
    vars.insert("BOT_TOKEN".into(), "super-secret".into());
    let settings = Settings::from_sources(None, Some(vars)).unwrap();
    assert!(!format!("{:?}", settings).contains("super-secret"));
}
