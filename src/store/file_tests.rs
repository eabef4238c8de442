//! Tests for the file-backed TOML store.

use super::file::{TomlStore, default_config_template, write_default_config};
use super::{ConfigStore, StoreError};
use crate::definition::{AgentOverrides, Definition, DefinitionList, PeerConfig};

fn sample_config() -> PeerConfig {
    PeerConfig {
        defaults: AgentOverrides {
            timeout: Some(5000),
            ..AgentOverrides::default()
        },
        definitions: DefinitionList::from(vec![Definition {
            specifics: vec!["10.0.0.1".parse().unwrap()],
            overrides: AgentOverrides {
                retries: Some(3),
                ..AgentOverrides::default()
            },
            ..Definition::default()
        }]),
    }
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = TomlStore::new(dir.path().join("peerconf.toml"));

    let config = sample_config();
    store.save(&config).unwrap();

    assert_eq!(store.load().unwrap(), config);
}

#[test]
fn load_missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = TomlStore::new(dir.path().join("absent.toml"));

    let err = store.load().unwrap_err();
    assert!(matches!(err, StoreError::FileRead { .. }));
}

#[test]
fn load_malformed_content_is_a_definition_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("peerconf.toml");
    std::fs::write(
        &path,
        r#"
[[definition]]
ranges = [{ begin = "10.0.0.9", end = "10.0.0.1" }]
"#,
    )
    .unwrap();

    let err = TomlStore::new(&path).load().unwrap_err();
    assert!(matches!(err, StoreError::MalformedDefinition(_)));
}

#[test]
fn save_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let store = TomlStore::new(dir.path().join("nested/deeper/peerconf.toml"));

    store.save(&sample_config()).unwrap();
    assert!(store.path().exists());
}

#[test]
fn save_leaves_no_temp_file_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("peerconf.toml");
    let store = TomlStore::new(&path);

    store.save(&sample_config()).unwrap();

    let temp_path = format!("{}.tmp", path.display());
    assert!(!std::path::Path::new(&temp_path).exists());
}

#[test]
fn save_overwrites_previous_content() {
    let dir = tempfile::tempdir().unwrap();
    let store = TomlStore::new(dir.path().join("peerconf.toml"));

    store.save(&sample_config()).unwrap();
    store.save(&PeerConfig::default()).unwrap();

    assert_eq!(store.load().unwrap(), PeerConfig::default());
}

#[test]
fn default_template_parses_to_an_empty_config() {
    let config = TomlStore::parse(&default_config_template()).unwrap();
    assert!(config.defaults.is_empty());
    assert!(config.definitions.is_empty());
}

#[test]
fn write_default_config_produces_a_loadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("peerconf.toml");

    write_default_config(&path).unwrap();

    let config = TomlStore::new(&path).load().unwrap();
    assert!(config.definitions.is_empty());
}
