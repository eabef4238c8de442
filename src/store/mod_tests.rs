//! Tests for the configuration handle and store trait plumbing.

use std::sync::Arc;
use std::thread;

use super::mock::MockStore;
use super::{ConfigHandle, ConfigStore, StoreError};
use crate::definition::{AgentOverrides, Definition, DefinitionList, PeerConfig};

fn config_with_timeout(ms: u64) -> PeerConfig {
    PeerConfig {
        defaults: AgentOverrides {
            timeout: Some(ms),
            ..AgentOverrides::default()
        },
        definitions: DefinitionList::new(),
    }
}

// ============================================================================
// ConfigHandle
// ============================================================================

#[test]
fn snapshot_returns_published_config() {
    let handle = ConfigHandle::new(config_with_timeout(100));
    assert_eq!(handle.snapshot().defaults.timeout, Some(100));
}

#[test]
fn publish_swaps_the_snapshot() {
    let handle = ConfigHandle::new(config_with_timeout(100));
    handle.publish(config_with_timeout(200));
    assert_eq!(handle.snapshot().defaults.timeout, Some(200));
}

#[test]
fn old_snapshot_is_unaffected_by_publish() {
    let handle = ConfigHandle::new(config_with_timeout(100));
    let old = handle.snapshot();

    handle.publish(config_with_timeout(200));

    assert_eq!(old.defaults.timeout, Some(100));
    assert_eq!(handle.snapshot().defaults.timeout, Some(200));
}

#[test]
fn reload_publishes_the_store_content() {
    let handle = ConfigHandle::default();
    let store = MockStore::with_config(config_with_timeout(300));

    handle.reload(&store).unwrap();
    assert_eq!(handle.snapshot().defaults.timeout, Some(300));
}

#[test]
fn failed_reload_keeps_the_active_config() {
    let handle = ConfigHandle::new(config_with_timeout(100));
    let store = MockStore::failing();

    let err = handle.reload(&store).unwrap_err();
    assert!(matches!(err, StoreError::MalformedDefinition(_)));
    assert_eq!(handle.snapshot().defaults.timeout, Some(100));
}

#[test]
fn concurrent_snapshots_see_whole_configs() {
    let handle = Arc::new(ConfigHandle::new(config_with_timeout(0)));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let handle = Arc::clone(&handle);
            thread::spawn(move || {
                for _ in 0..500 {
                    let snapshot = handle.snapshot();
                    // A snapshot is always one of the published values,
                    // never a partially updated one.
                    assert!(snapshot.defaults.timeout.is_some());
                }
            })
        })
        .collect();

    let writer = {
        let handle = Arc::clone(&handle);
        thread::spawn(move || {
            for ms in 1..=500 {
                handle.publish(config_with_timeout(ms));
            }
        })
    };

    for reader in readers {
        reader.join().unwrap();
    }
    writer.join().unwrap();
}

// ============================================================================
// MockStore
// ============================================================================

#[test]
fn mock_store_captures_saves() {
    let store = MockStore::with_config(PeerConfig::default());
    assert!(store.saved_config().is_none());

    let config = PeerConfig {
        definitions: DefinitionList::from(vec![Definition {
            specifics: vec!["10.0.0.1".parse().unwrap()],
            ..Definition::default()
        }]),
        ..PeerConfig::default()
    };
    store.save(&config).unwrap();

    assert_eq!(store.saved_config().unwrap(), config);
}
