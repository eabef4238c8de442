//! Durable configuration storage and copy-on-write publication.
//!
//! This module provides abstractions for loading and saving the peer
//! configuration, plus the snapshot handle through which a running host
//! observes it:
//! - The store collaborator trait ([`ConfigStore`])
//! - A file-backed TOML implementation ([`TomlStore`])
//! - The copy-on-write configuration handle ([`ConfigHandle`])

mod file;

#[cfg(test)]
mod file_tests;
#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use file::{TomlStore, default_config_path, default_config_template, write_default_config};

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use tracing::debug;

use crate::definition::PeerConfig;

/// Errors that can occur during configuration store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read the configuration file.
    #[error("failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The configuration content is not well formed: invalid TOML, an
    /// unparsable address, or a definition violating a range invariant.
    #[error("malformed definition list: {0}")]
    MalformedDefinition(#[from] toml::de::Error),

    /// Failed to write the configuration file.
    #[error("failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Failed to serialize the configuration.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Abstraction for durable peer configuration storage.
///
/// Implementations own the encoding. The core only sees a [`PeerConfig`]
/// value; invariant violations in stored content (inverted ranges, malformed
/// addresses) surface as [`StoreError::MalformedDefinition`] at load time.
///
/// # Testing
///
/// Use [`mock::MockStore`] in tests to avoid filesystem dependencies.
pub trait ConfigStore: Send + Sync {
    /// Loads the configuration from durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be read or is malformed.
    fn load(&self) -> Result<PeerConfig, StoreError>;

    /// Saves the configuration to durable storage.
    ///
    /// Implementations should use atomic write semantics (write to a temp
    /// file, then rename) so a crash mid-write cannot corrupt the previous
    /// content.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be written.
    fn save(&self, config: &PeerConfig) -> Result<(), StoreError>;
}

/// Copy-on-write handle to the active configuration.
///
/// Readers take one consistent snapshot per lookup; writers publish a whole
/// new configuration rather than mutating the active one in place. A
/// concurrent `resolve` therefore always observes either the fully-old or
/// the fully-new configuration, never a partially updated one.
///
/// # Examples
///
/// ```
/// use peerconf::definition::PeerConfig;
/// use peerconf::store::ConfigHandle;
///
/// let handle = ConfigHandle::new(PeerConfig::default());
/// let snapshot = handle.snapshot();
///
/// handle.publish(PeerConfig::default());
/// // `snapshot` still sees the configuration it was taken from.
/// assert!(snapshot.definitions.is_empty());
/// ```
#[derive(Debug)]
pub struct ConfigHandle {
    active: RwLock<Arc<PeerConfig>>,
}

impl ConfigHandle {
    /// Creates a handle publishing the given configuration.
    #[must_use]
    pub fn new(config: PeerConfig) -> Self {
        Self {
            active: RwLock::new(Arc::new(config)),
        }
    }

    /// Returns the currently published configuration snapshot.
    ///
    /// The returned reference stays valid (and unchanged) across subsequent
    /// [`publish`](Self::publish) calls; take a fresh snapshot per lookup.
    #[must_use]
    pub fn snapshot(&self) -> Arc<PeerConfig> {
        // The lock only ever guards a fully published Arc, so a poisoned
        // lock still holds a consistent snapshot.
        Arc::clone(
            &self
                .active
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Atomically replaces the published configuration.
    pub fn publish(&self, config: PeerConfig) {
        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        *active = Arc::new(config);
        debug!("published new peer configuration");
    }

    /// Reloads the configuration from `store` and publishes it.
    ///
    /// On error the previously published configuration stays active.
    ///
    /// # Errors
    ///
    /// Returns the store's load error.
    pub fn reload<S: ConfigStore + ?Sized>(&self, store: &S) -> Result<(), StoreError> {
        let config = store.load()?;
        self.publish(config);
        Ok(())
    }
}

impl Default for ConfigHandle {
    fn default() -> Self {
        Self::new(PeerConfig::default())
    }
}

/// Mock configuration store for testing.
///
/// Allows tests to inject load results and capture saved configurations.
#[cfg(test)]
pub mod mock {
    use super::{ConfigStore, PeerConfig, StoreError};
    use std::sync::RwLock;

    /// A mock implementation of [`ConfigStore`] for testing.
    #[derive(Debug)]
    pub struct MockStore {
        load_result: Result<PeerConfig, ()>,
        saved: RwLock<Option<PeerConfig>>,
    }

    impl MockStore {
        /// Creates a mock whose `load` returns the given configuration.
        #[must_use]
        pub fn with_config(config: PeerConfig) -> Self {
            Self {
                load_result: Ok(config),
                saved: RwLock::new(None),
            }
        }

        /// Creates a mock whose `load` fails with a malformed-content error.
        #[must_use]
        pub fn failing() -> Self {
            Self {
                load_result: Err(()),
                saved: RwLock::new(None),
            }
        }

        /// Returns the last saved configuration, if any.
        #[must_use]
        pub fn saved_config(&self) -> Option<PeerConfig> {
            self.saved.read().unwrap().clone()
        }

        fn malformed() -> StoreError {
            match toml::from_str::<PeerConfig>("definition = 1") {
                Ok(_) => unreachable!("scalar cannot parse as a definition list"),
                Err(e) => e.into(),
            }
        }
    }

    impl ConfigStore for MockStore {
        fn load(&self) -> Result<PeerConfig, StoreError> {
            self.load_result
                .clone()
                .map_err(|()| Self::malformed())
        }

        fn save(&self, config: &PeerConfig) -> Result<(), StoreError> {
            *self.saved.write().unwrap() = Some(config.clone());
            Ok(())
        }
    }
}
