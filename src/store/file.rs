//! File-backed TOML configuration store.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::definition::PeerConfig;

use super::{ConfigStore, StoreError};

/// File-backed implementation of [`ConfigStore`].
///
/// Stores the peer configuration as a TOML document.
///
/// # Atomic Writes
///
/// Uses the write-to-temp-then-rename pattern:
/// 1. Write to `{path}.tmp`
/// 2. Rename `{path}.tmp` to `{path}`
///
/// This ensures the file is either fully written or not written at all.
#[derive(Debug, Clone)]
pub struct TomlStore {
    path: PathBuf,
}

impl TomlStore {
    /// Creates a store backed by the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the configuration file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MalformedDefinition`] if the content is invalid.
    pub fn parse(content: &str) -> Result<PeerConfig, StoreError> {
        toml::from_str(content).map_err(StoreError::from)
    }

    /// Renders a configuration as a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialize`] if the configuration cannot be
    /// rendered.
    pub fn render(config: &PeerConfig) -> Result<String, StoreError> {
        toml::to_string_pretty(config).map_err(StoreError::from)
    }
}

impl ConfigStore for TomlStore {
    fn load(&self) -> Result<PeerConfig, StoreError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| StoreError::FileRead {
            path: self.path.clone(),
            source: e,
        })?;

        let config = Self::parse(&content)?;
        debug!(
            path = %self.path.display(),
            definitions = config.definitions.len(),
            "loaded peer configuration"
        );
        Ok(config)
    }

    fn save(&self, config: &PeerConfig) -> Result<(), StoreError> {
        let content = Self::render(config)?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::FileWrite {
                    path: self.path.clone(),
                    source: e,
                })?;
            }
        }

        // Append .tmp instead of replacing the extension to avoid conflicts
        // (peerconf.toml -> peerconf.toml.tmp, not peerconf.tmp)
        let temp_path = PathBuf::from(format!("{}.tmp", self.path.display()));

        std::fs::write(&temp_path, content).map_err(|e| StoreError::FileWrite {
            path: temp_path.clone(),
            source: e,
        })?;

        // Atomic rename (on most filesystems)
        std::fs::rename(&temp_path, &self.path).map_err(|e| StoreError::FileWrite {
            path: self.path.clone(),
            source: e,
        })?;

        info!(
            path = %self.path.display(),
            definitions = config.definitions.len(),
            "saved peer configuration"
        );
        Ok(())
    }
}

/// Returns the platform default configuration file path.
///
/// `{config_dir}/peerconf/peerconf.toml`, falling back to the working
/// directory when the platform has no config directory.
#[must_use]
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("peerconf")
        .join("peerconf.toml")
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), StoreError> {
    std::fs::write(path, default_config_template()).map_err(|e| StoreError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# peerconf configuration file
#
# Definitions are matched in document order: the first [[definition]] whose
# specifics, ranges, or patterns match a target address supplies the
# overrides for it. Attributes missing from the winning definition fall back
# to [defaults], then to the built-in protocol defaults.

[defaults]
# Connection timeout in milliseconds (built-in default: 3000)
# timeout = 3000

# Number of connection retries (built-in default: 1)
# retries = 1

# Credentials applied where no definition overrides them
# username = "Administrator"
# password = "password"
# domain = "WORKGROUP"

# [[definition]]
# Individually listed addresses. Zoned IPv6 uses a numeric index: "fe80::1%3"
# specifics = ["10.0.0.1", "10.0.0.2"]
#
# Closed address ranges, begin and end inclusive
# ranges = [{ begin = "10.0.1.1", end = "10.0.1.254" }]
#
# Wildcard patterns matched against the address text, octet-wise:
# "*" matches anything, "0-31" a numeric range, "1,5,8-10" a list
# patterns = ["192.168.0-31.*"]
#
# Overrides for addresses this definition matches
# timeout = 800
# retries = 3
# username = "monitor"
"#
    .to_string()
}
