//! Command execution for the peerconf binary.
//!
//! Loads the configuration through the store, runs the requested operation,
//! and writes results to stdout. Kept separate from `main` so command logic
//! is testable without process plumbing.

use std::path::Path;

use thiserror::Error;

use peerconf::addr::{ParseAddrError, ScopedAddr};
use peerconf::cli::{Cli, Command};
use peerconf::compact::compact;
use peerconf::definition::PeerConfig;
use peerconf::pattern::{IpLikeMatcher, PatternMatcher, RegexMatcher};
use peerconf::resolve::resolve;
use peerconf::store::{ConfigStore, StoreError, TomlStore};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Errors from executing a peerconf command.
#[derive(Debug, Error)]
pub enum RunError {
    /// Configuration could not be loaded or saved.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The target address on the command line does not parse.
    #[error("invalid target address: {0}")]
    Address(#[from] ParseAddrError),

    /// Resolved parameters could not be encoded as JSON.
    #[error("failed to encode parameters as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Executes the parsed command line and returns the text to print.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or saved, or if
/// the target address is invalid.
pub fn execute(cli: &Cli) -> Result<String, RunError> {
    let store = TomlStore::new(cli.config_path());

    match &cli.command {
        Command::Init { output } => init(output),
        Command::Compact { write } => run_compact(&store, *write),
        Command::Resolve {
            address,
            json,
            regex_patterns,
        } => run_resolve(&store, address, *json, *regex_patterns),
    }
}

fn init(output: &Path) -> Result<String, RunError> {
    peerconf::store::write_default_config(output)?;
    Ok(format!(
        "Configuration template written to: {}\n",
        output.display()
    ))
}

fn run_compact(store: &TomlStore, write: bool) -> Result<String, RunError> {
    let config = store.load()?;
    let before = config.definitions.len();

    let compacted = PeerConfig {
        defaults: config.defaults,
        definitions: compact(&config.definitions),
    };
    tracing::info!(
        before,
        after = compacted.definitions.len(),
        "compacted definition list"
    );

    if write {
        store.save(&compacted)?;
        Ok(format!(
            "Compacted {} definition(s) down to {}: {}\n",
            before,
            compacted.definitions.len(),
            store.path().display()
        ))
    } else {
        Ok(TomlStore::render(&compacted)?)
    }
}

fn run_resolve(
    store: &TomlStore,
    address: &str,
    json: bool,
    regex_patterns: bool,
) -> Result<String, RunError> {
    let config = store.load()?;
    let target: ScopedAddr = address.parse()?;

    let matcher: &dyn PatternMatcher = if regex_patterns {
        &RegexMatcher
    } else {
        &IpLikeMatcher
    };
    let params = resolve(&config.definitions, &target, &config.defaults, matcher);

    if json {
        Ok(format!("{}\n", serde_json::to_string_pretty(&params)?))
    } else {
        Ok(format!("{target}: {params}\n"))
    }
}
