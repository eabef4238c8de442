//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::store::default_config_path;

/// peerconf: per-address agent connection parameters
///
/// Resolves protocol-agent connection parameters per network address from an
/// ordered definition list, and keeps that list in canonical form.
#[derive(Debug, Parser)]
#[command(name = "peerconf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Path to the configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for peerconf
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "peerconf.toml")]
        output: PathBuf,
    },

    /// Canonicalize the definition list
    Compact {
        /// Write the compacted list back to the config file instead of
        /// printing it
        #[arg(long)]
        write: bool,
    },

    /// Resolve agent parameters for a single address
    Resolve {
        /// Target address, e.g. 10.0.0.1 or fe80::1%3
        address: String,

        /// Print the resolved parameters as JSON
        #[arg(long)]
        json: bool,

        /// Treat wildcard patterns as anchored regular expressions
        #[arg(long = "regex-patterns")]
        regex_patterns: bool,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns the configuration file path: `--config` if given, otherwise
    /// the platform default location.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(default_config_path)
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
