//! Hard-coded agent parameter defaults.
//!
//! Last level of the fallback chain: a definition override shadows the global
//! default, which shadows these.

use std::time::Duration;

/// Default connection timeout in milliseconds.
pub const TIMEOUT_MS: u64 = 3000;

/// Default number of connection retries.
pub const RETRIES: u32 = 1;

/// Default account name.
pub const USERNAME: &str = "Administrator";

/// Default account password.
pub const PASSWORD: &str = "password";

/// Default domain/workgroup.
pub const DOMAIN: &str = "WORKGROUP";

/// Default connection timeout as a Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_millis(TIMEOUT_MS)
}
