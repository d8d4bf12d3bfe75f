//! Registry credentials and the source/target merge.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Registry;

/// Credentials for a single registry, in the shape the transfer tool's
/// security file expects.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Security {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Allow plain HTTP / unverified TLS for this registry.
    #[serde(default)]
    pub insecure: bool,
}

impl fmt::Debug for Security {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Security")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("insecure", &self.insecure)
            .finish()
    }
}

/// Credential sets keyed by registry host.
pub type SecurityMap = BTreeMap<Registry, Security>;

/// Merge source and target credential sets into one.
///
/// Source entries are inserted first, then target entries; on a key
/// collision the target entry wins.
pub fn merge_security(source: SecurityMap, target: SecurityMap) -> SecurityMap {
    let mut merged = source;
    merged.extend(target);
    merged
}
