//! Where the search path comes from.
//!
//! Resolution reads `PATH` (and `PATHEXT` on Windows) through
//! [`EnvProvider`] so the doctor can be pointed at a synthetic environment
//! in tests instead of the one it was launched with.

use std::ffi::OsString;

/// Source of the variables that drive executable lookup.
pub trait EnvProvider: Send + Sync {
    /// Raw value of `key`, or `None` when it is unset.
    fn get(&self, key: &str) -> Option<OsString>;
}

/// The environment the doctor runs in, which is also the one the plugin
/// hands to the gateway it spawns.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl EnvProvider for SystemEnv {
    fn get(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MockEnv {
    vars: std::collections::HashMap<String, OsString>,
}

#[cfg(test)]
impl MockEnv {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
impl EnvProvider for MockEnv {
    fn get(&self, key: &str) -> Option<OsString> {
        self.vars.get(key).cloned()
    }
}
