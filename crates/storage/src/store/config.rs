#![forbid(unsafe_code)]

use std::time::Duration;

const DEFAULT_BACKUP_SUFFIX: &str = "_backup";
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Appended to the file stem of the primary database to name the backup copy.
    /// Must be non-empty and free of path separators; `save` rejects anything else.
    pub backup_suffix: String,
    /// Run `REINDEX` before load and after each committed save. On by default;
    /// turning it off departs from the store's contract of an unconditional
    /// pass after every commit.
    pub integrity_pass: bool,
    pub busy_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
            integrity_pass: true,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

impl StoreConfig {
    /// Defaults overridden by `CHANLIST_BACKUP_SUFFIX`, `CHANLIST_INTEGRITY_PASS`
    /// and `CHANLIST_BUSY_TIMEOUT_MS`. Unparseable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(suffix) = lookup("CHANLIST_BACKUP_SUFFIX") {
            let suffix = suffix.trim();
            if !suffix.is_empty() && !suffix.contains(['/', '\\']) {
                config.backup_suffix = suffix.to_string();
            }
        }
        if let Some(raw) = lookup("CHANLIST_INTEGRITY_PASS") {
            if let Some(enabled) = parse_bool(&raw) {
                config.integrity_pass = enabled;
            }
        }
        if let Some(raw) = lookup("CHANLIST_BUSY_TIMEOUT_MS") {
            if let Ok(ms) = raw.trim().parse::<u64>() {
                config.busy_timeout = Duration::from_millis(ms);
            }
        }

        config
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
