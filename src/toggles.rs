// Local developer toggles.
// Boolean settings persisted through the key-value store, defaulting to off.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::cache::{KeyValueStore, load_json, save_json};
use crate::error::DevFlagsError;

/// Durable-store namespace for toggle values.
pub const TOGGLES_NAMESPACE: &str = "user-defaults";

/// A developer setting that can be switched on or off locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    DoNotPostImageRecommendationsEdit,
    EnableAltTextExperimentForEn,
    AlwaysShowAltTextEntryPoint,
    SendAnalyticsToWmfLabs,
}

impl Toggle {
    pub const ALL: [Toggle; 4] = [
        Toggle::DoNotPostImageRecommendationsEdit,
        Toggle::EnableAltTextExperimentForEn,
        Toggle::AlwaysShowAltTextEntryPoint,
        Toggle::SendAnalyticsToWmfLabs,
    ];

    /// Item name in the durable store.
    pub fn key(&self) -> &'static str {
        match self {
            Toggle::DoNotPostImageRecommendationsEdit => {
                "developer-settings-do-not-post-image-recommendations-edit"
            }
            Toggle::EnableAltTextExperimentForEn => {
                "developer-settings-enable-alt-text-experiment-for-en"
            }
            Toggle::AlwaysShowAltTextEntryPoint => "always-show-alt-text-entry-point",
            Toggle::SendAnalyticsToWmfLabs => "developer-settings-send-analytics-to-wmf-labs",
        }
    }

    /// Short name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Toggle::DoNotPostImageRecommendationsEdit => "do-not-post-image-recommendations-edit",
            Toggle::EnableAltTextExperimentForEn => "enable-alt-text-experiment-for-en",
            Toggle::AlwaysShowAltTextEntryPoint => "always-show-alt-text-entry-point",
            Toggle::SendAnalyticsToWmfLabs => "send-analytics-to-wmf-labs",
        }
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Toggle {
    type Err = DevFlagsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Toggle::ALL
            .into_iter()
            .find(|toggle| toggle.name() == s)
            .ok_or_else(|| DevFlagsError::InvalidToggle(s.to_string()))
    }
}

/// Reads and writes developer toggles.
#[derive(Debug)]
pub struct DeveloperToggles<K> {
    store: K,
}

impl<K: KeyValueStore> DeveloperToggles<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    /// Current value; missing or unreadable values read as `false`.
    pub fn get(&self, toggle: Toggle) -> bool {
        load_json::<bool, _>(&self.store, TOGGLES_NAMESPACE, toggle.key())
            .ok()
            .flatten()
            .unwrap_or(false)
    }

    /// Persist a new value. Failures are logged and otherwise ignored.
    pub fn set(&self, toggle: Toggle, value: bool) {
        if let Err(err) = save_json(&self.store, TOGGLES_NAMESPACE, toggle.key(), &value) {
            warn!(toggle = %toggle, error = %err, "failed to persist developer toggle");
        }
    }

    pub fn all(&self) -> Vec<(Toggle, bool)> {
        Toggle::ALL
            .into_iter()
            .map(|toggle| (toggle, self.get(toggle)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{FileStore, MemoryStore};
    use tempfile::TempDir;

    #[test]
    fn test_defaults_to_false() {
        let toggles = DeveloperToggles::new(MemoryStore::new());
        assert!(toggles.all().iter().all(|(_, value)| !value));
    }

    #[test]
    fn test_set_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();

        DeveloperToggles::new(FileStore::new(temp_dir.path()))
            .set(Toggle::SendAnalyticsToWmfLabs, true);

        let toggles = DeveloperToggles::new(FileStore::new(temp_dir.path()));
        assert!(toggles.get(Toggle::SendAnalyticsToWmfLabs));
        assert!(!toggles.get(Toggle::AlwaysShowAltTextEntryPoint));

        toggles.set(Toggle::SendAnalyticsToWmfLabs, false);
        assert!(!toggles.get(Toggle::SendAnalyticsToWmfLabs));
    }

    #[test]
    fn test_garbage_reads_as_false() {
        let store = MemoryStore::new();
        store
            .save_bytes(
                TOGGLES_NAMESPACE,
                Toggle::EnableAltTextExperimentForEn.key(),
                b"\"yes\"",
            )
            .unwrap();

        let toggles = DeveloperToggles::new(store);
        assert!(!toggles.get(Toggle::EnableAltTextExperimentForEn));
    }

    #[test]
    fn test_parse_names() {
        for toggle in Toggle::ALL {
            assert_eq!(toggle.name().parse::<Toggle>().unwrap(), toggle);
        }
        assert!(matches!(
            "nope".parse::<Toggle>(),
            Err(DevFlagsError::InvalidToggle(_))
        ));
    }
}
