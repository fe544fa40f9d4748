// Remote feature configuration.
// The document type and the controller that caches it.

pub mod config;
pub mod controller;

pub use config::FeatureConfig;
pub use controller::{
    CACHE_ITEM, CACHE_NAMESPACE, DEFAULT_ENDPOINT, DeveloperSettings, FRESHNESS_THRESHOLD,
    feature_config_url,
};
