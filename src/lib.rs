// devflags: developer settings and a remote feature-configuration cache.
// Config is served from memory, then a durable cache younger than three
// hours, and refreshed from the network on demand.

pub mod cache;
pub mod error;
pub mod feature;
pub mod logging;
pub mod service;
pub mod settings;
pub mod toggles;

pub use error::{DevFlagsError, Result};
pub use feature::{DeveloperSettings, FeatureConfig};
pub use toggles::{DeveloperToggles, Toggle};
