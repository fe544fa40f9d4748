// Developer settings controller.
// Serves the feature configuration from memory, then disk, then the network.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use crate::cache::{KeyValueStore, load_json, save_json};
use crate::error::{DevFlagsError, Result};
use crate::service::{AcceptType, HttpService, RequestService, ServiceRequest};

use super::config::FeatureConfig;

/// A durably cached config older than this is not served.
pub const FRESHNESS_THRESHOLD: Duration = Duration::from_secs(3 * 60 * 60);

/// Durable-store namespace for developer settings.
pub const CACHE_NAMESPACE: &str = "developer-settings";

/// Durable-store item holding the feature configuration.
pub const CACHE_ITEM: &str = "AppsFeatureConfig";

/// Default feature-configuration endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://donate.wikimedia.org/wiki/MediaWiki:AppsFeatureConfig";

/// Owns the current feature configuration and its durable copy.
///
/// The request service is optional: without one, [`refresh_config`] fails
/// with [`DevFlagsError::ServiceUnavailable`] and only cached copies are
/// served.
///
/// [`refresh_config`]: DeveloperSettings::refresh_config
#[derive(Debug)]
pub struct DeveloperSettings<K, S = HttpService> {
    store: K,
    service: Option<S>,
    endpoint: String,
    memory: RwLock<Option<FeatureConfig>>,
}

impl<K: KeyValueStore> DeveloperSettings<K> {
    /// Controller backed by `store`, with no request service yet.
    pub fn new(store: K, endpoint: impl Into<String>) -> Self {
        Self {
            store,
            service: None,
            endpoint: endpoint.into(),
            memory: RwLock::new(None),
        }
    }
}

impl<K: KeyValueStore, S: RequestService> DeveloperSettings<K, S> {
    /// Inject the request service used by [`refresh_config`](Self::refresh_config).
    pub fn with_service<T: RequestService>(self, service: T) -> DeveloperSettings<K, T> {
        DeveloperSettings {
            store: self.store,
            service: Some(service),
            endpoint: self.endpoint,
            memory: self.memory,
        }
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    /// Return the cached config without touching the network.
    ///
    /// The in-memory copy is returned as is. A durable copy is returned
    /// (and promoted to memory) only if it was fetched less than
    /// [`FRESHNESS_THRESHOLD`] ago; a stale copy is left on disk.
    pub fn load_config(&self) -> Option<FeatureConfig> {
        if let Some(config) = self.memory.read().as_ref() {
            debug!("feature config served from memory");
            return Some(config.clone());
        }

        let config = match load_json::<FeatureConfig, _>(&self.store, CACHE_NAMESPACE, CACHE_ITEM) {
            Ok(Some(config)) => config,
            Ok(None) => {
                debug!("no durable feature config");
                return None;
            }
            Err(err) => {
                debug!(error = %err, "durable feature config unreadable");
                return None;
            }
        };

        let Some(cached_date) = config.cached_date else {
            debug!("durable feature config has no cached date");
            return None;
        };

        if !is_fresh(cached_date, Utc::now()) {
            debug!(%cached_date, "durable feature config is stale");
            return None;
        }

        let mut slot = self.memory.write();
        // A refresh may have landed since the read above; keep the newer copy.
        if let Some(current) = slot.as_ref() {
            return Some(current.clone());
        }
        *slot = Some(config.clone());
        debug!(%cached_date, "feature config promoted from durable store");

        Some(config)
    }

    /// Fetch the config from the network and update memory and disk.
    ///
    /// On failure the error is returned unchanged and no cached state is
    /// modified. A failed durable write is logged and does not fail the
    /// refresh.
    pub async fn refresh_config(&self) -> Result<()> {
        let service = self
            .service
            .as_ref()
            .ok_or(DevFlagsError::ServiceUnavailable)?;
        let url = feature_config_url(&self.endpoint)?;

        let request = ServiceRequest::get(url)
            .parameter("action", "raw")
            .accept(AcceptType::Json);
        let mut config: FeatureConfig = service.perform_decodable_get(request).await?;

        config.cached_date = Some(Utc::now());
        {
            // Memory and disk change together so the last refresh wins on both.
            let mut slot = self.memory.write();
            *slot = Some(config.clone());
            self.persist(&config);
        }

        Ok(())
    }

    /// Non-critical: the in-memory copy is already authoritative.
    fn persist(&self, config: &FeatureConfig) {
        if let Err(err) = save_json(&self.store, CACHE_NAMESPACE, CACHE_ITEM, config) {
            warn!(error = %err, "failed to persist feature config");
        }
    }
}

impl<K, S> DeveloperSettings<K, S>
where
    K: KeyValueStore + 'static,
    S: RequestService + 'static,
{
    /// Run [`refresh_config`](Self::refresh_config) on the current tokio
    /// runtime and call `on_complete` exactly once with its outcome, from a
    /// runtime worker thread.
    ///
    /// Outside a runtime nothing is spawned: `on_complete` receives
    /// [`DevFlagsError::RuntimeUnavailable`] on the calling thread and
    /// `None` is returned.
    pub fn refresh_config_with<F>(self: &Arc<Self>, on_complete: F) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Result<()>) + Send + 'static,
    {
        let Ok(handle) = Handle::try_current() else {
            on_complete(Err(DevFlagsError::RuntimeUnavailable));
            return None;
        };

        let settings = Arc::clone(self);
        Some(handle.spawn(async move {
            let result = settings.refresh_config().await;
            on_complete(result);
        }))
    }
}

/// Parse the configured endpoint into a request URL.
pub fn feature_config_url(endpoint: &str) -> Result<Url> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(DevFlagsError::RequestConstruction(
            "feature config endpoint is empty".to_string(),
        ));
    }

    let url = Url::parse(endpoint)
        .map_err(|e| DevFlagsError::RequestConstruction(format!("{endpoint}: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(DevFlagsError::RequestConstruction(format!(
            "unsupported scheme: {scheme}"
        ))),
    }
}

/// A cached date in the future counts as fresh.
fn is_fresh(cached_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    match now.signed_duration_since(cached_date).to_std() {
        Ok(elapsed) => elapsed < FRESHNESS_THRESHOLD,
        Err(_) => true,
    }
}
