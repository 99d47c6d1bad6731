//! Asynchronous resolution with caching and proxy fallback.
//!
//! The orchestrator never returns an error for resolution: image URLs are a
//! best-effort concern, and a transient signing-service blip must not take
//! down an otherwise healthy page render. Any failure on the signed path is
//! logged and answered with the proxy URL instead.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use shopassets_core::constants::{
    DEFAULT_PREFETCH_BATCH_SIZE, DEFAULT_SIGNED_URL_TTL_MINUTES, PLACEHOLDER_URL,
};
use shopassets_core::{
    is_absolute_url, AssetRef, EntityKind, Settings, StorageConfig, StorageDriver, UrlSigner,
};

use crate::cache::{CacheConfig, SignedUrlCache};
use crate::clock::Clock;
use crate::urls;

/// Resolver tuning knobs.
#[derive(Clone, Debug)]
pub struct ResolverOptions {
    /// Lifetime requested from the signing endpoint.
    pub signed_url_ttl_minutes: u32,
    /// Upper bound on simultaneous signing requests during prefetch.
    pub prefetch_batch_size: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        ResolverOptions {
            signed_url_ttl_minutes: DEFAULT_SIGNED_URL_TTL_MINUTES,
            prefetch_batch_size: DEFAULT_PREFETCH_BATCH_SIZE,
        }
    }
}

/// Resolves asset URLs, preferring signed URLs when the storage driver calls
/// for them and degrading to the API proxy on any failure.
pub struct AssetUrlResolver {
    settings: Settings,
    storage: RwLock<Arc<StorageConfig>>,
    cache: SignedUrlCache,
    signer: Arc<dyn UrlSigner>,
    options: ResolverOptions,
}

impl AssetUrlResolver {
    pub fn new(settings: Settings, signer: Arc<dyn UrlSigner>) -> Self {
        AssetUrlResolver {
            settings,
            storage: RwLock::new(Arc::new(StorageConfig::default())),
            cache: SignedUrlCache::with_defaults(),
            signer,
            options: ResolverOptions::default(),
        }
    }

    pub fn with_options(
        settings: Settings,
        signer: Arc<dyn UrlSigner>,
        cache_config: CacheConfig,
        clock: Arc<dyn Clock>,
        options: ResolverOptions,
    ) -> Self {
        AssetUrlResolver {
            settings,
            storage: RwLock::new(Arc::new(StorageConfig::default())),
            cache: SignedUrlCache::new(cache_config, clock),
            signer,
            options,
        }
    }

    /// Replace the storage configuration snapshot. Called by the
    /// config-loading collaborator, the sole writer.
    pub fn set_storage_config(&self, config: StorageConfig) {
        *self.storage.write().expect("storage config lock poisoned") = Arc::new(config);
    }

    fn storage(&self) -> Arc<StorageConfig> {
        self.storage
            .read()
            .expect("storage config lock poisoned")
            .clone()
    }

    /// Synchronous best-effort URL for immediate rendering.
    pub fn build_url(&self, asset: &AssetRef) -> String {
        urls::build_url(asset, &self.settings, &self.storage())
    }

    /// Asynchronous resolution, upgrading to a signed URL when the driver
    /// requires one. Always returns a usable URL.
    pub async fn resolve(&self, asset: &AssetRef, prefer_signed: bool) -> String {
        if asset.filename.trim().is_empty() {
            return PLACEHOLDER_URL.to_string();
        }
        if is_absolute_url(&asset.filename) {
            return asset.filename.clone();
        }

        let storage = self.storage();

        // CDN content is pre-signed or public by operational contract.
        if self.settings.cdn_base().is_some() {
            return urls::build_url(asset, &self.settings, &storage);
        }

        // Public buckets never need signing.
        if storage.driver == StorageDriver::R2 {
            return urls::build_url(asset, &self.settings, &storage);
        }

        if storage.driver == StorageDriver::Gcs
            && storage.use_signed_urls
            && prefer_signed
            && self.signer.has_session()
        {
            let key = asset.storage_key();
            if let Some(url) = self.cache.lookup(&key) {
                return url;
            }

            match self
                .signer
                .sign(&asset.tenant, &key, self.options.signed_url_ttl_minutes)
                .await
            {
                Ok(signed) => {
                    self.cache.store_until(&key, &signed.url, signed.expires_at);
                    return signed.url;
                }
                Err(err) => {
                    tracing::warn!(
                        key = %key,
                        error = %err,
                        "Signed URL fetch failed, falling back to proxy"
                    );
                }
            }
        }

        urls::proxy_url(asset, &self.settings, &storage)
    }

    /// Resolve many assets of one tenant, answering cached entries immediately
    /// and fetching the rest in fixed-size batches. Returns storage key ->
    /// URL; duplicate keys are last-writer-wins.
    pub async fn prefetch(
        &self,
        tenant: &str,
        items: &[(EntityKind, String)],
        prefer_signed: bool,
    ) -> HashMap<String, String> {
        let mut resolved = HashMap::new();
        let mut pending: Vec<AssetRef> = Vec::new();

        for (kind, filename) in items {
            let asset = AssetRef::new(*kind, filename.clone(), tenant);
            let key = asset.storage_key();
            if let Some(url) = self.cache.lookup(&key) {
                resolved.insert(key, url);
            } else {
                pending.push(asset);
            }
        }

        for chunk in pending.chunks(self.options.prefetch_batch_size.max(1)) {
            let batch = chunk
                .iter()
                .map(|asset| async move {
                    (asset.storage_key(), self.resolve(asset, prefer_signed).await)
                });
            for (key, url) in futures::future::join_all(batch).await {
                resolved.insert(key, url);
            }
        }

        resolved
    }

    /// Drop all cached signed URLs. Must be called on sign-out.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache(&self) -> &SignedUrlCache {
        &self.cache
    }
}
