//! Deterministic URL construction for tenant assets.
//!
//! Builders are pure and total: for every input exactly one strategy fires and
//! a URL string comes back. Priority order, evaluated on every call:
//!
//! 1. Missing filename -> placeholder.
//! 2. Absolute `http(s)://` filename -> passthrough.
//! 3. CDN override (when configured) -> CDN path, regardless of driver.
//! 4. Public bucket, new-format (index filename + public ID on a capable kind).
//! 5. Public bucket, legacy tenant-scoped path.
//! 6. API proxy, the universal fallback.

use shopassets_core::constants::PLACEHOLDER_URL;
use shopassets_core::{is_absolute_url, AssetRef, Settings, StorageConfig, StorageDriver};

/// Build the best synchronously-available URL for `asset`.
pub fn build_url(asset: &AssetRef, settings: &Settings, storage: &StorageConfig) -> String {
    if asset.filename.trim().is_empty() {
        return PLACEHOLDER_URL.to_string();
    }
    if is_absolute_url(&asset.filename) {
        return asset.filename.clone();
    }

    if let Some(cdn) = settings.cdn_base() {
        return tenant_scoped_url(cdn, asset, storage);
    }

    match storage.driver {
        StorageDriver::R2 => match storage.public_base() {
            Some(base) => public_bucket_url(base, asset, storage),
            None => {
                tracing::warn!(
                    driver = %storage.driver,
                    tenant = %asset.tenant,
                    "Public bucket driver has no public base URL, falling back to proxy"
                );
                proxy_url(asset, settings, storage)
            }
        },
        StorageDriver::Local | StorageDriver::Gcs => proxy_url(asset, settings, storage),
    }
}

/// Proxy URL through the commerce API. Always resolvable; used whenever a more
/// specific strategy is unavailable or fails.
pub fn proxy_url(asset: &AssetRef, settings: &Settings, storage: &StorageConfig) -> String {
    format!(
        "{}/{}/storage/gcs/img/tenants/{}/{}/{}",
        settings.api_base_url,
        asset.tenant,
        storage.folder_or(&asset.tenant),
        asset.kind,
        asset.trimmed_filename()
    )
}

fn public_bucket_url(base: &str, asset: &AssetRef, storage: &StorageConfig) -> String {
    if asset.uses_public_id_path() {
        // Predicate guarantees both are present.
        if let (Some(prefix), Some(public_id)) =
            (asset.kind.public_id_prefix(), asset.public_id.as_deref())
        {
            return format!(
                "{}/{}/{}/{}/{}",
                base,
                storage.path_prefix,
                prefix,
                public_id,
                asset.trimmed_filename()
            );
        }
    }
    tenant_scoped_url(base, asset, storage)
}

fn tenant_scoped_url(base: &str, asset: &AssetRef, storage: &StorageConfig) -> String {
    format!(
        "{}/{}/tenants/{}/{}/{}",
        base,
        storage.path_prefix,
        storage.folder_or(&asset.tenant),
        asset.kind,
        asset.trimmed_filename()
    )
}
