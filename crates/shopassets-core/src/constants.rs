//! Tunable defaults for resolution and caching.
//!
//! These values are defaults, not contracts. The cache and resolver expose all
//! of them through `CacheConfig` / `ResolverOptions`.

/// Path segment inserted into every constructed asset path.
pub const DEFAULT_PATH_PREFIX: &str = "img";

/// Commerce API base URL when none is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost";

/// Requested lifetime for remotely signed URLs.
pub const DEFAULT_SIGNED_URL_TTL_MINUTES: u32 = 10;

/// A cached signed URL stops being handed out this long before it actually
/// expires, so callers never receive a URL that dies mid-flight.
pub const SIGNED_URL_RENEWAL_BUFFER_SECS: i64 = 60;

/// Upper bound on cache entries enforced by the sweep pass.
pub const MAX_CACHE_SIZE: usize = 500;

/// Chance that a cache read triggers a housekeeping sweep.
pub const DEFAULT_SWEEP_PROBABILITY: f64 = 0.1;

/// Maximum simultaneous signing requests issued by a batch prefetch.
pub const DEFAULT_PREFETCH_BATCH_SIZE: usize = 10;

/// Served whenever an asset has no usable filename.
pub const PLACEHOLDER_URL: &str = "/images/placeholder.png";
