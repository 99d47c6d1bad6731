//! Shopassets Resolver Library
//!
//! Resolves tenant asset URLs across four storage strategies (CDN override,
//! public-bucket new-format, public-bucket legacy, API proxy) and caches
//! temporary signed URLs. Resolution is best-effort by design: every entry
//! point returns a usable URL string, degrading to the proxy form or a
//! placeholder instead of surfacing errors to rendering code.

pub mod cache;
pub mod clock;
pub mod resolver;
pub mod urls;

// Re-export commonly used types
pub use cache::{CacheConfig, SignedUrlCache};
pub use clock::{Clock, SystemClock};
pub use resolver::{AssetUrlResolver, ResolverOptions};
pub use urls::{build_url, proxy_url};
