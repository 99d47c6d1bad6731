//! Configuration module
//!
//! Two layers of configuration feed URL resolution. `Settings` is process-wide
//! and read once from the environment at startup. `StorageConfig` is supplied
//! per tenant by the config-loading collaborator and replaced as a whole
//! snapshot; the resolver only ever reads it.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::constants::{DEFAULT_API_BASE_URL, DEFAULT_PATH_PREFIX};

/// Storage driver types
///
/// Determines which URL-construction strategy applies when no CDN override is
/// configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageDriver {
    /// Assets served through the commerce API proxy.
    Local,
    /// Public object storage bucket (R2-style), no signing.
    R2,
    /// Cloud object storage with optional signed URLs (GCS-style).
    Gcs,
}

impl FromStr for StorageDriver {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(StorageDriver::Local),
            "r2" => Ok(StorageDriver::R2),
            "gcs" => Ok(StorageDriver::Gcs),
            _ => Err(anyhow::anyhow!("Invalid storage driver: {}", s)),
        }
    }
}

impl Display for StorageDriver {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageDriver::Local => write!(f, "local"),
            StorageDriver::R2 => write!(f, "r2"),
            StorageDriver::Gcs => write!(f, "gcs"),
        }
    }
}

/// Tenant storage configuration snapshot.
///
/// Immutable once constructed; the config-loading collaborator replaces the
/// whole value when the tenant configuration reloads.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StorageConfig {
    pub driver: StorageDriver,
    /// Only meaningful when `driver` is `Gcs`.
    #[serde(default)]
    pub use_signed_urls: bool,
    /// Base URL for the public bucket. Required for the `R2` driver; its
    /// absence there is a configuration fault handled by proxy fallback.
    #[serde(default)]
    pub public_base_url: Option<String>,
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,
    /// Overrides the tenant segment in constructed paths when the store's
    /// logical data schema differs from its public slug.
    #[serde(default)]
    pub storage_folder: Option<String>,
}

fn default_path_prefix() -> String {
    DEFAULT_PATH_PREFIX.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            driver: StorageDriver::Local,
            use_signed_urls: false,
            public_base_url: None,
            path_prefix: default_path_prefix(),
            storage_folder: None,
        }
    }
}

impl StorageConfig {
    /// Tenant path segment: the storage folder override when present and
    /// non-empty, else the tenant id.
    pub fn folder_or<'a>(&'a self, tenant: &'a str) -> &'a str {
        match self.storage_folder.as_deref() {
            Some(folder) if !folder.is_empty() => folder,
            _ => tenant,
        }
    }

    /// Public bucket base URL, treating empty strings as absent.
    pub fn public_base(&self) -> Option<&str> {
        self.public_base_url
            .as_deref()
            .map(|s| s.trim_end_matches('/'))
            .filter(|s| !s.is_empty())
    }
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the commerce API, used for proxy URLs and signing requests.
    pub api_base_url: String,
    /// When set, overrides every other driver's URL construction.
    pub cdn_base_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            cdn_base_url: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let api_base_url = env::var("API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let cdn_base_url = env::var("CDN_BASE_URL")
            .ok()
            .map(|s| s.trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());

        let settings = Settings {
            api_base_url,
            cdn_base_url,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "API_BASE_URL must be an http(s) URL, got: {}",
                self.api_base_url
            ));
        }
        if let Some(cdn) = self.cdn_base_url.as_deref() {
            if !cdn.starts_with("http://") && !cdn.starts_with("https://") {
                return Err(anyhow::anyhow!(
                    "CDN_BASE_URL must be an http(s) URL, got: {}",
                    cdn
                ));
            }
        }
        Ok(())
    }

    /// CDN base URL, treating empty strings as disabled.
    pub fn cdn_base(&self) -> Option<&str> {
        self.cdn_base_url.as_deref().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_round_trip() {
        for driver in [StorageDriver::Local, StorageDriver::R2, StorageDriver::Gcs] {
            let parsed: StorageDriver = driver.to_string().parse().unwrap();
            assert_eq!(parsed, driver);
        }
        assert!("azure".parse::<StorageDriver>().is_err());
    }

    #[test]
    fn test_folder_override() {
        let mut config = StorageConfig::default();
        assert_eq!(config.folder_or("acme"), "acme");

        config.storage_folder = Some("acme-schema".to_string());
        assert_eq!(config.folder_or("acme"), "acme-schema");

        config.storage_folder = Some(String::new());
        assert_eq!(config.folder_or("acme"), "acme");
    }

    #[test]
    fn test_public_base_empty_is_absent() {
        let mut config = StorageConfig {
            driver: StorageDriver::R2,
            public_base_url: Some("https://pub.example.dev/".to_string()),
            ..StorageConfig::default()
        };
        assert_eq!(config.public_base(), Some("https://pub.example.dev"));

        config.public_base_url = Some(String::new());
        assert_eq!(config.public_base(), None);

        config.public_base_url = None;
        assert_eq!(config.public_base(), None);
    }

    #[test]
    fn test_settings_validation() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());

        let settings = Settings {
            api_base_url: "localhost".to_string(),
            cdn_base_url: None,
        };
        assert!(settings.validate().is_err());

        let settings = Settings {
            api_base_url: "http://localhost".to_string(),
            cdn_base_url: Some("cdn.example.com".to_string()),
        };
        assert!(settings.validate().is_err());
    }
}
