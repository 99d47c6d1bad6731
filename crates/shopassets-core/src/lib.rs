//! Shopassets Core Library
//!
//! This crate provides the domain types shared across the asset resolution
//! components: entity kinds, asset descriptors, storage configuration,
//! process settings, and the URL signing abstraction.

pub mod asset;
pub mod config;
pub mod constants;
pub mod entity;
pub mod signer;

// Re-export commonly used types
pub use asset::{is_absolute_url, AssetRef};
pub use config::{Settings, StorageConfig, StorageDriver};
pub use entity::EntityKind;
pub use signer::{SignedUrl, SignerError, SignerResult, UrlSigner};
