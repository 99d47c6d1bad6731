//! Asset descriptors and filename classification.
//!
//! Two filename formats coexist: legacy free-form names (date-prefixed) stored
//! under tenant-scoped paths, and new index-style names (`"<n>.<ext>"`)
//! addressed by the owning entity's public ID. The routing predicate is strict
//! and order-independent: a descriptor uses the public-ID path only when the
//! filename is index-style, a public ID is present, and the entity kind
//! supports public-ID addressing.

use std::sync::LazyLock;

use regex::Regex;

use crate::entity::EntityKind;

static INDEX_FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\w+$").expect("valid regex literal"));

/// Whether a filename is already a fully-qualified URL that should pass
/// through resolution untouched.
pub fn is_absolute_url(filename: &str) -> bool {
    filename.starts_with("http://") || filename.starts_with("https://")
}

/// Identifies one image resource to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    pub kind: EntityKind,
    pub filename: String,
    pub tenant: String,
    /// Stable entity identifier (opaque string). Required for new-format
    /// paths on kinds that support public-ID addressing.
    pub public_id: Option<String>,
}

impl AssetRef {
    pub fn new(kind: EntityKind, filename: impl Into<String>, tenant: impl Into<String>) -> Self {
        AssetRef {
            kind,
            filename: filename.into(),
            tenant: tenant.into(),
            public_id: None,
        }
    }

    pub fn with_public_id(mut self, public_id: impl Into<String>) -> Self {
        self.public_id = Some(public_id.into());
        self
    }

    /// Filename with a single leading `/` stripped, as used in all
    /// constructed paths.
    pub fn trimmed_filename(&self) -> &str {
        self.filename.strip_prefix('/').unwrap_or(&self.filename)
    }

    /// True when the filename uses the new numeric index format (`"0.jpg"`).
    pub fn has_index_filename(&self) -> bool {
        INDEX_FILENAME_RE.is_match(self.trimmed_filename())
    }

    /// Whether this asset routes through the public-ID addressed path.
    pub fn uses_public_id_path(&self) -> bool {
        self.has_index_filename()
            && self.public_id.as_deref().is_some_and(|id| !id.is_empty())
            && self.kind.supports_public_id()
    }

    /// Key identifying this asset in the cache and in signing requests:
    /// `tenants/{tenant}/{kind}/{filename}`.
    pub fn storage_key(&self) -> String {
        format!(
            "tenants/{}/{}/{}",
            self.tenant,
            self.kind,
            self.trimmed_filename()
        )
    }
}
