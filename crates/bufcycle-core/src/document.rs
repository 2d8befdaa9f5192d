//! Documents as the core sees them.
//!
//! The host owns every open document. The core only ever holds a
//! [`DocumentId`] and reads a [`DocumentInfo`] snapshot when it needs a
//! display name or the modified flag. The listed-document query is recomputed
//! on every navigation and refresh; documents come and go between queries, so
//! nothing here is cached.

use std::fmt;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use crate::host::Documents;

/// Display name for documents that have no path yet.
pub const UNNAMED: &str = "[No Name]";

// ---------------------------------------------------------------------------
// DocumentId
// ---------------------------------------------------------------------------

/// Opaque identifier of an open document, supplied by the host.
///
/// Hosts typically use their buffer number. The numeric value is shown in the
/// popup's number column when numbering is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u32);

impl DocumentId {
    /// The raw host number.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// DocumentInfo
// ---------------------------------------------------------------------------

/// The attributes of a document the popup consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    /// File path, if the document is backed by one.
    pub path: Option<PathBuf>,
    /// Whether the document has unsaved changes.
    pub modified: bool,
}

impl DocumentInfo {
    /// A document backed by `path`, unmodified.
    #[must_use]
    pub fn named(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            modified: false,
        }
    }

    /// A document with no path, unmodified.
    #[must_use]
    pub const fn unnamed() -> Self {
        Self {
            path: None,
            modified: false,
        }
    }

    /// Builder-style setter for the modified flag.
    #[must_use]
    pub const fn with_modified(mut self, modified: bool) -> Self {
        self.modified = modified;
        self
    }

    /// The name shown in the popup.
    ///
    /// Paths are shortened with [`shorten_path`]; unnamed documents and
    /// empty paths show [`UNNAMED`].
    #[must_use]
    pub fn display_name(&self, base: Option<&Path>, home: Option<&Path>) -> String {
        match &self.path {
            Some(path) if !path.as_os_str().is_empty() => shorten_path(path, base, home),
            _ => UNNAMED.to_string(),
        }
    }
}

/// Shorten `path` for display.
///
/// In order of preference: relative to `base` when inside it, `~/…` when
/// inside `home`, otherwise the path unchanged. Relative paths are already
/// short and are returned as given.
#[must_use]
pub fn shorten_path(path: &Path, base: Option<&Path>, home: Option<&Path>) -> String {
    if path.is_relative() {
        return path.display().to_string();
    }

    if let Some(rel) = base.and_then(|b| path.strip_prefix(b).ok()) {
        if !rel.as_os_str().is_empty() {
            return rel.display().to_string();
        }
    }

    if let Some(rel) = home.and_then(|h| path.strip_prefix(h).ok()) {
        if !rel.as_os_str().is_empty() {
            return format!("~{MAIN_SEPARATOR}{}", rel.display());
        }
    }

    path.display().to_string()
}

/// The host's open documents filtered by its "listed" predicate, in host order.
pub fn listed<D: Documents + ?Sized>(host: &D) -> Vec<DocumentId> {
    host.documents()
        .into_iter()
        .filter(|&id| host.is_listed(id))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
