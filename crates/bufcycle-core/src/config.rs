//! Configuration — defaults plus a user overlay.
//!
//! [`Config`] is the resolved, immutable-after-setup configuration. Users
//! never write a `Config` directly; they write a [`ConfigOverlay`] (usually a
//! TOML file) in which every field is optional, and [`Config::merge`] copies
//! over exactly the fields that are present, recursing into the nested
//! tables.
//!
//! # File format
//!
//! ```toml
//! timeout = 800            # ms, 0 keeps the popup open until closed
//! show_on_delete = true
//! position = "center"      # center | top-left | top-right | bottom-left | bottom-right
//! show_numbers = true
//! show_modified = true
//!
//! [style]
//! border = "double"        # none | single | double | rounded | solid | shadow
//!
//! [style.padding]
//! left = 1
//! right = 2
//!
//! [keymaps]
//! next = "<Tab>"
//! prev = "<S-Tab>"
//! toggle = "<leader>b"
//! ```
//!
//! # Defaults
//!
//! | Field            | Default        |
//! |------------------|----------------|
//! | `timeout`        | 1500           |
//! | `show_on_delete` | false          |
//! | `position`       | `bottom-right` |
//! | `show_numbers`   | false          |
//! | `show_modified`  | true           |
//! | `style.border`   | `rounded`      |
//! | `style.padding`  | left 1, right 1|
//! | `keymaps.*`      | unbound        |

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::command::Command;
use crate::error::{Error, Result};
use crate::layout::{Border, Placement};

/// Default auto-close delay in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 1500;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Auto-close delay in milliseconds. `0` disables auto-close.
    pub timeout: u64,
    /// Show the popup when a document is deleted, even if it was hidden.
    pub show_on_delete: bool,
    pub position: Placement,
    /// Prefix each entry with its document number.
    pub show_numbers: bool,
    /// Append `" [+]"` to modified documents.
    pub show_modified: bool,
    pub style: Style,
    pub keymaps: Keymaps,
}

/// Visual style of the popup surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub border: Border,
    pub padding: Padding,
}

/// Blank columns added on each side of the popup text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    pub left: u16,
    pub right: u16,
}

impl Default for Padding {
    fn default() -> Self {
        Self { left: 1, right: 1 }
    }
}

/// Optional key triggers for the commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keymaps {
    pub next: Option<String>,
    pub prev: Option<String>,
    pub toggle: Option<String>,
}

impl Keymaps {
    /// The configured `(key, command)` pairs.
    #[must_use]
    pub fn bindings(&self) -> Vec<(&str, Command)> {
        [
            (&self.next, Command::Next),
            (&self.prev, Command::Prev),
            (&self.toggle, Command::Toggle),
        ]
        .into_iter()
        .filter_map(|(key, cmd)| key.as_deref().map(|k| (k, cmd)))
        .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_MS,
            show_on_delete: false,
            position: Placement::default(),
            show_numbers: false,
            show_modified: true,
            style: Style::default(),
            keymaps: Keymaps::default(),
        }
    }
}

impl Config {
    /// Defaults with `overlay` applied.
    #[must_use]
    pub fn with_overlay(overlay: ConfigOverlay) -> Self {
        let mut config = Self::default();
        config.merge(overlay);
        config
    }

    /// Copy every field present in `overlay` onto `self`.
    pub fn merge(&mut self, overlay: ConfigOverlay) {
        let ConfigOverlay {
            timeout,
            show_on_delete,
            position,
            show_numbers,
            show_modified,
            style,
            keymaps,
        } = overlay;

        set(&mut self.timeout, timeout);
        set(&mut self.show_on_delete, show_on_delete);
        set(&mut self.position, position);
        set(&mut self.show_numbers, show_numbers);
        set(&mut self.show_modified, show_modified);

        if let Some(style) = style {
            set(&mut self.style.border, style.border);
            if let Some(padding) = style.padding {
                set(&mut self.style.padding.left, padding.left);
                set(&mut self.style.padding.right, padding.right);
            }
        }

        if let Some(keymaps) = keymaps {
            set_key(&mut self.keymaps.next, keymaps.next);
            set_key(&mut self.keymaps.prev, keymaps.prev);
            set_key(&mut self.keymaps.toggle, keymaps.toggle);
        }
    }

    /// The auto-close delay, or `None` when auto-close is disabled.
    #[must_use]
    pub const fn dismiss_after(&self) -> Option<Duration> {
        if self.timeout == 0 {
            None
        } else {
            Some(Duration::from_millis(self.timeout))
        }
    }
}

fn set<T>(field: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *field = v;
    }
}

/// An empty key string unbinds.
fn set_key(field: &mut Option<String>, value: Option<String>) {
    if let Some(key) = value {
        *field = if key.trim().is_empty() { None } else { Some(key) };
    }
}

// ---------------------------------------------------------------------------
// ConfigOverlay
// ---------------------------------------------------------------------------

/// User-supplied configuration: every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverlay {
    pub timeout: Option<u64>,
    pub show_on_delete: Option<bool>,
    pub position: Option<Placement>,
    pub show_numbers: Option<bool>,
    pub show_modified: Option<bool>,
    pub style: Option<StyleOverlay>,
    pub keymaps: Option<KeymapsOverlay>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleOverlay {
    pub border: Option<Border>,
    pub padding: Option<PaddingOverlay>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaddingOverlay {
    pub left: Option<u16>,
    pub right: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeymapsOverlay {
    pub next: Option<String>,
    pub prev: Option<String>,
    pub toggle: Option<String>,
}

impl ConfigOverlay {
    /// Parse an overlay from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] on malformed TOML, wrong value types or
    /// unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse an overlay file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigRead`] if the file cannot be read and
    /// [`Error::ConfigParse`] if its contents are invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let overlay = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded config overlay");
        Ok(overlay)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
