//! Host capabilities — the seam between the core and the editor.
//!
//! The core never draws, never owns documents and never sleeps. Everything
//! it needs from the editor is expressed as one of the traits below, and a
//! host implements all of them. [`Host`] is the blanket supertrait the rest
//! of the crate is generic over.
//!
//! | Trait          | Capability                                          |
//! |----------------|-----------------------------------------------------|
//! | [`Documents`]  | enumerate, query and activate documents             |
//! | [`Overlay`]    | scratch content buffers, floating surfaces, styling |
//! | [`Scheduler`]  | cancellable one-shot timers on the main loop        |
//! | [`Notifier`]   | user-visible messages                               |
//! | [`Registrar`]  | command and key registration                        |

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::command::Command;
use crate::content::Span;
use crate::document::{DocumentId, DocumentInfo};
use crate::layout::{Border, Geometry};
use crate::timer::TimerToken;

// ─── Handles ────────────────────────────────────────────────────────────────

/// Viewport dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns.
    pub cols: u16,
    /// Number of rows.
    pub rows: u16,
}

impl Size {
    #[inline]
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }
}

/// Identifier of a floating surface created by [`Overlay::open_overlay`].
///
/// Hosts hand out increasing ids, so ordering by id is opening order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

/// Identifier of a scheduled timer returned by [`Scheduler::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}

/// Failure reported by the host for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The document is gone or can no longer be shown.
    #[error("invalid document {0}")]
    InvalidDocument(DocumentId),

    /// Anything else the host wants to say about the failure.
    #[error("{0}")]
    Other(String),
}

/// Everything a host needs to open the popup surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySpec {
    /// Position and size of the content area.
    pub geometry: Geometry,
    /// Border drawn around the content area.
    pub border: Border,
    /// Whether the surface takes input focus. The popup never does.
    pub focusable: bool,
}

// ─── Capabilities ───────────────────────────────────────────────────────────

/// The host's document registry.
pub trait Documents {
    /// All open documents in host order, listed or not.
    fn documents(&self) -> Vec<DocumentId>;

    /// Whether `id` should appear in the cycle (the host's "listed" predicate).
    fn is_listed(&self, id: DocumentId) -> bool;

    /// The currently active document, if any.
    fn active(&self) -> Option<DocumentId>;

    /// Make `id` the active document.
    ///
    /// # Errors
    ///
    /// Returns a [`HostError`] when the document cannot be activated (closed
    /// in the meantime, or otherwise invalid).
    fn activate(&mut self, id: DocumentId) -> Result<(), HostError>;

    /// Display attributes of `id`, or `None` if the host no longer knows it.
    fn info(&self, id: DocumentId) -> Option<DocumentInfo>;

    /// Directory paths are shortened against (usually the working directory).
    fn base_dir(&self) -> Option<PathBuf>;

    /// Home directory used for `~/` shortening.
    fn home_dir(&self) -> Option<PathBuf> {
        None
    }
}

/// Floating surfaces and their content.
pub trait Overlay {
    /// Current viewport size the popup is placed in.
    fn viewport(&self) -> Size;

    /// Create a transient, non-persisted content buffer holding `lines`.
    ///
    /// # Errors
    ///
    /// Returns a [`HostError`] if the buffer cannot be created.
    fn create_content(&mut self, lines: &[String]) -> Result<DocumentId, HostError>;

    /// Destroy a content buffer created by [`create_content`](Self::create_content).
    fn delete_content(&mut self, id: DocumentId);

    /// Show `content` in a floating surface.
    ///
    /// # Errors
    ///
    /// Returns a [`HostError`] if the surface cannot be opened.
    fn open_overlay(&mut self, content: DocumentId, spec: &OverlaySpec)
    -> Result<SurfaceId, HostError>;

    /// Close a surface opened by [`open_overlay`](Self::open_overlay).
    fn close_overlay(&mut self, id: SurfaceId);

    /// Apply emphasis to a column range of one line of `content`.
    fn highlight(&mut self, content: DocumentId, line: usize, span: Span);
}

/// One-shot timers resumed on the host's main loop.
///
/// When a timer fires, the host hands its token back through
/// [`BufCycle::on_timer`](crate::cycle::BufCycle::on_timer).
pub trait Scheduler {
    /// Fire `token` once after `delay`.
    fn schedule(&mut self, delay: Duration, token: TimerToken) -> TimerId;

    /// Cancel a pending timer. Unknown or already fired ids are ignored.
    fn cancel(&mut self, id: TimerId);
}

/// User-visible messages.
pub trait Notifier {
    fn notify(&mut self, level: NotifyLevel, message: &str);
}

/// Command and key registration.
pub trait Registrar {
    /// Make `command` invocable by `name`.
    fn register_command(&mut self, name: &str, command: Command);

    /// Bind the key trigger `key` to `command`.
    fn bind_key(&mut self, key: &str, command: Command);
}

/// A complete host: every capability the core consumes.
pub trait Host: Documents + Overlay + Scheduler + Notifier + Registrar {}

impl<T> Host for T where T: Documents + Overlay + Scheduler + Notifier + Registrar + ?Sized {}
