//! Popup presenter — the one live popup and its dismissal timer.
//!
//! At most one popup exists at a time. Every render first tears down the
//! previous popup completely (timer cancelled, surface closed, content buffer
//! deleted) and only then creates the new one, so there is never a moment with
//! two surfaces or an orphaned timer.
//!
//! Each render gets a fresh generation number, and the dismissal timer
//! carries it. A dismissal whose generation no longer matches the live popup
//! belongs to a popup that was already replaced or closed, and does nothing.
//! Cancelling the old timer on teardown normally prevents that from ever
//! happening; the generation check covers hosts that deliver a timer that
//! was already in flight when it was cancelled.

use crate::config::Config;
use crate::content::{Entry, PopupContent};
use crate::document::{DocumentId, DocumentInfo};
use crate::error::{Error, Result};
use crate::host::{Host, OverlaySpec, SurfaceId, TimerId};
use crate::layout;
use crate::timer::TimerToken;

/// The live popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PopupState {
    surface: SurfaceId,
    content: DocumentId,
    timer: Option<TimerId>,
    generation: u64,
}

/// Owner of the popup slot.
#[derive(Debug, Default)]
pub struct Presenter {
    popup: Option<PopupState>,
    generation: u64,
}

impl Presenter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            popup: None,
            generation: 0,
        }
    }

    /// Whether a popup is currently shown.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.popup.is_some()
    }

    /// The live popup's content buffer. Hosts report it as a new document
    /// when it is created; the lifecycle glue uses this to ignore it.
    #[must_use]
    pub fn content_document(&self) -> Option<DocumentId> {
        self.popup.map(|p| p.content)
    }

    /// The live popup's surface.
    #[must_use]
    pub fn surface(&self) -> Option<SurfaceId> {
        self.popup.map(|p| p.surface)
    }

    /// Generation of the most recent render.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Show `list` with the entry at `current` marked.
    ///
    /// Any existing popup is torn down first, even if the new one ends up
    /// not being shown. An empty list leaves nothing on screen.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Surface`] if the host cannot create the content
    /// buffer or the surface. Nothing is left behind in that case.
    pub fn render<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        config: &Config,
        list: &[DocumentId],
        current: usize,
    ) -> Result<()> {
        self.close(host);

        if list.is_empty() {
            return Ok(());
        }

        let base = host.base_dir();
        let home = host.home_dir();
        let entries: Vec<Entry> = list
            .iter()
            .map(|&id| {
                let info = host.info(id).unwrap_or_else(DocumentInfo::unnamed);
                Entry {
                    id,
                    name: info.display_name(base.as_deref(), home.as_deref()),
                    modified: info.modified,
                }
            })
            .collect();

        let body = PopupContent::build(&entries, current, config);
        let geometry = layout::place(config.position, host.viewport(), body.width, body.height());

        let content = host.create_content(&body.texts()).map_err(Error::Surface)?;
        let spec = OverlaySpec {
            geometry,
            border: config.style.border,
            focusable: false,
        };
        let surface = match host.open_overlay(content, &spec) {
            Ok(surface) => surface,
            Err(err) => {
                host.delete_content(content);
                return Err(Error::Surface(err));
            }
        };

        for (i, line) in body.lines.iter().enumerate() {
            for &span in &line.spans {
                host.highlight(content, i, span);
            }
        }

        self.generation += 1;
        let generation = self.generation;
        let timer = config
            .dismiss_after()
            .map(|delay| host.schedule(delay, TimerToken::Dismiss { generation }));

        tracing::debug!(
            generation,
            entries = list.len(),
            row = geometry.row,
            col = geometry.col,
            width = geometry.width,
            height = geometry.height,
            auto_close = timer.is_some(),
            "popup shown"
        );

        self.popup = Some(PopupState {
            surface,
            content,
            timer,
            generation,
        });
        Ok(())
    }

    /// Tear down the popup if one is shown. Returns whether one was.
    pub fn close<H: Host + ?Sized>(&mut self, host: &mut H) -> bool {
        let Some(popup) = self.popup.take() else {
            return false;
        };
        if let Some(timer) = popup.timer {
            host.cancel(timer);
        }
        Self::destroy(host, popup);
        true
    }

    /// Handle a fired dismissal timer. Returns whether the popup was closed.
    pub fn on_dismiss<H: Host + ?Sized>(&mut self, host: &mut H, generation: u64) -> bool {
        match self.popup {
            Some(popup) if popup.generation == generation => {
                // The timer has fired; there is nothing left to cancel.
                self.popup = None;
                Self::destroy(host, popup);
                tracing::debug!(generation, "popup timed out");
                true
            }
            _ => {
                tracing::trace!(
                    generation,
                    live = ?self.popup.map(|p| p.generation),
                    "stale dismissal ignored"
                );
                false
            }
        }
    }

    fn destroy<H: Host + ?Sized>(host: &mut H, popup: PopupState) {
        host.close_overlay(popup.surface);
        host.delete_content(popup.content);
        tracing::trace!(generation = popup.generation, "popup torn down");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
