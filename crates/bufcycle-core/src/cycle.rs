//! `BufCycle` — the object a host talks to.
//!
//! Owns the resolved [`Config`], the [`Presenter`] and the pending refresh
//! timer, and routes the four kinds of input a host delivers:
//!
//! | Host input                     | Reaction                                   |
//! |--------------------------------|--------------------------------------------|
//! | [`run`](BufCycle::run)         | navigate, toggle or close                  |
//! | [`on_document_removed`]        | debounced refresh (or reveal, see below)   |
//! | [`on_document_added`]          | debounced refresh while the popup is shown |
//! | [`on_timer`](BufCycle::on_timer) | dismissal or refresh                     |
//!
//! With `show_on_delete` set, a removal shows the popup even when it was
//! hidden. Otherwise add/remove only refresh a popup that is already visible.
//! The refresh is debounced so that a burst of notifications re-renders once,
//! after the host has finished updating its document list.
//!
//! Nothing here returns an error. Activation failures become a warning
//! notification; surface failures are logged and dropped.
//!
//! [`on_document_removed`]: BufCycle::on_document_removed
//! [`on_document_added`]: BufCycle::on_document_added

use std::time::Duration;

use crate::command::Command;
use crate::config::Config;
use crate::document::{self, DocumentId};
use crate::error::Error;
use crate::host::{Host, NotifyLevel, TimerId};
use crate::navigator::{self, Direction};
use crate::presenter::Presenter;
use crate::timer::TimerToken;

/// Delay between a document add/remove notification and the refresh.
pub const REFRESH_DEBOUNCE: Duration = Duration::from_millis(50);

#[derive(Debug)]
struct PendingRefresh {
    timer: TimerId,
    sequence: u64,
    /// Show the popup on fire even if it is hidden by then.
    reveal: bool,
}

#[derive(Debug)]
pub struct BufCycle {
    config: Config,
    presenter: Presenter,
    refresh: Option<PendingRefresh>,
    refresh_sequence: u64,
}

impl BufCycle {
    /// A cycler with `config`, without touching any host.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            config,
            presenter: Presenter::new(),
            refresh: None,
            refresh_sequence: 0,
        }
    }

    /// Register every command with the host, bind the configured keys, and
    /// return the cycler.
    pub fn setup<H: Host + ?Sized>(host: &mut H, config: Config) -> Self {
        for command in Command::ALL {
            host.register_command(command.name(), command);
        }
        for (key, command) in config.keymaps.bindings() {
            host.bind_key(key, command);
            tracing::debug!(key, %command, "bound key");
        }
        Self::new(config)
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.presenter.is_visible()
    }

    /// Execute a user command.
    pub fn run<H: Host + ?Sized>(&mut self, host: &mut H, command: Command) {
        tracing::trace!(%command, "run");
        match command {
            Command::Next => self.navigate(host, Direction::Next),
            Command::Prev => self.navigate(host, Direction::Prev),
            Command::Toggle => self.toggle(host),
            Command::Close => self.close(host),
        }
    }

    /// Switch to the next document and show the popup.
    pub fn next<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.navigate(host, Direction::Next);
    }

    /// Switch to the previous document and show the popup.
    pub fn prev<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.navigate(host, Direction::Prev);
    }

    /// Hide the popup if shown, otherwise show it for the current list.
    pub fn toggle<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.presenter.is_visible() {
            self.close(host);
        } else {
            self.show_current(host);
        }
    }

    /// Hide the popup. A pending refresh is dropped with it.
    pub fn close<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.cancel_refresh(host);
        self.presenter.close(host);
    }

    /// The host removed (or is about to remove) `id`.
    pub fn on_document_removed<H: Host + ?Sized>(&mut self, host: &mut H, id: DocumentId) {
        let reveal = self.config.show_on_delete;
        if reveal || self.presenter.is_visible() {
            tracing::trace!(%id, reveal, "document removed, refresh scheduled");
            self.schedule_refresh(host, reveal);
        }
    }

    /// The host added `id`.
    pub fn on_document_added<H: Host + ?Sized>(&mut self, host: &mut H, id: DocumentId) {
        if !self.presenter.is_visible()
            || self.presenter.content_document() == Some(id)
            || !host.is_listed(id)
        {
            return;
        }
        tracing::trace!(%id, "document added, refresh scheduled");
        self.schedule_refresh(host, false);
    }

    /// A timer scheduled by this cycler fired.
    pub fn on_timer<H: Host + ?Sized>(&mut self, host: &mut H, token: TimerToken) {
        match token {
            TimerToken::Dismiss { generation } => {
                self.presenter.on_dismiss(host, generation);
            }
            TimerToken::Refresh { sequence } => {
                let Some(pending) = self.refresh.take_if(|p| p.sequence == sequence) else {
                    tracing::trace!(sequence, "stale refresh ignored");
                    return;
                };
                if pending.reveal || self.presenter.is_visible() {
                    self.refresh_now(host);
                }
            }
        }
    }

    // -- Internals ----------------------------------------------------------

    fn navigate<H: Host + ?Sized>(&mut self, host: &mut H, direction: Direction) {
        match navigator::advance(host, direction) {
            Ok(Some(nav)) => self.show(host, &nav.list, nav.index),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "navigation failed");
                host.notify(NotifyLevel::Warn, &err.to_string());
            }
        }
    }

    /// Show the current list with the active document marked.
    fn show_current<H: Host + ?Sized>(&mut self, host: &mut H) {
        let list = document::listed(host);
        if list.is_empty() {
            return;
        }
        let index = host
            .active()
            .and_then(|a| list.iter().position(|&id| id == a))
            .unwrap_or(0);
        self.show(host, &list, index);
    }

    fn refresh_now<H: Host + ?Sized>(&mut self, host: &mut H) {
        if document::listed(host).is_empty() {
            self.presenter.close(host);
        } else {
            self.show_current(host);
        }
    }

    fn show<H: Host + ?Sized>(&mut self, host: &mut H, list: &[DocumentId], index: usize) {
        if let Err(err) = self.presenter.render(host, &self.config, list, index) {
            debug_assert!(matches!(err, Error::Surface(_)));
            tracing::debug!(error = %err, "popup not shown");
        }
    }

    fn schedule_refresh<H: Host + ?Sized>(&mut self, host: &mut H, reveal: bool) {
        let reveal = match self.refresh.take() {
            Some(old) => {
                host.cancel(old.timer);
                old.reveal || reveal
            }
            None => reveal,
        };
        self.refresh_sequence += 1;
        let sequence = self.refresh_sequence;
        let timer = host.schedule(REFRESH_DEBOUNCE, TimerToken::Refresh { sequence });
        self.refresh = Some(PendingRefresh {
            timer,
            sequence,
            reveal,
        });
    }

    fn cancel_refresh<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(pending) = self.refresh.take() {
            host.cancel(pending.timer);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Padding;
    use crate::content::{Emphasis, Span};
    use crate::host::NotifyLevel;
    use crate::testing::MockHost;
    use pretty_assertions::assert_eq;

    fn config() -> Config {
        let mut c = Config::default();
        c.style.padding = Padding { left: 0, right: 0 };
        c
    }

    fn abc() -> MockHost {
        MockHost::with_docs(&[("/work/a.rs", false), ("/work/b.rs", true), ("/work/c.rs", false)])
    }

    // ── Commands ─────────────────────────────────────────────────────────

    #[test]
    fn setup_registers_commands_and_keys() {
        let mut h = abc();
        let mut c = config();
        c.keymaps.next = Some("<Tab>".into());
        c.keymaps.prev = Some("<S-Tab>".into());
        let _ = BufCycle::setup(&mut h, c);

        let names: Vec<&str> = h.commands.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["BufCycleNext", "BufCyclePrev", "BufCycleToggle", "BufCycleClose"]
        );
        assert_eq!(
            h.keys,
            vec![
                ("<Tab>".to_string(), Command::Next),
                ("<S-Tab>".to_string(), Command::Prev)
            ]
        );
    }

    #[test]
    fn next_from_modified_middle_entry() {
        // [A, B*, C], current B → next activates C and marks line 3.
        let mut h = abc();
        h.active = Some(h.nth(1));
        let mut cycle = BufCycle::new(config());
        cycle.run(&mut h, Command::Next);

        assert_eq!(h.active, Some(h.nth(2)));
        assert_eq!(
            h.popup_lines().unwrap(),
            &vec!["  a.rs", "  b.rs [+]", "> c.rs"]
        );

        let content = cycle.presenter().content_document().unwrap();
        let current: Vec<usize> = h
            .highlights
            .iter()
            .filter(|(c, _, s)| *c == content && s.emphasis == Emphasis::Current)
            .map(|&(_, line, _)| line)
            .collect();
        assert_eq!(current, vec![2]);
        assert!(
            h.highlights
                .contains(&(content, 1, Span::new(Emphasis::Modified, 6, 10)))
        );
    }

    #[test]
    fn prev_wraps_and_renders() {
        let mut h = abc();
        let mut cycle = BufCycle::new(config());
        cycle.prev(&mut h);
        assert_eq!(h.active, Some(h.nth(2)));
        assert!(cycle.is_visible());
    }

    #[test]
    fn singleton_shows_nothing() {
        let mut h = MockHost::with_docs(&[("/work/only.rs", false)]);
        let mut cycle = BufCycle::new(config());
        cycle.next(&mut h);
        assert!(h.activations.is_empty());
        assert!(!cycle.is_visible());
    }

    #[test]
    fn rejected_activation_warns_without_popup() {
        let mut h = abc();
        h.reject.insert(h.nth(1));
        let mut cycle = BufCycle::new(config());
        cycle.next(&mut h);

        assert!(!cycle.is_visible());
        assert_eq!(h.surfaces_opened, 0);
        assert_eq!(h.notifications.len(), 1);
        assert_eq!(h.notifications[0].0, NotifyLevel::Warn);
        assert!(h.notifications[0].1.contains("cannot switch to buffer 2"));
    }

    #[test]
    fn surface_failure_is_silent() {
        let mut h = abc();
        h.fail_overlay = true;
        let mut cycle = BufCycle::new(config());
        cycle.next(&mut h);
        // Navigation itself still happened.
        assert_eq!(h.active, Some(h.nth(1)));
        assert!(!cycle.is_visible());
        assert!(h.notifications.is_empty());
    }

    #[test]
    fn rapid_navigation_keeps_one_popup() {
        let mut h = abc();
        let mut cycle = BufCycle::new(config());
        for _ in 0..5 {
            cycle.next(&mut h);
            h.wait(&mut cycle, 100);
        }
        assert_eq!(h.surfaces.len(), 1);
        assert_eq!(h.timers.len(), 1);
        assert_eq!(h.surfaces_closed, 4);
    }

    #[test]
    fn popup_auto_closes() {
        let mut h = abc();
        let mut cycle = BufCycle::new(config());
        cycle.next(&mut h);
        h.wait(&mut cycle, config().timeout);
        assert!(!cycle.is_visible());
        assert!(h.surfaces.is_empty());
    }

    #[test]
    fn zero_timeout_stays_open() {
        let mut h = abc();
        let mut c = config();
        c.timeout = 0;
        let mut cycle = BufCycle::new(c);
        cycle.next(&mut h);
        h.wait(&mut cycle, 24 * 60 * 60 * 1000);
        assert!(cycle.is_visible());

        cycle.run(&mut h, Command::Close);
        assert!(!cycle.is_visible());
    }

    #[test]
    fn stale_dismiss_token_does_nothing() {
        let mut h = abc();
        let mut cycle = BufCycle::new(config());
        cycle.next(&mut h);
        let stale = cycle.presenter().generation();
        cycle.next(&mut h);

        let closed = h.surfaces_closed;
        cycle.on_timer(&mut h, TimerToken::Dismiss { generation: stale });
        assert!(cycle.is_visible());
        assert_eq!(h.surfaces_closed, closed);
    }

    // ── Toggle ───────────────────────────────────────────────────────────

    #[test]
    fn toggle_shows_then_hides() {
        let mut h = abc();
        h.active = Some(h.nth(1));
        let mut cycle = BufCycle::new(config());

        cycle.run(&mut h, Command::Toggle);
        assert!(cycle.is_visible());
        assert!(h.activations.is_empty());
        assert_eq!(h.popup_lines().unwrap()[1], "> b.rs [+]");

        cycle.run(&mut h, Command::Toggle);
        assert!(!cycle.is_visible());
    }

    #[test]
    fn toggle_with_unlisted_active_marks_first() {
        let mut h = abc();
        let scratch = h.open("", false, false);
        h.active = Some(scratch);
        let mut cycle = BufCycle::new(config());
        cycle.toggle(&mut h);
        assert_eq!(h.popup_lines().unwrap()[0], "> a.rs");
    }

    #[test]
    fn toggle_with_no_documents_does_nothing() {
        let mut h = MockHost::with_docs(&[]);
        let mut cycle = BufCycle::new(config());
        cycle.toggle(&mut h);
        assert!(!cycle.is_visible());
        assert_eq!(h.surfaces_opened, 0);
    }

    // ── Lifecycle reactions ──────────────────────────────────────────────

    #[test]
    fn removal_refreshes_visible_popup() {
        let mut h = abc();
        let mut cycle = BufCycle::new(config());
        cycle.next(&mut h);

        let gone = h.nth(0);
        h.remove(gone);
        cycle.on_document_removed(&mut h, gone);
        assert_eq!(h.popup_lines().unwrap().len(), 3);

        h.wait(&mut cycle, REFRESH_DEBOUNCE.as_millis().try_into().unwrap());
        assert_eq!(h.popup_lines().unwrap(), &vec!["> b.rs [+]", "  c.rs"]);
    }

    #[test]
    fn removal_ignored_when_hidden() {
        let mut h = abc();
        let mut cycle = BufCycle::new(config());
        let gone = h.nth(2);
        h.remove(gone);
        cycle.on_document_removed(&mut h, gone);
        assert!(h.timers.is_empty());
        h.wait(&mut cycle, 1000);
        assert!(!cycle.is_visible());
    }

    #[test]
    fn show_on_delete_reveals_hidden_popup() {
        let mut h = abc();
        let mut c = config();
        c.show_on_delete = true;
        let mut cycle = BufCycle::new(c);

        let gone = h.nth(0);
        h.remove(gone);
        cycle.on_document_removed(&mut h, gone);
        assert!(!cycle.is_visible());

        h.wait(&mut cycle, 50);
        assert!(cycle.is_visible());
        assert_eq!(h.popup_lines().unwrap(), &vec!["> b.rs [+]", "  c.rs"]);
    }

    #[test]
    fn removal_of_last_document_closes() {
        let mut h = MockHost::with_docs(&[("/work/a.rs", false), ("/work/b.rs", false)]);
        let mut c = config();
        c.timeout = 0;
        let mut cycle = BufCycle::new(c);
        cycle.next(&mut h);

        for n in [1, 0] {
            let gone = h.nth(n);
            h.remove(gone);
            cycle.on_document_removed(&mut h, gone);
        }
        h.wait(&mut cycle, 50);
        assert!(!cycle.is_visible());
        assert!(h.surfaces.is_empty());
    }

    #[test]
    fn burst_of_removals_refreshes_once() {
        let mut h = MockHost::with_docs(&[
            ("/work/a.rs", false),
            ("/work/b.rs", false),
            ("/work/c.rs", false),
            ("/work/d.rs", false),
        ]);
        let mut c = config();
        c.timeout = 0;
        let mut cycle = BufCycle::new(c);
        cycle.next(&mut h);
        let opened = h.surfaces_opened;

        for _ in 0..2 {
            let gone = h.nth(h.docs.len() - 1);
            h.remove(gone);
            cycle.on_document_removed(&mut h, gone);
            h.wait(&mut cycle, 10);
        }
        h.wait(&mut cycle, 50);
        assert_eq!(h.surfaces_opened, opened + 1);
        assert_eq!(h.popup_lines().unwrap().len(), 2);
    }

    #[test]
    fn addition_refreshes_visible_popup() {
        let mut h = abc();
        let mut cycle = BufCycle::new(config());
        cycle.next(&mut h);

        let new = h.open("/work/d.rs", false, true);
        cycle.on_document_added(&mut h, new);
        h.wait(&mut cycle, 50);
        assert_eq!(h.popup_lines().unwrap().len(), 4);
    }

    #[test]
    fn addition_ignores_unlisted_hidden_and_own_content() {
        let mut h = abc();
        let mut cycle = BufCycle::new(config());

        // Hidden popup: nothing.
        let d = h.open("/work/d.rs", false, true);
        cycle.on_document_added(&mut h, d);
        assert!(h.timers.is_empty());

        cycle.next(&mut h);
        let pending = h.timers.len();

        // Unlisted document: nothing.
        let scratch = h.open("", false, false);
        cycle.on_document_added(&mut h, scratch);
        // The popup's own content buffer: nothing.
        let own = cycle.presenter().content_document().unwrap();
        cycle.on_document_added(&mut h, own);

        assert_eq!(h.timers.len(), pending);
    }

    #[test]
    fn close_drops_pending_refresh() {
        let mut h = abc();
        let mut c = config();
        c.show_on_delete = true;
        let mut cycle = BufCycle::new(c);

        let gone = h.nth(0);
        h.remove(gone);
        cycle.on_document_removed(&mut h, gone);
        cycle.close(&mut h);
        h.wait(&mut cycle, 100);
        assert!(!cycle.is_visible());
    }

    #[test]
    fn superseded_refresh_token_is_ignored() {
        let mut h = MockHost::with_docs(&[
            ("/work/a.rs", false),
            ("/work/b.rs", false),
            ("/work/c.rs", false),
            ("/work/d.rs", false),
        ]);
        let mut c = config();
        c.timeout = 0;
        let mut cycle = BufCycle::new(c);
        cycle.next(&mut h);
        let opened = h.surfaces_opened;

        let gone = h.nth(3);
        h.remove(gone);
        cycle.on_document_removed(&mut h, gone);
        let gone = h.nth(2);
        h.remove(gone);
        cycle.on_document_removed(&mut h, gone);

        // The first refresh was cancelled, but a host delivers it anyway.
        cycle.on_timer(&mut h, TimerToken::Refresh { sequence: 1 });
        assert_eq!(h.surfaces_opened, opened);
        assert_eq!(h.timers.len(), 1);

        h.wait(&mut cycle, 50);
        assert_eq!(h.surfaces_opened, opened + 1);
        assert_eq!(h.popup_lines().unwrap().len(), 2);
    }

    #[test]
    fn refresh_skipped_if_popup_timed_out_meanwhile() {
        let mut h = abc();
        let mut c = config();
        c.timeout = 20;
        let mut cycle = BufCycle::new(c);
        cycle.next(&mut h);

        let gone = h.nth(2);
        h.remove(gone);
        cycle.on_document_removed(&mut h, gone);
        // Dismissal at 20ms, refresh at 50ms.
        h.wait(&mut cycle, 100);
        assert!(!cycle.is_visible());
    }
}
