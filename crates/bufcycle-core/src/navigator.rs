//! Navigation — which document comes next.
//!
//! The listed documents are fetched fresh from the host on every call, the
//! active one is located by identity, and the target wraps around at both
//! ends. Singleton and empty lists are a silent no-op: there is nothing to
//! switch to.
//!
//! When the active document is not in the list (an unlisted help or scratch
//! buffer, say), navigation lands on the first listed document regardless of
//! direction, as if moving forward from just before the first entry.

use crate::document::{self, DocumentId};
use crate::error::{Error, Result};
use crate::host::Documents;

/// Direction of a navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

impl Direction {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Next => Self::Prev,
            Self::Prev => Self::Next,
        }
    }
}

/// Result of a successful step: the list it was computed on and the index of
/// the newly active document in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub list: Vec<DocumentId>,
    pub index: usize,
}

impl Navigation {
    /// The newly active document.
    #[must_use]
    pub fn target(&self) -> DocumentId {
        self.list[self.index]
    }
}

/// Index to move to from `current` in a list of `len` entries.
///
/// Returns `None` when there is nothing to switch to (`len <= 1`). A
/// `current` of `None` (active document not listed) yields `0`.
#[must_use]
pub const fn target_index(
    current: Option<usize>,
    len: usize,
    direction: Direction,
) -> Option<usize> {
    if len <= 1 {
        return None;
    }
    match current {
        None => Some(0),
        // Stepping back adds `len - 1` instead of subtracting 1, so the
        // arithmetic never goes negative.
        Some(i) => match direction {
            Direction::Next => Some((i + 1) % len),
            Direction::Prev => Some((i + len - 1) % len),
        },
    }
}

/// Step the active document one position in `direction`.
///
/// Returns `Ok(None)` when fewer than two documents are listed; no
/// activation is requested in that case.
///
/// # Errors
///
/// Returns [`Error::ActivationRejected`] when the host refuses to activate
/// the target.
pub fn advance<D: Documents + ?Sized>(
    host: &mut D,
    direction: Direction,
) -> Result<Option<Navigation>> {
    let list = document::listed(host);
    let current = host.active().and_then(|a| list.iter().position(|&id| id == a));

    let Some(index) = target_index(current, list.len(), direction) else {
        tracing::trace!(len = list.len(), "nothing to switch to");
        return Ok(None);
    };

    let target = list[index];
    host.activate(target)
        .map_err(|source| Error::ActivationRejected { id: target, source })?;

    tracing::debug!(?direction, %target, index, len = list.len(), "switched document");
    Ok(Some(Navigation { list, index }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostError;
    use crate::testing::MockHost;
    use proptest::prelude::*;

    fn host(n: usize) -> MockHost {
        let names: Vec<String> = (0..n).map(|i| format!("f{i}.rs")).collect();
        let docs: Vec<(&str, bool)> = names.iter().map(|s| (s.as_str(), false)).collect();
        MockHost::with_docs(&docs)
    }

    #[test]
    fn next_wraps_to_first() {
        let mut h = host(3);
        h.active = Some(h.nth(2));
        let nav = advance(&mut h, Direction::Next).unwrap().unwrap();
        assert_eq!(nav.index, 0);
        assert_eq!(h.active, Some(h.nth(0)));
    }

    #[test]
    fn prev_wraps_to_last() {
        let mut h = host(3);
        let nav = advance(&mut h, Direction::Prev).unwrap().unwrap();
        assert_eq!(nav.index, 2);
        assert_eq!(nav.target(), h.nth(2));
    }

    #[test]
    fn singleton_is_noop_without_activation() {
        let mut h = host(1);
        assert_eq!(advance(&mut h, Direction::Next).unwrap(), None);
        assert_eq!(advance(&mut h, Direction::Prev).unwrap(), None);
        assert!(h.activations.is_empty());
    }

    #[test]
    fn empty_is_noop() {
        let mut h = host(0);
        assert_eq!(advance(&mut h, Direction::Next).unwrap(), None);
        assert!(h.activations.is_empty());
    }

    #[test]
    fn unlisted_active_lands_on_first() {
        for direction in [Direction::Next, Direction::Prev] {
            let mut h = host(3);
            let help = h.open("help.txt", false, false);
            h.active = Some(help);
            let nav = advance(&mut h, direction).unwrap().unwrap();
            assert_eq!(nav.index, 0);
            assert_eq!(h.active, Some(h.nth(0)));
        }
    }

    #[test]
    fn unlisted_documents_are_skipped() {
        let mut h = host(2);
        let hidden = h.open("hidden", false, false);
        let last = h.open("last.rs", false, true);
        h.active = Some(h.nth(1));
        let nav = advance(&mut h, Direction::Next).unwrap().unwrap();
        assert_eq!(nav.target(), last);
        assert!(!nav.list.contains(&hidden));
    }

    #[test]
    fn rejected_activation_is_an_error() {
        let mut h = host(3);
        let target = h.nth(1);
        h.reject.insert(target);
        let err = advance(&mut h, Direction::Next).unwrap_err();
        match err {
            Error::ActivationRejected { id, source } => {
                assert_eq!(id, target);
                assert_eq!(source, HostError::InvalidDocument(target));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(h.active, Some(h.nth(0)));
    }

    #[test]
    fn target_index_table() {
        assert_eq!(target_index(Some(0), 3, Direction::Next), Some(1));
        assert_eq!(target_index(Some(2), 3, Direction::Next), Some(0));
        assert_eq!(target_index(Some(0), 3, Direction::Prev), Some(2));
        assert_eq!(target_index(Some(1), 2, Direction::Prev), Some(0));
        assert_eq!(target_index(None, 3, Direction::Prev), Some(0));
        assert_eq!(target_index(Some(0), 1, Direction::Next), None);
        assert_eq!(target_index(None, 0, Direction::Next), None);
    }

    proptest! {
        #[test]
        fn n_steps_close_the_cycle(len in 2usize..64, start in 0usize..64, forward: bool) {
            let start = start % len;
            let direction = if forward { Direction::Next } else { Direction::Prev };
            let mut i = start;
            for _ in 0..len {
                i = target_index(Some(i), len, direction).unwrap();
            }
            prop_assert_eq!(i, start);
        }

        #[test]
        fn step_and_back_is_identity(len in 2usize..64, start in 0usize..64, forward: bool) {
            let start = start % len;
            let direction = if forward { Direction::Next } else { Direction::Prev };
            let there = target_index(Some(start), len, direction).unwrap();
            let back = target_index(Some(there), len, direction.opposite()).unwrap();
            prop_assert_eq!(back, start);
        }

        #[test]
        fn host_cycle_returns_to_start(len in 2usize..12, start in 0usize..12) {
            let mut h = host(len);
            let start = start % len;
            h.active = Some(h.nth(start));
            for _ in 0..len {
                advance(&mut h, Direction::Next).unwrap();
            }
            prop_assert_eq!(h.active, Some(h.nth(start)));
            prop_assert_eq!(h.activations.len(), len);
        }
    }
}
