// SPDX-License-Identifier: MIT
//
// Cell — one column of the screen grid.
//
// A cell holds a grapheme cluster and a set of marks. Marks are semantic
// (current entry, number column, ...) rather than colors: the output stage
// decides what each mark looks like, so the same grid prints as plain text
// in tests and as styled text in a terminal.
//
// Wide graphemes (CJK, some emoji) occupy two columns. The first cell holds
// the grapheme; the second is a continuation cell with an empty symbol.

use bufcycle_core::content::Emphasis;

// ─── Marks ──────────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Semantic styling of a cell. Combine with bitwise OR.
    ///
    /// ```
    /// use bufcycle_screen::cell::Mark;
    ///
    /// let m = Mark::CURRENT | Mark::MODIFIED;
    /// assert!(m.contains(Mark::CURRENT));
    /// assert!(!m.contains(Mark::BORDER));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Mark: u8 {
        /// Line of the current entry.
        const CURRENT  = 1 << 0;
        /// Number column.
        const NUMBER   = 1 << 1;
        /// Modified suffix.
        const MODIFIED = 1 << 2;
        /// Popup frame.
        const BORDER   = 1 << 3;
        /// Popup drop shadow.
        const SHADOW   = 1 << 4;
        /// Popup body (everything inside the frame).
        const POPUP    = 1 << 5;
        /// Editor status line.
        const STATUS   = 1 << 6;
    }
}

impl From<Emphasis> for Mark {
    fn from(emphasis: Emphasis) -> Self {
        match emphasis {
            Emphasis::Current => Self::CURRENT,
            Emphasis::Number => Self::NUMBER,
            Emphasis::Modified => Self::MODIFIED,
        }
    }
}

// ─── Cell ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Grapheme shown in this column. Empty for continuation cells.
    pub symbol: String,
    pub mark: Mark,
}

impl Cell {
    /// A blank, unmarked cell.
    #[must_use]
    pub fn blank() -> Self {
        Self::new(" ", Mark::empty())
    }

    #[must_use]
    pub fn new(symbol: &str, mark: Mark) -> Self {
        Self {
            symbol: symbol.to_string(),
            mark,
        }
    }

    /// The second column of a wide grapheme.
    #[must_use]
    pub const fn continuation(mark: Mark) -> Self {
        Self {
            symbol: String::new(),
            mark,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_continuation(&self) -> bool {
        self.symbol.is_empty()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}
