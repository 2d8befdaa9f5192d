// SPDX-License-Identifier: MIT
//
// Grid — the 2D cell buffer the reference host paints its screen into.
//
// Flat `Vec<Cell>` with row-major indexing. All writes are bounds-checked
// and silently clipped: a popup that hangs off the right edge simply loses
// its overflowing columns.
//
// Text is painted grapheme by grapheme, so a combining accent stays with
// its base character. Wide graphemes take two columns; the second is a
// continuation cell. Overwriting either half of a wide grapheme breaks it
// cleanly (the other half becomes a blank) instead of leaving half a glyph.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::cell::{Cell, Mark};

pub struct Grid {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Grid {
    // ─── Construction ────────────────────────────────────────────────────

    /// A grid filled with blank cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![Cell::blank(); size],
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Cells of row `y`.
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y >= self.height {
            return None;
        }
        let start = self.index(0, y);
        Some(&self.cells[start..start + usize::from(self.width)])
    }

    /// Text of row `y`, continuation cells skipped, trailing blanks kept.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .map(|cells| cells.iter().map(|c| c.symbol.as_str()).collect())
            .unwrap_or_default()
    }

    // ─── Writes ──────────────────────────────────────────────────────────

    /// Reset every cell to blank.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::blank());
    }

    /// Write a cell. Returns `true` if `(x, y)` was in bounds.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.break_wide_at(x, y);
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        true
    }

    /// Fill a rectangle with `symbol` (a single-column grapheme).
    pub fn fill(&mut self, x: u16, y: u16, width: u16, height: u16, symbol: &str, mark: Mark) {
        for row in y..y.saturating_add(height) {
            for col in x..x.saturating_add(width) {
                self.set(col, row, Cell::new(symbol, mark));
            }
        }
    }

    /// Add `mark` to `cols` cells starting at `(x, y)`.
    pub fn add_mark(&mut self, x: u16, y: u16, cols: u16, mark: Mark) {
        for col in x..x.saturating_add(cols) {
            if self.in_bounds(col, y) {
                let idx = self.index(col, y);
                self.cells[idx].mark |= mark;
            }
        }
    }

    /// Paint `text` starting at `(x, y)`. Returns the number of columns
    /// consumed.
    ///
    /// Zero-width graphemes are skipped. A wide grapheme that would be cut
    /// by the right edge is replaced with a blank.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, mark: Mark) -> u16 {
        if y >= self.height {
            return 0;
        }

        let mut col = x;
        for grapheme in text.graphemes(true) {
            if col >= self.width {
                break;
            }
            let w = grapheme.width().min(2);
            if w == 0 {
                continue;
            }

            if w == 2 && col + 1 >= self.width {
                self.set(col, y, Cell::new(" ", mark));
                col += 1;
                break;
            }

            self.set(col, y, Cell::new(grapheme, mark));
            if w == 2 {
                self.set(col + 1, y, Cell::continuation(mark));
                col += 2;
            } else {
                col += 1;
            }
        }

        col - x
    }

    /// Break any wide grapheme touching `(x, y)` before it is overwritten.
    fn break_wide_at(&mut self, x: u16, y: u16) {
        let idx = self.index(x, y);

        if self.cells[idx].is_continuation() && x > 0 {
            let owner = self.index(x - 1, y);
            self.cells[owner].symbol = " ".to_string();
        }

        if x + 1 < self.width {
            let next = self.index(x + 1, y);
            if self.cells[next].is_continuation() {
                self.cells[next] = Cell::blank();
            }
        }
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Grid({}x{})", self.width, self.height)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
