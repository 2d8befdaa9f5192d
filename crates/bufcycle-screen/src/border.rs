// SPDX-License-Identifier: MIT
//
// Borders — frame glyphs for each border kind and frame painting.
//
// Framed kinds (single, double, rounded, solid) draw a one-cell frame
// whose outer top-left corner sits at the popup's (row, col); the content
// starts one cell in. `none` draws nothing and the content starts at
// (row, col). `shadow` also starts the content at (row, col) and draws a
// one-cell shadow along the right and bottom edges, offset by one.
//
//   rounded             shadow
//   ╭──────╮            content░
//   │ text │            content░
//   ╰──────╯             ░░░░░░░

use bufcycle_core::layout::{Border, Geometry};

use crate::cell::{Cell, Mark};
use crate::grid::Grid;

/// Glyph used for the drop shadow.
pub const SHADOW: &str = "░";

/// The eight frame glyphs, clockwise from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub top_left: &'static str,
    pub top: &'static str,
    pub top_right: &'static str,
    pub right: &'static str,
    pub bottom_right: &'static str,
    pub bottom: &'static str,
    pub bottom_left: &'static str,
    pub left: &'static str,
}

impl Glyphs {
    const fn uniform(g: &'static str) -> Self {
        Self {
            top_left: g,
            top: g,
            top_right: g,
            right: g,
            bottom_right: g,
            bottom: g,
            bottom_left: g,
            left: g,
        }
    }
}

const SINGLE: Glyphs = Glyphs {
    top_left: "┌",
    top: "─",
    top_right: "┐",
    right: "│",
    bottom_right: "┘",
    bottom: "─",
    bottom_left: "└",
    left: "│",
};

const DOUBLE: Glyphs = Glyphs {
    top_left: "╔",
    top: "═",
    top_right: "╗",
    right: "║",
    bottom_right: "╝",
    bottom: "═",
    bottom_left: "╚",
    left: "║",
};

const ROUNDED: Glyphs = Glyphs {
    top_left: "╭",
    top: "─",
    top_right: "╮",
    right: "│",
    bottom_right: "╯",
    bottom: "─",
    bottom_left: "╰",
    left: "│",
};

const SOLID: Glyphs = Glyphs::uniform(" ");

/// Frame glyphs for `border`, or `None` for kinds without a full frame.
#[must_use]
pub const fn glyphs(border: Border) -> Option<Glyphs> {
    match border {
        Border::Single => Some(SINGLE),
        Border::Double => Some(DOUBLE),
        Border::Rounded => Some(ROUNDED),
        Border::Solid => Some(SOLID),
        Border::None | Border::Shadow => None,
    }
}

/// Offset of the content area from the popup's (row, col).
#[must_use]
pub const fn content_offset(border: Border) -> u16 {
    if glyphs(border).is_some() { 1 } else { 0 }
}

/// Paint the frame (or shadow) for a popup at `geometry`.
///
/// Returns the `(x, y)` where the content area starts.
pub fn paint(grid: &mut Grid, geometry: Geometry, border: Border) -> (u16, u16) {
    let Geometry {
        row,
        col,
        width,
        height,
    } = geometry;

    if let Some(g) = glyphs(border) {
        let right = col.saturating_add(width).saturating_add(1);
        let bottom = row.saturating_add(height).saturating_add(1);
        let mark = Mark::BORDER;

        grid.set(col, row, Cell::new(g.top_left, mark));
        grid.set(right, row, Cell::new(g.top_right, mark));
        grid.set(col, bottom, Cell::new(g.bottom_left, mark));
        grid.set(right, bottom, Cell::new(g.bottom_right, mark));
        for x in col + 1..right {
            grid.set(x, row, Cell::new(g.top, mark));
            grid.set(x, bottom, Cell::new(g.bottom, mark));
        }
        for y in row + 1..bottom {
            grid.set(col, y, Cell::new(g.left, mark));
            grid.set(right, y, Cell::new(g.right, mark));
        }
        return (col + 1, row + 1);
    }

    if border == Border::Shadow {
        let right = col.saturating_add(width);
        let bottom = row.saturating_add(height);
        for y in row + 1..=bottom {
            grid.set(right, y, Cell::new(SHADOW, Mark::SHADOW));
        }
        for x in col + 1..right {
            grid.set(x, bottom, Cell::new(SHADOW, Mark::SHADOW));
        }
    }

    (col, row)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
