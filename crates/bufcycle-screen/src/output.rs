// SPDX-License-Identifier: MIT
//
// Output — serializing a grid for printing.
//
// Plain output is what scripts and tests compare against: one line per
// row, trailing blanks trimmed, marks ignored. ANSI output styles each run
// of identically-marked cells with a single SGR sequence, in the spirit of
// a stateful cell writer: a new sequence is emitted only when the mark
// changes, and every row ends with a reset so nothing bleeds into the next.

use std::fmt::Write as _;

use crate::cell::Mark;
use crate::grid::Grid;

/// SGR reset.
const RESET: &str = "\x1b[0m";

/// How to serialize a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// Text only.
    #[default]
    Plain,
    /// Text with ANSI SGR styling per mark.
    Ansi,
}

/// Serialize `grid` in `style`. Rows are separated by `\n`, with no
/// trailing newline.
#[must_use]
pub fn render(grid: &Grid, style: Style) -> String {
    let rows: Vec<String> = (0..grid.height())
        .map(|y| match style {
            Style::Plain => grid.row_text(y).trim_end().to_string(),
            Style::Ansi => ansi_row(grid, y),
        })
        .collect();
    rows.join("\n")
}

/// SGR parameters for a mark, most specific last so it wins.
#[must_use]
pub fn sgr(mark: Mark) -> String {
    let mut params: Vec<&str> = vec!["0"];
    if mark.contains(Mark::BORDER) {
        params.push("2");
    }
    if mark.contains(Mark::SHADOW) {
        params.push("90");
    }
    if mark.contains(Mark::NUMBER) {
        params.push("36");
    }
    if mark.contains(Mark::MODIFIED) {
        params.push("1;33");
    }
    if mark.intersects(Mark::CURRENT | Mark::STATUS) {
        params.push("7");
    }
    format!("\x1b[{}m", params.join(";"))
}

fn ansi_row(grid: &Grid, y: u16) -> String {
    let mut out = String::new();
    let mut current = Mark::empty();

    if let Some(cells) = grid.row(y) {
        for cell in cells {
            if cell.is_continuation() {
                continue;
            }
            if cell.mark != current {
                current = cell.mark;
                let _ = write!(out, "{}", sgr(current));
            }
            out.push_str(&cell.symbol);
        }
    }

    if !current.is_empty() {
        out.push_str(RESET);
    }
    out
}

// ─── Tests ──────────────────────────────────────────────────────────────────
