// SPDX-License-Identifier: MIT
//
// Overlay painting — a popup surface onto the grid.
//
// The host keeps, per surface, the content lines and the emphasis spans the
// core asked for. Painting draws the frame, blanks the content area, writes
// the lines and finally converts each span's byte range into columns and
// marks those cells. The current-entry emphasis covers the full content
// width so the whole row reads as selected, padding included.

use bufcycle_core::content::{Emphasis, Span};
use bufcycle_core::host::OverlaySpec;
use unicode_width::UnicodeWidthStr;

use crate::border;
use crate::cell::Mark;
use crate::grid::Grid;

/// Paint a popup described by `spec` with `lines` and `spans`.
///
/// `spans` pairs a line index with a span on that line. Spans that do not
/// fall on char boundaries of their line are ignored.
pub fn paint(grid: &mut Grid, spec: &OverlaySpec, lines: &[String], spans: &[(usize, Span)]) {
    let geo = spec.geometry;
    let (x, y) = border::paint(grid, geo, spec.border);

    grid.fill(x, y, geo.width, geo.height, " ", Mark::POPUP);

    for (i, text) in lines.iter().enumerate().take(usize::from(geo.height)) {
        let Ok(row) = u16::try_from(i) else { break };
        grid.put_str(x, y + row, text, Mark::POPUP);
    }

    for &(line, span) in spans {
        let (Some(text), Ok(row)) = (lines.get(line), u16::try_from(line)) else {
            continue;
        };
        if row >= geo.height {
            continue;
        }
        let Some((start, cols)) = columns(text, span) else {
            continue;
        };
        if span.emphasis == Emphasis::Current {
            grid.add_mark(x, y + row, geo.width, Mark::CURRENT);
        } else {
            grid.add_mark(x + start, y + row, cols, Mark::from(span.emphasis));
        }
    }
}

/// Start column and column count of a span's byte range within `text`.
fn columns(text: &str, span: Span) -> Option<(u16, u16)> {
    let before = text.get(..span.start)?;
    let inside = text.get(span.start..span.end)?;
    let start = u16::try_from(before.width()).ok()?;
    let cols = u16::try_from(inside.width()).ok()?;
    Some((start, cols))
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bufcycle_core::layout::{Border, Geometry};
    use pretty_assertions::assert_eq;

    fn spec(border: Border, width: u16, height: u16) -> OverlaySpec {
        OverlaySpec {
            geometry: Geometry {
                row: 0,
                col: 0,
                width,
                height,
            },
            border,
            focusable: false,
        }
    }

    #[test]
    fn paints_lines_inside_frame() {
        let mut grid = Grid::new(10, 4);
        let lines = vec!["> a".to_string(), "  bb".to_string()];
        paint(&mut grid, &spec(Border::Single, 5, 2), &lines, &[]);
        assert_eq!(grid.row_text(0), "┌─────┐   ");
        assert_eq!(grid.row_text(1), "│> a  │   ");
        assert_eq!(grid.row_text(2), "│  bb │   ");
        assert_eq!(grid.row_text(3), "└─────┘   ");
        assert!(grid.get(4, 1).unwrap().mark.contains(Mark::POPUP));
    }

    #[test]
    fn current_marks_whole_row_and_suffix_marks_its_columns() {
        let mut grid = Grid::new(12, 2);
        let lines = vec!["> 日 [+]".to_string(), "  b".to_string()];
        let spans = [
            (0, Span::new(Emphasis::Current, 0, 9)),
            (0, Span::new(Emphasis::Modified, 5, 9)),
        ];
        paint(&mut grid, &spec(Border::None, 9, 2), &lines, &spans);

        // "> " is 2 columns, "日" 2 more, so the suffix starts at column 4.
        assert!(grid.get(3, 0).unwrap().mark.contains(Mark::CURRENT));
        assert!(!grid.get(3, 0).unwrap().mark.contains(Mark::MODIFIED));
        for x in 4..8 {
            assert!(grid.get(x, 0).unwrap().mark.contains(Mark::MODIFIED));
        }
        // Padding column is still part of the current row.
        assert!(grid.get(8, 0).unwrap().mark.contains(Mark::CURRENT));
        assert!(!grid.get(0, 1).unwrap().mark.contains(Mark::CURRENT));
    }

    #[test]
    fn invalid_spans_are_ignored() {
        let mut grid = Grid::new(6, 1);
        let lines = vec!["日x".to_string()];
        let spans = [
            (0, Span::new(Emphasis::Number, 1, 2)),
            (3, Span::new(Emphasis::Number, 0, 1)),
        ];
        paint(&mut grid, &spec(Border::None, 3, 1), &lines, &spans);
        assert!(!grid.get(0, 0).unwrap().mark.contains(Mark::NUMBER));
    }

    #[test]
    fn span_columns() {
        assert_eq!(columns("ab [+]", Span::new(Emphasis::Modified, 2, 6)), Some((2, 4)));
        assert_eq!(columns("ab", Span::new(Emphasis::Modified, 1, 9)), None);
    }
}
