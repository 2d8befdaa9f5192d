// SPDX-License-Identifier: MIT
//
// bufcycle-screen — character-grid screen for the bufcycle reference host.
//
// The reference host has no real editor UI to put the popup on, so it
// paints one: a grid of cells the size of the viewport, with the popup's
// frame and text painted on top. The grid can be printed as plain text
// (for scripts and tests) or with ANSI styling (for a terminal).
//
//   cell     → one grapheme plus the marks that style it
//   grid     → the 2D cell buffer, wide-character aware painting
//   border   → frame glyphs and frame painting for each border kind
//   overlay  → painting a popup (frame, lines, emphasis) onto a grid
//   output   → plain and ANSI serialization
//   terminal → terminal size query

pub mod border;
pub mod cell;
pub mod grid;
pub mod output;
pub mod overlay;
pub mod terminal;

pub use cell::{Cell, Mark};
pub use grid::Grid;
