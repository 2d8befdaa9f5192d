//! Popup placement.
//!
//! The popup's content area is placed inside the viewport according to the
//! configured [`Placement`]. All arithmetic is signed so that a popup larger
//! than the viewport yields negative offsets, which are clamped to zero only
//! when building the final [`Geometry`].
//!
//! | Placement      | row                 | col                 |
//! |----------------|---------------------|---------------------|
//! | `center`       | ⌊(H − h) / 2⌋       | ⌊(W − w) / 2⌋       |
//! | `bottom-left`  | H − h − 4           | 2                   |
//! | `top-right`    | 2                   | W − w − 2           |
//! | `top-left`     | 2                   | 2                   |
//! | `bottom-right` | H − h − 4           | W − w − 2           |

use std::fmt;

use serde::Deserialize;

use crate::host::Size;

/// Distance kept from the viewport edge on the near side.
const EDGE_MARGIN: i32 = 2;

/// Rows kept free below a bottom-anchored popup (status and command lines).
const BOTTOM_MARGIN: i32 = 4;

// ─── Placement ──────────────────────────────────────────────────────────────

/// Where the popup sits in the viewport.
///
/// Unrecognized names fall back to [`Placement::BottomRight`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum Placement {
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

impl Placement {
    pub const ALL: [Self; 5] = [
        Self::Center,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Configuration name of this placement.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }

    /// Parse a configuration name. Returns `None` for unknown names.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Parse a configuration name, falling back to the default.
    #[must_use]
    pub fn from_name_lossy(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            tracing::warn!(position = name, "unknown popup position, using bottom-right");
            Self::default()
        })
    }
}

impl From<String> for Placement {
    fn from(name: String) -> Self {
        Self::from_name_lossy(&name)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Border ─────────────────────────────────────────────────────────────────

/// Border drawn around the popup's content area.
///
/// Unrecognized names fall back to [`Border::Rounded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum Border {
    /// No border.
    None,
    /// `┌─┐` box drawing.
    Single,
    /// `╔═╗` box drawing.
    Double,
    /// `╭─╮` box drawing.
    #[default]
    Rounded,
    /// A frame of blank cells.
    Solid,
    /// A drop shadow on the right and bottom edges only.
    Shadow,
}

impl Border {
    pub const ALL: [Self; 6] = [
        Self::None,
        Self::Single,
        Self::Double,
        Self::Rounded,
        Self::Solid,
        Self::Shadow,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Single => "single",
            Self::Double => "double",
            Self::Rounded => "rounded",
            Self::Solid => "solid",
            Self::Shadow => "shadow",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    /// Parse a configuration name, falling back to the default.
    #[must_use]
    pub fn from_name_lossy(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            tracing::warn!(border = name, "unknown border style, using rounded");
            Self::default()
        })
    }
}

impl From<String> for Border {
    fn from(name: String) -> Self {
        Self::from_name_lossy(&name)
    }
}

impl fmt::Display for Border {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Geometry ───────────────────────────────────────────────────────────────

/// Screen rectangle of the popup's content area, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    pub row: u16,
    pub col: u16,
    pub width: u16,
    pub height: u16,
}

/// Signed `(row, col)` of a `width × height` popup for `placement`.
///
/// This is the raw formula; offsets go negative when the popup does not fit.
#[must_use]
pub fn origin(placement: Placement, viewport: Size, width: u16, height: u16) -> (i32, i32) {
    let vw = i32::from(viewport.cols);
    let vh = i32::from(viewport.rows);
    let w = i32::from(width);
    let h = i32::from(height);

    match placement {
        // div_euclid floors toward negative infinity, like the formula.
        Placement::Center => ((vh - h).div_euclid(2), (vw - w).div_euclid(2)),
        Placement::BottomLeft => (vh - h - BOTTOM_MARGIN, EDGE_MARGIN),
        Placement::TopRight => (EDGE_MARGIN, vw - w - EDGE_MARGIN),
        Placement::TopLeft => (EDGE_MARGIN, EDGE_MARGIN),
        Placement::BottomRight => (vh - h - BOTTOM_MARGIN, vw - w - EDGE_MARGIN),
    }
}

/// Place a `width × height` popup in `viewport`.
///
/// Negative offsets are clamped to the top-left edge.
#[must_use]
pub fn place(placement: Placement, viewport: Size, width: u16, height: u16) -> Geometry {
    let (row, col) = origin(placement, viewport, width, height);
    Geometry {
        row: clamp_offset(row),
        col: clamp_offset(col),
        width,
        height,
    }
}

fn clamp_offset(v: i32) -> u16 {
    u16::try_from(v.max(0)).unwrap_or(u16::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
