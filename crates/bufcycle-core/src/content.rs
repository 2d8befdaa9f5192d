//! Popup content — the lines listed in the popup and their emphasis.
//!
//! Each document becomes one line:
//!
//! ```text
//! ␣ 3 > src/main.rs [+]
//! │ │ │ │           └── modified suffix (show_modified)
//! │ │ │ └── display name
//! │ │ └── marker: "> " for the current entry, "  " otherwise
//! │ └── number column (show_numbers), right-aligned, then one space
//! └── left padding
//! ```
//!
//! Emphasis spans are byte ranges into the line text, end exclusive, so a
//! host can hand them to whatever highlighting API it has without
//! re-measuring. Widths, on the other hand, are display columns: a name with
//! CJK characters is wider than its char count.

use std::fmt::Write as _;

use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::document::DocumentId;

/// Marker in front of the current entry.
pub const CURRENT_MARKER: &str = "> ";

/// Marker in front of every other entry.
pub const OTHER_MARKER: &str = "  ";

/// Suffix appended to modified documents.
pub const MODIFIED_SUFFIX: &str = " [+]";

// ─── Emphasis ───────────────────────────────────────────────────────────────

/// Kind of visual treatment a span of a line receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emphasis {
    /// The whole line of the current entry.
    Current,
    /// The number column.
    Number,
    /// The modified suffix.
    Modified,
}

impl Emphasis {
    /// Highlight group name hosts can link to their own styles.
    #[must_use]
    pub const fn group(self) -> &'static str {
        match self {
            Self::Current => "BufCycleCurrent",
            Self::Number => "BufCycleNumber",
            Self::Modified => "BufCycleModified",
        }
    }
}

/// A byte range of a line with its emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub emphasis: Emphasis,
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(emphasis: Emphasis, start: usize, end: usize) -> Self {
        Self {
            emphasis,
            start,
            end,
        }
    }
}

// ─── Lines ──────────────────────────────────────────────────────────────────

/// What the popup needs to know about one listed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: DocumentId,
    pub name: String,
    pub modified: bool,
}

/// One rendered line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub spans: Vec<Span>,
}

impl Line {
    /// Display width of the text in terminal columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.text.width()
    }

    /// Whether this line carries the current-entry emphasis.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.spans.iter().any(|s| s.emphasis == Emphasis::Current)
    }
}

/// The full popup body: one line per entry, plus the computed width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupContent {
    pub lines: Vec<Line>,
    /// Widest line plus the right padding, in columns.
    pub width: u16,
}

impl PopupContent {
    /// Build the popup body for `entries` with `current` marked.
    ///
    /// `current` is clamped to the last entry.
    #[must_use]
    pub fn build(entries: &[Entry], current: usize, config: &Config) -> Self {
        let current = current.min(entries.len().saturating_sub(1));
        let number_width = entries
            .iter()
            .map(|e| digits(e.id.get()))
            .max()
            .unwrap_or(0);
        let left = " ".repeat(usize::from(config.style.padding.left));

        let lines: Vec<Line> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let mut text = left.clone();
                let mut spans = Vec::new();

                if config.show_numbers {
                    let start = text.len();
                    let _ = write!(text, "{:>number_width$}", entry.id.get());
                    spans.push(Span::new(Emphasis::Number, start, text.len()));
                    text.push(' ');
                }

                text.push_str(if i == current {
                    CURRENT_MARKER
                } else {
                    OTHER_MARKER
                });
                text.push_str(&entry.name);

                if config.show_modified && entry.modified {
                    let start = text.len();
                    text.push_str(MODIFIED_SUFFIX);
                    spans.push(Span::new(Emphasis::Modified, start, text.len()));
                }

                if i == current {
                    spans.insert(0, Span::new(Emphasis::Current, 0, text.len()));
                }

                Line { text, spans }
            })
            .collect();

        let widest = lines.iter().map(Line::width).max().unwrap_or(0);
        let width = widest + usize::from(config.style.padding.right);

        Self {
            lines,
            width: u16::try_from(width).unwrap_or(u16::MAX),
        }
    }

    /// Number of lines, which is also the popup height.
    #[must_use]
    pub fn height(&self) -> u16 {
        u16::try_from(self.lines.len()).unwrap_or(u16::MAX)
    }

    /// The line texts, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.text.clone()).collect()
    }

    /// Index of the line carrying the current emphasis.
    #[must_use]
    pub fn current(&self) -> Option<usize> {
        self.lines.iter().position(Line::is_current)
    }
}

fn digits(mut n: u32) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
