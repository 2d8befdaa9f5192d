//! User-invocable commands.
//!
//! Hosts register these by name during [`BufCycle::setup`] and route
//! invocations back through [`BufCycle::run`]. Names are matched
//! case-insensitively; short forms are accepted for scripting.
//!
//! | Command          | Short forms         |
//! |------------------|---------------------|
//! | `BufCycleNext`   | `next`, `n`         |
//! | `BufCyclePrev`   | `prev`, `previous`, `p` |
//! | `BufCycleToggle` | `toggle`            |
//! | `BufCycleClose`  | `close`             |
//!
//! [`BufCycle::setup`]: crate::cycle::BufCycle::setup
//! [`BufCycle::run`]: crate::cycle::BufCycle::run

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Switch to the next listed document.
    Next,
    /// Switch to the previous listed document.
    Prev,
    /// Show the popup if hidden, hide it if shown.
    Toggle,
    /// Hide the popup.
    Close,
}

impl Command {
    pub const ALL: [Self; 4] = [Self::Next, Self::Prev, Self::Toggle, Self::Close];

    /// Registered command name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Next => "BufCycleNext",
            Self::Prev => "BufCyclePrev",
            Self::Toggle => "BufCycleToggle",
            Self::Close => "BufCycleClose",
        }
    }

    /// Parse a registered name or short form.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        match lower.as_str() {
            "bufcyclenext" | "next" | "n" => Some(Self::Next),
            "bufcycleprev" | "prev" | "previous" | "p" => Some(Self::Prev),
            "bufcycletoggle" | "toggle" => Some(Self::Toggle),
            "bufcycleclose" | "close" => Some(Self::Close),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
