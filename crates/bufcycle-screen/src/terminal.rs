// SPDX-License-Identifier: MIT
//
// Terminal queries — the size of the controlling terminal.
//
// Safety: `ioctl(TIOCGWINSZ)` is the POSIX interface for
// the question; there is no safe alternative. The unsafe blocks are a
// zeroed stack value and a single call on it.
#![allow(unsafe_code)]

use bufcycle_core::host::Size;

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size::new(ws.ws_col, ws.ws_row))
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}
