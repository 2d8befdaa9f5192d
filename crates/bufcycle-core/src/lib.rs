//! # bufcycle-core — Buffer cycling with a transient popup
//!
//! This crate contains everything that decides *what* happens when the user
//! cycles through open documents. Everything that decides *how it looks on a
//! real screen* belongs to the host editor and is reached through the traits
//! in [`host`].
//!
//! - **[`document`]** — `DocumentId`, `DocumentInfo`, the listed-document query
//! - **[`host`]** — the capability traits a host editor implements
//! - **[`navigator`]** — next/previous target selection with wraparound
//! - **[`content`]** — popup lines and their emphasis spans
//! - **[`layout`]** — placement of the popup inside the viewport
//! - **[`presenter`]** — the single live popup and its dismissal timer
//! - **[`timer`]** — timer tokens and a virtual-clock queue for hosts
//! - **[`config`]** — `Config` with defaults and the TOML overlay
//! - **[`command`]** — the user-invocable commands
//! - **[`cycle`]** — `BufCycle`, the glue that hosts talk to
//!
//! # Flow
//!
//! ```text
//! key / command ──► BufCycle::run ──► navigator::advance ──► Host::activate
//!                                             │
//!                                             ▼
//!                     Presenter::render ──► Host::open_overlay + schedule
//!                                             │
//!          Host timer fires ──► BufCycle::on_timer ──► Presenter::on_dismiss
//! ```

pub mod command;
pub mod config;
pub mod content;
pub mod cycle;
pub mod document;
pub mod error;
pub mod host;
pub mod layout;
pub mod navigator;
pub mod presenter;
pub mod timer;

#[cfg(test)]
mod testing;

pub use command::Command;
pub use config::{Config, ConfigOverlay};
pub use cycle::BufCycle;
pub use document::{DocumentId, DocumentInfo};
pub use error::Error;
pub use host::Host;
pub use timer::TimerToken;
