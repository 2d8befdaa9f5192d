//! Errors produced by the core.
//!
//! None of these ever stop the user from editing. [`BufCycle`] turns
//! activation failures into a warning notification and drops surface
//! failures after logging them; only configuration loading surfaces an
//! error to the caller, and only at startup.
//!
//! [`BufCycle`]: crate::cycle::BufCycle

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::document::DocumentId;
use crate::host::HostError;

#[derive(Debug, Error)]
pub enum Error {
    /// The host refused to switch to the navigation target.
    #[error("cannot switch to buffer {id}: {source}")]
    ActivationRejected {
        id: DocumentId,
        #[source]
        source: HostError,
    },

    /// The popup's content buffer or floating surface could not be created.
    #[error("cannot open popup: {0}")]
    Surface(#[source] HostError),

    /// The configuration file could not be read.
    #[error("cannot read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML or has unknown keys.
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
