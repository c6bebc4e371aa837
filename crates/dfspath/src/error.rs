// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by path handle operations
#[derive(Debug, Error)]
pub enum Error {
    #[error("Rename source does not exist: {0}")]
    SourceNotFound(String),

    #[error("Destination already exists: {0}")]
    DestinationExists(String),

    #[error("Parent path is not a directory: {0}")]
    ParentNotDirectory(String),

    #[error("Incompatible rename destination: {0}")]
    IncompatibleDestination(String),

    #[error("Failed to rename {src} to {dst}")]
    RenameFailed { src: String, dst: String },

    #[error(transparent)]
    Client(#[from] dfsclient::Error),
}

impl Error {
    /// True when the underlying client reported a missing path
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Client(e) if e.is_not_found())
    }
}
