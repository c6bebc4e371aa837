// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by a filesystem client
#[derive(Debug, Error)]
pub enum Error {
    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Entry already exists: {0}")]
    AlreadyExists(String),

    #[error("Parent path is not a directory: {0}")]
    ParentNotDirectory(String),

    #[error("Is a directory: {0}")]
    IsADirectory(String),

    #[error("Directory is not empty: {0}")]
    DirectoryNotEmpty(String),

    #[error("Wrong filesystem: path {path} does not belong to {expected}")]
    WrongFs { path: String, expected: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Unknown filesystem scheme: {0}")]
    UnknownScheme(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn not_found<P: ToString>(path: P) -> Self {
        Error::NotFound(path.to_string())
    }

    pub fn already_exists<P: ToString>(path: P) -> Self {
        Error::AlreadyExists(path.to_string())
    }

    pub fn parent_not_directory<P: ToString>(path: P) -> Self {
        Error::ParentNotDirectory(path.to_string())
    }

    pub fn is_a_directory<P: ToString>(path: P) -> Self {
        Error::IsADirectory(path.to_string())
    }

    pub fn directory_not_empty<P: ToString>(path: P) -> Self {
        Error::DirectoryNotEmpty(path.to_string())
    }

    pub fn invalid_path<P: ToString>(path: P) -> Self {
        Error::InvalidPath(path.to_string())
    }

    pub fn io<P: ToString>(path: P, source: std::io::Error) -> Self {
        Error::Io {
            path: path.to_string(),
            source,
        }
    }

    /// True when the error only says the path is absent
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) => true,
            Error::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
