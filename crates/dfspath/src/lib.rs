// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Path handles over remote hierarchical filesystems
//!
//! `DfsPath` binds a path to the `dfsclient::FilesystemClient` that serves
//! it and adds the composite operations the client does not provide in one
//! call: recursive directory creation with ancestor checks, rename with
//! destination handling and cleanup of emptied source directories, and
//! parent creation ahead of writes. `FilePath` is the filesystem-agnostic
//! contract it implements.

mod dfs_path;
mod error;
mod file_path;

#[cfg(test)]
mod tests;

pub use dfs_path::DfsPath;
pub use error::{Error, Result};
pub use file_path::{ChildStream, FilePath};
