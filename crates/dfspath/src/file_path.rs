// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::Result;
use async_trait::async_trait;
use dfsclient::{NsPath, ReadStream, WriteStream};
use futures::stream::BoxStream;
use std::any::Any;
use std::fmt;

/// Lazily produced children of a directory listing
pub type ChildStream = BoxStream<'static, Box<dyn FilePath>>;

/// Filesystem-agnostic handle on one entry of a hierarchical namespace.
///
/// Implementations bind a path to whatever client serves it. Path algebra
/// (`name`, `parent`, `child`, `with_path`) never performs I/O.
#[async_trait]
pub trait FilePath: fmt::Debug + fmt::Display + Send + Sync {
    /// Allows renames to check that the destination is the same kind of handle
    fn as_any(&self) -> &dyn Any;

    /// Last path segment
    fn name(&self) -> &str;

    /// The path as currently held, possibly relative
    fn path(&self) -> &NsPath;

    async fn absolute_path(&self) -> Result<NsPath>;

    /// `None` at the top of the namespace
    fn parent(&self) -> Option<Box<dyn FilePath>>;

    fn child(&self, name: &str) -> Box<dyn FilePath>;

    /// Another path on the same filesystem
    fn with_path(&self, path: &str) -> Result<Box<dyn FilePath>>;

    /// False when absent or when the check itself fails
    async fn exists(&self) -> bool;

    async fn is_directory(&self) -> Result<bool>;

    /// False for names starting with `_` or `.`
    fn is_regular(&self) -> bool;

    async fn len(&self) -> Result<u64>;

    async fn children(&self) -> Result<ChildStream>;

    /// Remove the entry and everything below it; true if it is gone
    async fn delete(&self) -> bool;

    async fn mkdirs(&self) -> Result<bool>;

    /// Move this entry to `dst`.
    ///
    /// `replace_existing = true` fails if `dst` exists; `false` deletes an
    /// existing `dst` first.
    async fn rename_to(&self, dst: &dyn FilePath, replace_existing: bool) -> Result<()>;

    async fn open(&self) -> Result<ReadStream>;

    async fn create(&self, overwrite: bool) -> Result<WriteStream>;

    async fn append(&self) -> Result<WriteStream>;
}
