// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::path::NsPath;
use crate::status::FileStatus;
use async_trait::async_trait;
use std::pin::Pin;
use tokio::io::{AsyncRead, AsyncSeek, AsyncWrite};

/// Readable and seekable byte stream
pub trait AsyncReadSeek: AsyncRead + AsyncSeek + Send + Unpin {}

impl<T: AsyncRead + AsyncSeek + Send + Unpin> AsyncReadSeek for T {}

pub type ReadStream = Pin<Box<dyn AsyncReadSeek>>;

pub type WriteStream = Pin<Box<dyn AsyncWrite + Send>>;

/// Placement and buffering requested for a new file.
///
/// Unset fields fall back to the client's defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateOptions {
    pub overwrite: bool,
    pub buffer_size: Option<usize>,
    pub replication: Option<u16>,
    pub block_size: Option<u64>,
}

impl CreateOptions {
    #[must_use]
    pub fn new(overwrite: bool) -> Self {
        Self {
            overwrite,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = Some(buffer_size);
        self
    }

    #[must_use]
    pub fn with_replication(mut self, replication: u16) -> Self {
        self.replication = Some(replication);
        self
    }

    #[must_use]
    pub fn with_block_size(mut self, block_size: u64) -> Self {
        self.block_size = Some(block_size);
        self
    }
}

/// Metadata and data operations of a remote hierarchical filesystem.
///
/// Relative paths resolve against the client's working directory. A
/// qualified path must name this client's filesystem.
#[async_trait]
pub trait FilesystemClient: Send + Sync {
    /// Qualified root of the served namespace, e.g. `mem://cluster/`
    fn uri(&self) -> &NsPath;

    /// Configuration sufficient to locate or rebuild this client
    fn config(&self) -> &ClientConfig;

    fn default_replication(&self, path: &NsPath) -> u16;

    /// Metadata for `path`; `Error::NotFound` if it does not exist
    async fn stat(&self, path: &NsPath) -> Result<FileStatus>;

    async fn exists(&self, path: &NsPath) -> Result<bool> {
        match self.stat(path).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Immediate children of a directory sorted by name, or the status of
    /// `path` itself when it is a file
    async fn list(&self, path: &NsPath) -> Result<Vec<FileStatus>>;

    async fn open(&self, path: &NsPath) -> Result<ReadStream>;

    /// Create (or truncate, with `overwrite`) a file, creating missing parents
    async fn create(&self, path: &NsPath, options: CreateOptions) -> Result<WriteStream>;

    async fn append(&self, path: &NsPath) -> Result<WriteStream>;

    /// Remove `path`. `Ok(false)` when there was nothing to remove.
    async fn delete(&self, path: &NsPath, recursive: bool) -> Result<bool>;

    /// Create `path` and every missing ancestor
    async fn mkdirs(&self, path: &NsPath) -> Result<bool>;

    /// Move `src` to `dst` in one namespace operation.
    ///
    /// `Ok(false)` means the move was refused and nothing changed.
    async fn rename(&self, src: &NsPath, dst: &NsPath) -> Result<bool>;

    async fn working_directory(&self) -> Result<FileStatus> {
        self.stat(&NsPath::cur_dir()).await
    }

    async fn set_working_directory(&self, path: &NsPath) -> Result<()>;
}

/// Resolve `path` to the absolute, unqualified form clients key entries by
pub(crate) fn absolute_in(uri: &NsPath, working_dir: &NsPath, path: &NsPath) -> Result<NsPath> {
    if path.is_qualified() && !path.same_qualifier(uri) {
        return Err(Error::WrongFs {
            path: path.to_string(),
            expected: uri.to_string(),
        });
    }
    Ok(path.resolve_against(working_dir).unqualified())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryKind {
    File,
    Directory,
}

/// Outcome of checking a rename against the namespace
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum RenameTarget {
    /// Move the source to this path
    Move(NsPath),
    /// Source and destination already coincide
    Noop,
    Refused(&'static str),
}

/// Decide where `src` lands when renamed to `dst`.
///
/// An existing directory destination receives the source under its own
/// name. Everything else that would clobber or orphan an entry is refused.
pub(crate) fn plan_rename<F>(src: &NsPath, dst: &NsPath, kind_of: F) -> RenameTarget
where
    F: Fn(&NsPath) -> Option<EntryKind>,
{
    if src.is_root() {
        return RenameTarget::Refused("source is the root");
    }
    if kind_of(src).is_none() {
        return RenameTarget::Refused("source does not exist");
    }
    if src == dst {
        return RenameTarget::Noop;
    }
    if dst.is_descendant_of(src) {
        return RenameTarget::Refused("destination is inside the source");
    }

    let target = match kind_of(dst) {
        Some(EntryKind::File) => return RenameTarget::Refused("destination is an existing file"),
        Some(EntryKind::Directory) => dst.child(src.name()),
        None => dst.clone(),
    };

    if target == *src {
        return RenameTarget::Noop;
    }
    if kind_of(&target).is_some() {
        return RenameTarget::Refused("destination entry already exists");
    }

    match target.parent() {
        Some(parent) if kind_of(&parent) == Some(EntryKind::Directory) => {
            RenameTarget::Move(target)
        }
        _ => RenameTarget::Refused("destination parent is missing or not a directory"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn p(s: &str) -> NsPath {
        NsPath::parse(s).unwrap()
    }

    fn tree() -> HashMap<NsPath, EntryKind> {
        let mut kinds = HashMap::new();
        for dir in ["/", "/a", "/a/sub", "/b"] {
            _ = kinds.insert(p(dir), EntryKind::Directory);
        }
        for file in ["/a/f1", "/b/f2"] {
            _ = kinds.insert(p(file), EntryKind::File);
        }
        kinds
    }

    fn plan(src: &str, dst: &str) -> RenameTarget {
        let kinds = tree();
        plan_rename(&p(src), &p(dst), |path| kinds.get(path).copied())
    }

    #[test]
    fn test_plan_plain_move() {
        assert_eq!(plan("/a/f1", "/b/new"), RenameTarget::Move(p("/b/new")));
    }

    #[test]
    fn test_plan_into_directory() {
        assert_eq!(plan("/a/f1", "/b"), RenameTarget::Move(p("/b/f1")));
        assert_eq!(plan("/a/f1", "/a"), RenameTarget::Noop);
    }

    #[test]
    fn test_plan_refusals() {
        assert!(matches!(plan("/missing", "/b/x"), RenameTarget::Refused(_)));
        assert!(matches!(plan("/a/f1", "/b/f2"), RenameTarget::Refused(_)));
        assert!(matches!(plan("/a", "/a/sub/x"), RenameTarget::Refused(_)));
        assert!(matches!(plan("/a/f1", "/nowhere/x"), RenameTarget::Refused(_)));
        assert!(matches!(plan("/a/f1", "/b/f2/x"), RenameTarget::Refused(_)));
        assert!(matches!(plan("/", "/b/x"), RenameTarget::Refused(_)));
    }

    #[test]
    fn test_plan_self() {
        assert_eq!(plan("/a/f1", "/a/f1"), RenameTarget::Noop);
    }

    #[test]
    fn test_absolute_in() {
        let uri = p("mem://c/");
        let wd = p("/user/me");
        assert_eq!(absolute_in(&uri, &wd, &p("x")).unwrap(), p("/user/me/x"));
        assert_eq!(absolute_in(&uri, &wd, &p("mem://c/y")).unwrap(), p("/y"));
        assert!(matches!(
            absolute_in(&uri, &wd, &p("mem://other/y")),
            Err(Error::WrongFs { .. })
        ));
    }
}
