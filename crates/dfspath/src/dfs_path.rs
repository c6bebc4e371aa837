// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use crate::file_path::{ChildStream, FilePath};
use async_trait::async_trait;
use dfsclient::{
    BUFFER_SIZE_DEFAULT, BUFFER_SIZE_KEY, ClientConfig, CreateOptions, FileStatus,
    FilesystemClient, NsPath, ReadStream, WriteStream,
};
use diagnostics::{log_debug, log_info, log_warn};
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// A path bound to the filesystem client that serves it.
///
/// The handle holds no remote state beyond its absolute path, which is
/// resolved against the client's working directory on first use and then
/// kept for the life of the handle. Every other query goes to the client.
///
/// Equality and hashing look at the path as currently held: the absolute
/// path once resolved, the path given at construction before that. The
/// client is not part of a handle's identity.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "PathRecord", into = "PathRecord")]
pub struct DfsPath {
    client: Arc<dyn FilesystemClient>,
    raw: NsPath,
    absolute: OnceCell<NsPath>,
}

/// Serialized form: enough configuration to reconnect, plus the path
#[derive(Serialize, Deserialize)]
struct PathRecord {
    config: ClientConfig,
    path: String,
}

impl From<DfsPath> for PathRecord {
    fn from(path: DfsPath) -> Self {
        Self {
            config: path.client.config().clone(),
            path: path.path().to_string(),
        }
    }
}

impl TryFrom<PathRecord> for DfsPath {
    type Error = Error;

    fn try_from(record: PathRecord) -> Result<Self> {
        let client = dfsclient::connect(&record.config)?;
        Self::parse(client, &record.path)
    }
}

impl DfsPath {
    pub fn new(client: Arc<dyn FilesystemClient>, path: NsPath) -> Self {
        Self {
            client,
            raw: path,
            absolute: OnceCell::new(),
        }
    }

    pub fn parse(client: Arc<dyn FilesystemClient>, path: &str) -> Result<Self> {
        Ok(Self::new(client, NsPath::parse(path)?))
    }

    fn sibling_handle(&self, path: NsPath) -> Self {
        Self::new(self.client.clone(), path)
    }

    #[must_use]
    pub fn client(&self) -> &Arc<dyn FilesystemClient> {
        &self.client
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.path().name()
    }

    /// The absolute path if it has been resolved, otherwise the path as given
    #[must_use]
    pub fn path(&self) -> &NsPath {
        self.absolute.get().unwrap_or(&self.raw)
    }

    /// Resolve the path against the client's working directory.
    ///
    /// Only the first successful call asks the client; concurrent first
    /// callers wait for that one lookup. A qualified absolute path needs no
    /// lookup at all.
    pub async fn absolute_path(&self) -> Result<&NsPath> {
        self.absolute
            .get_or_try_init(|| async {
                if self.raw.is_absolute() && self.raw.is_qualified() {
                    return Ok(self.raw.clone());
                }
                let working_dir = self.client.working_directory().await?;
                let resolved = self.raw.resolve_against(&working_dir.path);
                log_debug!("Resolved {raw} to {resolved}",
                    raw: self.raw.to_string(),
                    resolved: resolved.to_string());
                Ok::<_, Error>(resolved)
            })
            .await
    }

    #[must_use]
    pub fn parent(&self) -> Option<DfsPath> {
        self.path().parent().map(|p| self.sibling_handle(p))
    }

    #[must_use]
    pub fn child(&self, name: &str) -> DfsPath {
        self.sibling_handle(self.path().child(name))
    }

    pub fn with_path(&self, path: &str) -> Result<DfsPath> {
        Self::parse(self.client.clone(), path)
    }

    /// Raw client metadata for this path
    pub async fn status(&self) -> Result<FileStatus> {
        Ok(self.client.stat(self.path()).await?)
    }

    pub async fn exists(&self) -> bool {
        match self.client.exists(self.path()).await {
            Ok(exists) => exists,
            Err(e) => {
                log_warn!("Existence check for {path} failed, reporting absent: {error}",
                    path: self.to_string(),
                    error: e.to_string());
                false
            }
        }
    }

    pub async fn is_directory(&self) -> Result<bool> {
        Ok(self.status().await?.is_dir)
    }

    /// Names starting with `_` or `.` mark temporary, hidden, or marker
    /// entries such as `_SUCCESS`
    #[must_use]
    pub fn is_regular(&self) -> bool {
        !self.name().starts_with(['_', '.'])
    }

    pub async fn len(&self) -> Result<u64> {
        Ok(self.status().await?.len)
    }

    /// Children of this directory, listed with one client call and handed
    /// out lazily. Call again to list again.
    pub async fn children(&self) -> Result<BoxStream<'static, DfsPath>> {
        let listing = self.client.list(self.path()).await?;
        let client = self.client.clone();
        Ok(stream::iter(listing)
            .map(move |status| DfsPath::new(client.clone(), status.path))
            .boxed())
    }

    /// Remove this entry recursively.
    ///
    /// An absent entry counts as deleted. Failures are logged and reported
    /// as `false`.
    pub async fn delete(&self) -> bool {
        if !self.exists().await {
            return true;
        }
        match self.client.delete(self.path(), true).await {
            Ok(deleted) => {
                log_info!("Deleted {path}: {deleted}", path: self.to_string(), deleted: deleted);
                deleted
            }
            Err(e) => {
                log_warn!("Failed to delete {path}: {error}",
                    path: self.to_string(),
                    error: e.to_string());
                false
            }
        }
    }

    /// Create this directory and any missing ancestors.
    ///
    /// Returns `false` without touching the namespace when the path already
    /// exists. Ancestors are created top down; an ancestor that exists as a
    /// file stops the walk with `ParentNotDirectory`.
    pub fn mkdirs(&self) -> BoxFuture<'_, Result<bool>> {
        async move {
            if self.exists().await {
                return Ok(false);
            }

            if let Some(parent) = self.parent() {
                if !parent.exists().await {
                    _ = parent.mkdirs().await?;
                } else if !parent.is_directory().await? {
                    return Err(Error::ParentNotDirectory(parent.to_string()));
                }
            }

            let created = self.client.mkdirs(self.path()).await?;
            log_info!("Created directory {path}", path: self.to_string());
            Ok(created)
        }
        .boxed()
    }

    /// Move this entry to `dst`.
    ///
    /// The polarity of `replace_existing` is inverted from what the name
    /// suggests: `true` refuses to touch an existing destination and fails
    /// with `DestinationExists`, `false` deletes an existing destination
    /// before the move.
    ///
    /// Renaming onto the same path is a no-op. A destination that contains
    /// the source, or lies inside it, fails with `RenameFailed` before
    /// anything is touched.
    ///
    /// Missing destination parents are created. After the move, the source's
    /// old parent and its ancestors are removed while they are empty; that
    /// cleanup never fails the rename.
    pub async fn rename_to(&self, dst: &dyn FilePath, replace_existing: bool) -> Result<()> {
        if !self.exists().await {
            return Err(Error::SourceNotFound(self.to_string()));
        }

        let dst = dst
            .as_any()
            .downcast_ref::<DfsPath>()
            .filter(|d| d.client.uri() == self.client.uri())
            .ok_or_else(|| Error::IncompatibleDestination(dst.to_string()))?;

        let dst_exists = dst.exists().await;
        if replace_existing && dst_exists {
            return Err(Error::DestinationExists(dst.to_string()));
        }

        let src_path = self.absolute_path().await?.clone();
        let dst_path = dst.absolute_path().await?.clone();

        // Settled before anything is created or deleted
        if src_path == dst_path {
            log_debug!("Rename of {src} onto itself", src: src_path.to_string());
            return Ok(());
        }
        if src_path.is_descendant_of(&dst_path) || dst_path.is_descendant_of(&src_path) {
            return Err(Error::RenameFailed {
                src: src_path.to_string(),
                dst: dst_path.to_string(),
            });
        }

        if let Some(parent) = dst_path.parent().map(|p| self.sibling_handle(p)) {
            if !parent.exists().await {
                _ = parent.mkdirs().await?;
            } else if !parent.is_directory().await? {
                return Err(Error::ParentNotDirectory(parent.to_string()));
            }
        }

        if dst_exists && !dst.delete().await {
            // The rename below reports the collision
            log_warn!("Could not clear existing destination {dst}", dst: dst_path.to_string());
        }

        log_debug!("Renaming {src} to {dst}", src: src_path.to_string(), dst: dst_path.to_string());
        if !self.client.rename(&src_path, &dst_path).await? {
            return Err(Error::RenameFailed {
                src: src_path.to_string(),
                dst: dst_path.to_string(),
            });
        }
        log_info!("Renamed {src} to {dst}", src: src_path.to_string(), dst: dst_path.to_string());

        if let Some(parent) = src_path.parent() {
            let parent = self.sibling_handle(parent);
            if let Err(e) = parent.delete_if_empty_directory().await {
                log_warn!("Cleanup after renaming {src} stopped: {error}",
                    src: src_path.to_string(),
                    error: e.to_string());
            }
        }
        Ok(())
    }

    /// Delete this directory if it is empty, then its parent, and so on up.
    ///
    /// Stops at the first entry that is missing, is not an empty directory,
    /// or cannot be checked, and never removes the root. Returns how many
    /// directories were removed.
    pub async fn delete_if_empty_directory(&self) -> Result<usize> {
        let mut current = Some(self.absolute_path().await?.clone());
        let mut removed = 0;

        while let Some(dir) = current.take() {
            if dir.is_root() {
                break;
            }
            match self.remove_if_empty(&dir).await {
                Ok(true) => {
                    removed += 1;
                    current = dir.parent();
                }
                Ok(false) => break,
                Err(e) => {
                    log_warn!("Stopped empty directory cleanup at {dir}: {error}",
                        dir: dir.to_string(),
                        error: e.to_string());
                    break;
                }
            }
        }
        Ok(removed)
    }

    async fn remove_if_empty(&self, dir: &NsPath) -> Result<bool> {
        let status = match self.client.stat(dir).await {
            Ok(status) => status,
            Err(e) if e.is_not_found() => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        if !status.is_dir || !self.client.list(dir).await?.is_empty() {
            return Ok(false);
        }
        let deleted = self.client.delete(dir, false).await?;
        if deleted {
            log_debug!("Removed empty directory {dir}", dir: dir.to_string());
        }
        Ok(deleted)
    }

    pub async fn open(&self) -> Result<ReadStream> {
        Ok(self.client.open(self.path()).await?)
    }

    async fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.parent() {
            _ = parent.mkdirs().await?;
        }
        Ok(())
    }

    /// Open a new file for writing, creating missing parents
    pub async fn create(&self, overwrite: bool) -> Result<WriteStream> {
        self.ensure_parent().await?;
        Ok(self
            .client
            .create(self.path(), CreateOptions::new(overwrite))
            .await?)
    }

    /// Like `create`, with an explicit block size.
    ///
    /// The write buffer comes from `io.file.buffer.size` and replication
    /// from the client's default for this path.
    pub async fn create_with_block_size(
        &self,
        overwrite: bool,
        block_size: u64,
    ) -> Result<WriteStream> {
        let buffer_size = self
            .client
            .config()
            .get_usize(BUFFER_SIZE_KEY, BUFFER_SIZE_DEFAULT)?;
        let replication = self.client.default_replication(self.path());
        let options = CreateOptions::new(overwrite)
            .with_buffer_size(buffer_size)
            .with_replication(replication)
            .with_block_size(block_size);

        self.ensure_parent().await?;
        Ok(self.client.create(self.path(), options).await?)
    }

    pub async fn append(&self) -> Result<WriteStream> {
        self.ensure_parent().await?;
        Ok(self.client.append(self.path()).await?)
    }
}

impl PartialEq for DfsPath {
    fn eq(&self, other: &Self) -> bool {
        self.path() == other.path()
    }
}

impl Eq for DfsPath {}

/// Hashes only the final segment of the path the handle was built with.
///
/// Resolution fills in the absolute path behind `&self`, so hashing the
/// full path would move a stored handle to another bucket. The final
/// segment survives resolution for every path except `.` and `..`, which
/// hash nothing.
impl Hash for DfsPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.raw.name() {
            "." | ".." => {}
            name => name.hash(state),
        }
    }
}

impl fmt::Display for DfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.path(), f)
    }
}

impl fmt::Debug for DfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DfsPath")
            .field("fs", &self.client.uri().to_string())
            .field("path", &self.path().to_string())
            .finish()
    }
}

fn boxed(path: DfsPath) -> Box<dyn FilePath> {
    Box::new(path)
}

#[async_trait]
impl FilePath for DfsPath {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn name(&self) -> &str {
        DfsPath::name(self)
    }

    fn path(&self) -> &NsPath {
        DfsPath::path(self)
    }

    async fn absolute_path(&self) -> Result<NsPath> {
        DfsPath::absolute_path(self).await.cloned()
    }

    fn parent(&self) -> Option<Box<dyn FilePath>> {
        DfsPath::parent(self).map(boxed)
    }

    fn child(&self, name: &str) -> Box<dyn FilePath> {
        boxed(DfsPath::child(self, name))
    }

    fn with_path(&self, path: &str) -> Result<Box<dyn FilePath>> {
        DfsPath::with_path(self, path).map(boxed)
    }

    async fn exists(&self) -> bool {
        DfsPath::exists(self).await
    }

    async fn is_directory(&self) -> Result<bool> {
        DfsPath::is_directory(self).await
    }

    fn is_regular(&self) -> bool {
        DfsPath::is_regular(self)
    }

    async fn len(&self) -> Result<u64> {
        DfsPath::len(self).await
    }

    async fn children(&self) -> Result<ChildStream> {
        Ok(DfsPath::children(self).await?.map(boxed).boxed())
    }

    async fn delete(&self) -> bool {
        DfsPath::delete(self).await
    }

    async fn mkdirs(&self) -> Result<bool> {
        DfsPath::mkdirs(self).await
    }

    async fn rename_to(&self, dst: &dyn FilePath, replace_existing: bool) -> Result<()> {
        DfsPath::rename_to(self, dst, replace_existing).await
    }

    async fn open(&self) -> Result<ReadStream> {
        DfsPath::open(self).await
    }

    async fn create(&self, overwrite: bool) -> Result<WriteStream> {
        DfsPath::create(self, overwrite).await
    }

    async fn append(&self) -> Result<WriteStream> {
        DfsPath::append(self).await
    }
}
