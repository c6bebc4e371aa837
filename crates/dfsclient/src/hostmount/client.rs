// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use super::SCHEME;
use crate::client::{
    CreateOptions, EntryKind, FilesystemClient, ReadStream, RenameTarget, WriteStream,
    absolute_in, plan_rename,
};
use crate::config::{
    BLOCK_SIZE_DEFAULT, BLOCK_SIZE_KEY, BUFFER_SIZE_DEFAULT, BUFFER_SIZE_KEY, ClientConfig,
    HOST_ROOT_KEY,
};
use crate::error::{Error, Result};
use crate::path::NsPath;
use crate::status::{FileStatus, millis_since_epoch};
use async_trait::async_trait;
use diagnostics::log_debug;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::io::BufWriter;

/// Filesystem client over a host directory tree.
///
/// Write streams are buffered; callers must flush or shut them down before
/// the data is visible to other readers.
pub struct HostClient {
    uri: NsPath,
    config: ClientConfig,
    /// Canonical host directory that `/` maps to
    root: PathBuf,
    buffer_size: usize,
    block_size: u64,
    working_dir: Mutex<NsPath>,
}

impl HostClient {
    /// Serve the host directory named by `fs.host.root`.
    ///
    /// The directory must exist. The configured working directory is
    /// created below it if missing.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let uri = config.default_fs()?;
        if uri.scheme() != Some(SCHEME) {
            return Err(Error::Config(format!(
                "host client needs a {SCHEME}:// URI, got {uri}"
            )));
        }

        let raw_root = config
            .get(HOST_ROOT_KEY)
            .ok_or_else(|| Error::Config(format!("{HOST_ROOT_KEY} is not set")))?;
        let root = Path::new(raw_root).canonicalize().map_err(|e| {
            Error::Config(format!("Host root '{raw_root}' cannot be resolved: {e}"))
        })?;
        if !root.is_dir() {
            return Err(Error::Config(format!(
                "Host root '{}' is not a directory",
                root.display()
            )));
        }

        let buffer_size = config.get_usize(BUFFER_SIZE_KEY, BUFFER_SIZE_DEFAULT)?;
        let block_size = config.get_u64(BLOCK_SIZE_KEY, BLOCK_SIZE_DEFAULT)?;
        let working_dir = config.working_dir()?;

        let client = Self {
            uri: NsPath::root().with_qualifier(uri.scheme(), uri.authority()),
            config,
            root,
            buffer_size,
            block_size,
            working_dir: Mutex::new(working_dir.clone()),
        };

        let host_working_dir = client.host_path(&working_dir);
        std::fs::create_dir_all(&host_working_dir)
            .map_err(|e| Error::io(client.qualify(&working_dir), e))?;

        Ok(client)
    }

    /// The host directory mapped to `/`
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &NsPath) -> Result<NsPath> {
        let working_dir = self
            .working_dir
            .lock()
            .map_err(|_| Error::Internal(format!("working directory poisoned for {}", self.uri)))?
            .clone();
        absolute_in(&self.uri, &working_dir, path)
    }

    fn qualify(&self, path: &NsPath) -> NsPath {
        path.with_qualifier(self.uri.scheme(), self.uri.authority())
    }

    /// Host location of an absolute, normalized namespace path
    fn host_path(&self, path: &NsPath) -> PathBuf {
        path.segments()
            .fold(self.root.clone(), |host, segment| host.join(segment))
    }

    /// Map a host I/O error on `path` into the client taxonomy
    fn io_error(&self, path: &NsPath, e: std::io::Error) -> Error {
        match e.kind() {
            // A file standing where a directory is expected also means absent
            ErrorKind::NotFound | ErrorKind::NotADirectory => Error::not_found(self.qualify(path)),
            _ => Error::io(self.qualify(path), e),
        }
    }

    async fn kind_of(&self, path: &NsPath) -> Option<EntryKind> {
        tokio::fs::metadata(self.host_path(path)).await.ok().map(|m| {
            if m.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            }
        })
    }

    /// Kinds of every entry `plan_rename` may ask about for this move
    async fn rename_kinds(&self, src: &NsPath, dst: &NsPath) -> HashMap<NsPath, EntryKind> {
        let mut candidates = vec![src.clone(), dst.clone(), dst.child(src.name())];
        candidates.extend(dst.parent());

        let mut kinds = HashMap::new();
        for path in candidates {
            if let Some(kind) = self.kind_of(&path).await {
                _ = kinds.insert(path, kind);
            }
        }
        kinds
    }

    fn status_of(&self, path: &NsPath, metadata: &std::fs::Metadata) -> FileStatus {
        let modification_time = metadata.modified().map(millis_since_epoch).unwrap_or(0);
        if metadata.is_dir() {
            FileStatus::directory(self.qualify(path), modification_time)
        } else {
            FileStatus {
                path: self.qualify(path),
                len: metadata.len(),
                is_dir: false,
                replication: 1,
                block_size: self.block_size,
                modification_time,
            }
        }
    }

    async fn metadata(&self, path: &NsPath) -> Result<std::fs::Metadata> {
        tokio::fs::metadata(self.host_path(path))
            .await
            .map_err(|e| self.io_error(path, e))
    }

    /// Create each missing level of an absolute path, top down
    async fn create_levels(&self, path: &NsPath) -> Result<()> {
        let mut level = NsPath::root();
        for segment in path.segments() {
            level = level.child(segment);
            let host = self.host_path(&level);
            match tokio::fs::metadata(&host).await {
                Ok(m) if m.is_dir() => {}
                Ok(_) => return Err(Error::parent_not_directory(self.qualify(&level))),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    match tokio::fs::create_dir(&host).await {
                        Ok(()) => {}
                        // Lost a race with another creator
                        Err(e) if e.kind() == ErrorKind::AlreadyExists && host.is_dir() => {}
                        Err(e) => return Err(self.io_error(&level, e)),
                    }
                }
                Err(e) => return Err(self.io_error(&level, e)),
            }
        }
        Ok(())
    }

    async fn is_empty_dir(&self, path: &NsPath) -> Result<bool> {
        let mut entries = tokio::fs::read_dir(self.host_path(path))
            .await
            .map_err(|e| self.io_error(path, e))?;
        let first = entries
            .next_entry()
            .await
            .map_err(|e| self.io_error(path, e))?;
        Ok(first.is_none())
    }
}

#[async_trait]
impl FilesystemClient for HostClient {
    fn uri(&self) -> &NsPath {
        &self.uri
    }

    fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn default_replication(&self, _path: &NsPath) -> u16 {
        1
    }

    async fn stat(&self, path: &NsPath) -> Result<FileStatus> {
        let path = self.resolve(path)?;
        let metadata = self.metadata(&path).await?;
        Ok(self.status_of(&path, &metadata))
    }

    async fn list(&self, path: &NsPath) -> Result<Vec<FileStatus>> {
        let path = self.resolve(path)?;
        let metadata = self.metadata(&path).await?;
        if !metadata.is_dir() {
            return Ok(vec![self.status_of(&path, &metadata)]);
        }

        let mut entries = tokio::fs::read_dir(self.host_path(&path))
            .await
            .map_err(|e| self.io_error(&path, e))?;
        let mut listing = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| self.io_error(&path, e))?
        {
            let child = path.child(&entry.file_name().to_string_lossy());
            let metadata = entry
                .metadata()
                .await
                .map_err(|e| self.io_error(&child, e))?;
            listing.push(self.status_of(&child, &metadata));
        }
        listing.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(listing)
    }

    async fn open(&self, path: &NsPath) -> Result<ReadStream> {
        let path = self.resolve(path)?;
        if self.metadata(&path).await?.is_dir() {
            return Err(Error::is_a_directory(self.qualify(&path)));
        }
        let file = tokio::fs::File::open(self.host_path(&path))
            .await
            .map_err(|e| self.io_error(&path, e))?;
        Ok(Box::pin(file))
    }

    async fn create(&self, path: &NsPath, options: CreateOptions) -> Result<WriteStream> {
        let path = self.resolve(path)?;
        if path.is_root() {
            return Err(Error::is_a_directory(self.qualify(&path)));
        }

        match self.metadata(&path).await {
            Ok(m) if m.is_dir() => return Err(Error::is_a_directory(self.qualify(&path))),
            Ok(_) if !options.overwrite => {
                return Err(Error::already_exists(self.qualify(&path)));
            }
            Ok(_) => {}
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        if let Some(parent) = path.parent() {
            self.create_levels(&parent).await?;
        }

        let file = tokio::fs::File::create(self.host_path(&path))
            .await
            .map_err(|e| self.io_error(&path, e))?;
        let capacity = options.buffer_size.unwrap_or(self.buffer_size);
        log_debug!("Created host file {path} with a {capacity} byte buffer",
            path: self.qualify(&path).to_string(),
            capacity: capacity);
        Ok(Box::pin(BufWriter::with_capacity(capacity, file)))
    }

    async fn append(&self, path: &NsPath) -> Result<WriteStream> {
        let path = self.resolve(path)?;
        if self.metadata(&path).await?.is_dir() {
            return Err(Error::is_a_directory(self.qualify(&path)));
        }
        let file = tokio::fs::OpenOptions::new()
            .append(true)
            .open(self.host_path(&path))
            .await
            .map_err(|e| self.io_error(&path, e))?;
        Ok(Box::pin(BufWriter::with_capacity(self.buffer_size, file)))
    }

    async fn delete(&self, path: &NsPath, recursive: bool) -> Result<bool> {
        let path = self.resolve(path)?;
        if path.is_root() {
            log_debug!("Refusing to delete the root of {uri}", uri: self.uri.to_string());
            return Ok(false);
        }

        let metadata = match self.metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.is_not_found() => return Ok(false),
            Err(e) => return Err(e),
        };

        let host = self.host_path(&path);
        let removed = if !metadata.is_dir() {
            tokio::fs::remove_file(&host).await
        } else if recursive {
            tokio::fs::remove_dir_all(&host).await
        } else if self.is_empty_dir(&path).await? {
            tokio::fs::remove_dir(&host).await
        } else {
            return Err(Error::directory_not_empty(self.qualify(&path)));
        };
        removed.map_err(|e| self.io_error(&path, e))?;
        Ok(true)
    }

    async fn mkdirs(&self, path: &NsPath) -> Result<bool> {
        let path = self.resolve(path)?;
        self.create_levels(&path).await?;
        Ok(true)
    }

    async fn rename(&self, src: &NsPath, dst: &NsPath) -> Result<bool> {
        let src = self.resolve(src)?;
        let dst = self.resolve(dst)?;

        let kinds = self.rename_kinds(&src, &dst).await;
        match plan_rename(&src, &dst, |path| kinds.get(path).copied()) {
            RenameTarget::Move(target) => {
                tokio::fs::rename(self.host_path(&src), self.host_path(&target))
                    .await
                    .map_err(|e| self.io_error(&src, e))?;
                Ok(true)
            }
            RenameTarget::Noop => Ok(true),
            RenameTarget::Refused(reason) => {
                log_debug!("Rename {src} -> {dst} refused: {reason}",
                    src: self.qualify(&src).to_string(),
                    dst: self.qualify(&dst).to_string(),
                    reason: reason);
                Ok(false)
            }
        }
    }

    async fn set_working_directory(&self, path: &NsPath) -> Result<()> {
        let resolved = self.resolve(path)?;
        let mut working_dir = self
            .working_dir
            .lock()
            .map_err(|_| Error::Internal(format!("working directory poisoned for {}", self.uri)))?;
        *working_dir = resolved;
        Ok(())
    }
}
