// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! In-process filesystem client
//!
//! `MemoryClient` serves a `mem://<authority>/` namespace held entirely in
//! memory. It follows the same contract as a remote client, so it doubles
//! as the test filesystem for everything built on `FilesystemClient`.
//! Instances obtained through `crate::connect` are shared per authority.

mod namespace;
mod writer;


use crate::client::{
    CreateOptions, FilesystemClient, ReadStream, RenameTarget, WriteStream, absolute_in,
    plan_rename,
};
use crate::config::{
    BLOCK_SIZE_DEFAULT, BLOCK_SIZE_KEY, ClientConfig, REPLICATION_DEFAULT, REPLICATION_KEY,
};
use crate::error::{Error, Result};
use crate::path::NsPath;
use crate::status::{FileStatus, now_millis};
use async_trait::async_trait;
use diagnostics::log_debug;
use namespace::{FileData, Namespace, Node};
use std::io::Cursor;
use std::sync::{Mutex, MutexGuard};
use writer::MemoryWriter;

pub const SCHEME: &str = "mem";

/// Filesystem client over an in-memory namespace
pub struct MemoryClient {
    uri: NsPath,
    config: ClientConfig,
    replication: u16,
    block_size: u64,
    working_dir: Mutex<NsPath>,
    namespace: Mutex<Namespace>,
}

impl MemoryClient {
    /// Create an empty namespace for the `mem://` URI named by `config`
    pub fn new(config: ClientConfig) -> Result<Self> {
        let uri = config.default_fs()?;
        if uri.scheme() != Some(SCHEME) {
            return Err(Error::Config(format!(
                "memory client needs a {SCHEME}:// URI, got {uri}"
            )));
        }

        let replication = config.get_u16(REPLICATION_KEY, REPLICATION_DEFAULT)?;
        let block_size = config.get_u64(BLOCK_SIZE_KEY, BLOCK_SIZE_DEFAULT)?;
        let working_dir = config.working_dir()?;

        let mut namespace = Namespace::new();
        namespace
            .mkdirs(&working_dir)
            .map_err(Error::parent_not_directory)?;

        Ok(Self {
            uri: NsPath::root().with_qualifier(uri.scheme(), uri.authority()),
            config,
            replication,
            block_size,
            working_dir: Mutex::new(working_dir),
            namespace: Mutex::new(namespace),
        })
    }

    fn namespace(&self) -> Result<MutexGuard<'_, Namespace>> {
        self.namespace
            .lock()
            .map_err(|_| Error::Internal(format!("namespace lock poisoned for {}", self.uri)))
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

    fn status_of(&self, path: &NsPath, node: &Node) -> Result<FileStatus> {
        Ok(match node {
            Node::Directory { modification_time } => {
                FileStatus::directory(self.qualify(path), *modification_time)
            }
            Node::File {
                data,
                replication,
                block_size,
                modification_time,
            } => {
                let len = data
                    .lock()
                    .map_err(|_| Error::Internal(format!("memory file {path} is poisoned")))?
                    .len();
                FileStatus {
                    path: self.qualify(path),
                    len: len as u64,
                    is_dir: false,
                    replication: *replication,
                    block_size: *block_size,
                    modification_time: *modification_time,
                }
            }
        })
    }
}

#[async_trait]
impl FilesystemClient for MemoryClient {
    fn uri(&self) -> &NsPath {
        &self.uri
    }

    fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn default_replication(&self, _path: &NsPath) -> u16 {
        self.replication
    }

    async fn stat(&self, path: &NsPath) -> Result<FileStatus> {
        let path = self.resolve(path)?;
        let ns = self.namespace()?;
        let node = ns.get(&path).ok_or_else(|| Error::not_found(self.qualify(&path)))?;
        self.status_of(&path, node)
    }

    async fn list(&self, path: &NsPath) -> Result<Vec<FileStatus>> {
        let path = self.resolve(path)?;
        let ns = self.namespace()?;
        match ns.get(&path) {
            None => Err(Error::not_found(self.qualify(&path))),
            Some(node @ Node::File { .. }) => Ok(vec![self.status_of(&path, node)?]),
            Some(Node::Directory { .. }) => ns
                .children(&path)
                .into_iter()
                .map(|(child, node)| self.status_of(&child, node))
                .collect(),
        }
    }

    async fn open(&self, path: &NsPath) -> Result<ReadStream> {
        let path = self.resolve(path)?;
        let ns = self.namespace()?;
        match ns.get(&path) {
            None => Err(Error::not_found(self.qualify(&path))),
            Some(Node::Directory { .. }) => Err(Error::is_a_directory(self.qualify(&path))),
            Some(Node::File { data, .. }) => {
                let snapshot = data
                    .lock()
                    .map_err(|_| Error::Internal(format!("memory file {path} is poisoned")))?
                    .clone();
                Ok(Box::pin(Cursor::new(snapshot)))
            }
        }
    }

    async fn create(&self, path: &NsPath, options: CreateOptions) -> Result<WriteStream> {
        let path = self.resolve(path)?;
        if path.is_root() {
            return Err(Error::is_a_directory(self.qualify(&path)));
        }

        let mut ns = self.namespace()?;
        match ns.get(&path) {
            Some(Node::Directory { .. }) => {
                return Err(Error::is_a_directory(self.qualify(&path)));
            }
            Some(Node::File { .. }) if !options.overwrite => {
                return Err(Error::already_exists(self.qualify(&path)));
            }
            _ => {}
        }

        if let Some(parent) = path.parent() {
            ns.mkdirs(&parent)
                .map_err(|level| Error::parent_not_directory(self.qualify(&level)))?;
        }

        let data = FileData::default();
        ns.insert(
            &path,
            Node::File {
                data: data.clone(),
                replication: options.replication.unwrap_or(self.replication),
                block_size: options.block_size.unwrap_or(self.block_size),
                modification_time: now_millis(),
            },
        );

        let qualified = self.qualify(&path).to_string();
        log_debug!("Created memory file {path}", path: qualified.as_str());
        Ok(Box::pin(MemoryWriter::new(data, qualified)))
    }

    async fn append(&self, path: &NsPath) -> Result<WriteStream> {
        let path = self.resolve(path)?;
        let mut ns = self.namespace()?;
        match ns.get_mut(&path) {
            None => Err(Error::not_found(self.qualify(&path))),
            Some(Node::Directory { .. }) => Err(Error::is_a_directory(self.qualify(&path))),
            Some(Node::File {
                data,
                modification_time,
                ..
            }) => {
                *modification_time = now_millis();
                let data = data.clone();
                Ok(Box::pin(MemoryWriter::new(
                    data,
                    self.qualify(&path).to_string(),
                )))
            }
        }
    }

    async fn delete(&self, path: &NsPath, recursive: bool) -> Result<bool> {
        let path = self.resolve(path)?;
        if path.is_root() {
            log_debug!("Refusing to delete the root of {uri}", uri: self.uri.to_string());
            return Ok(false);
        }

        let mut ns = self.namespace()?;
        match ns.get(&path) {
            None => return Ok(false),
            Some(Node::Directory { .. }) if !recursive && ns.has_children(&path) => {
                return Err(Error::directory_not_empty(self.qualify(&path)));
            }
            Some(_) => {}
        }
        ns.remove_subtree(&path);
        Ok(true)
    }

    async fn mkdirs(&self, path: &NsPath) -> Result<bool> {
        let path = self.resolve(path)?;
        let mut ns = self.namespace()?;
        ns.mkdirs(&path)
            .map_err(|level| Error::parent_not_directory(self.qualify(&level)))?;
        Ok(true)
    }

    async fn rename(&self, src: &NsPath, dst: &NsPath) -> Result<bool> {
        let src = self.resolve(src)?;
        let dst = self.resolve(dst)?;
        let mut ns = self.namespace()?;

        let plan = plan_rename(&src, &dst, |path| ns.kind(path));
        match plan {
            RenameTarget::Move(target) => {
                ns.move_subtree(&src, &target);
                Ok(true)
            }
            RenameTarget::Noop => Ok(true),
            RenameTarget::Refused(reason) => {
                let src = self.qualify(&src).to_string();
                let dst = self.qualify(&dst).to_string();
                log_debug!("Rename {src} -> {dst} refused: {reason}", src: src, dst: dst, reason: reason);
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
